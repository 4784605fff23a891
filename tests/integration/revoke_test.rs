// Revocation integration tests
// Delete button -> registry entry, broadcast post and approval UI removed

use super::test_harness::*;
use tracemark::config::{Config, Messages};
use tracemark::registry::PhotoRegistry;

#[tokio::test]
async fn test_revoked_photo_is_no_longer_delivered() {
    // Test: After delete, a request from the stale post gets the unavailable notice
    let bot = BotHarness::new();
    let admin = User::anonymous(ADMIN);

    let ui = bot.submit(&admin, test_png(96, 64), Some("pier")).await;
    bot.press(&admin, &ui, "publish").await;
    let post = bot.broadcast_posts().pop().unwrap();
    let data = post.callback_data().remove(0);

    let ui = bot.refresh(&ui).unwrap();
    bot.press(&admin, &ui, "delete").await;

    assert!(bot.registry.is_empty());
    assert!(bot.refresh(&ui).is_none(), "approval message should be deleted");
    assert!(bot.broadcast_posts().is_empty(), "post should be retracted");

    let requester = User::named(1001, "alice");
    bot.press(&requester, &post, &data).await;

    assert!(bot.chat.photos_in(requester.id).is_empty());
    assert_eq!(
        bot.chat.texts_in(requester.id),
        vec![Messages::default().unavailable]
    );
}

#[tokio::test]
async fn test_delete_retracts_every_post_of_a_republished_photo() {
    // Test: A photo published twice leaves no post behind after delete
    let bot = BotHarness::new();
    let admin = User::anonymous(ADMIN);

    let ui = bot.submit(&admin, test_png(96, 64), Some("quay")).await;
    bot.press(&admin, &ui, "publish").await;
    let ui = bot.refresh(&ui).unwrap();
    bot.press(&admin, &ui, "publish").await;
    assert_eq!(bot.broadcast_posts().len(), 2);

    let ui = bot.refresh(&ui).unwrap();
    bot.press(&admin, &ui, "delete").await;

    assert!(bot.broadcast_posts().is_empty());
    assert!(bot.registry.is_empty());
}

#[tokio::test]
async fn test_delete_before_publish_discards_submission() {
    // Test: Deleting a pending submission removes the UI and posts nothing
    let bot = BotHarness::new();
    let user = User::anonymous(77);

    let ui = bot.submit(&user, test_png(96, 64), None).await;
    bot.press(&user, &ui, "delete").await;

    assert!(bot.refresh(&ui).is_none());
    assert!(bot.chat.photos_in(user.id).is_empty());
    assert!(bot.broadcast_posts().is_empty());
    assert!(bot.chat.texts_in(user.id).is_empty());
}

#[tokio::test]
async fn test_post_kept_when_retraction_disabled() {
    // Test: With retraction off, the post stays but its button stops working
    let config = Config::from_yaml_with_env(&format!(
        r#"
telegram:
  token: "123:test"
channel: {}
admins: [{}]
publish:
  retract_post_on_delete: false
"#,
        CHANNEL, ADMIN
    ))
    .unwrap();
    let bot = BotHarness::with_config(config);
    let admin = User::anonymous(ADMIN);

    let ui = bot.submit(&admin, test_png(96, 64), None).await;
    bot.press(&admin, &ui, "publish").await;
    let ui = bot.refresh(&ui).unwrap();
    bot.press(&admin, &ui, "delete").await;

    let posts = bot.broadcast_posts();
    assert_eq!(posts.len(), 1);
    assert!(bot.registry.is_empty());

    let requester = User::anonymous(2002);
    let data = posts[0].callback_data().remove(0);
    bot.press(&requester, &posts[0], &data).await;
    assert!(bot.chat.photos_in(requester.id).is_empty());
}

#[tokio::test]
async fn test_second_delete_reports_failure() {
    // Test: Pressing delete on an already-deleted message is reported, not fatal
    let bot = BotHarness::new();
    let admin = User::anonymous(ADMIN);

    let ui = bot.submit(&admin, test_png(96, 64), None).await;
    bot.press(&admin, &ui, "delete").await;
    let callback_id = bot.press(&admin, &ui, "delete").await;

    assert_eq!(
        bot.chat.texts_in(admin.id),
        vec![Messages::default().operation_failed]
    );
    assert!(bot.chat.answered_callbacks().contains(&callback_id));
}
