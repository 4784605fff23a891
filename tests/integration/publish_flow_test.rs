// Publish flow integration tests
// Submission -> approval UI -> broadcast post + registry entry

use super::test_harness::*;
use tracemark::config::Messages;
use tracemark::imaging::{broadcast_block_size, decode, pixelate, DecodeLimits};
use tracemark::registry::{PhotoRegistry, PublicId};

#[tokio::test]
async fn test_submission_is_replaced_by_approval_message() {
    // Test: A submitted photo is deleted and re-sent with publish/delete buttons
    let bot = BotHarness::new();
    let alice = User::named(1001, "alice");

    let ui = bot.submit(&alice, test_png(240, 160), Some("harbour")).await;

    let remaining = bot.chat.photos_in(alice.id);
    assert_eq!(remaining.len(), 1, "original submission should be gone");
    assert_eq!(ui.caption.as_deref(), Some("harbour\n\nReady to publish"));
    assert_eq!(ui.callback_data(), vec!["publish", "delete"]);
    assert!(bot.registry.is_empty());
}

#[tokio::test]
async fn test_admin_publishes_pixelated_copy() {
    // Test: Approval by an admin posts the block-averaged copy and registers the original
    let bot = BotHarness::new();
    let admin = User::named(ADMIN, "editor");
    let original = test_png(240, 160);

    let ui = bot.submit(&admin, original.clone(), Some("harbour")).await;
    bot.press(&admin, &ui, "publish").await;

    let posts = bot.broadcast_posts();
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.caption.as_deref(), Some("harbour"));

    // Registry keyed by the content-stable id, pointing at the original file
    let public_id = PublicId::from(ui.photo[0].unique_id.as_str());
    assert_eq!(post.callback_data(), vec![format!("photo_id:{}", public_id)]);
    let entry = bot.registry.resolve(&public_id).expect("entry registered");
    assert_eq!(entry.original_ref, ui.file_id());
    assert_eq!(entry.caption.as_deref(), Some("harbour"));
    assert_eq!(bot.registry.len(), 1);

    // Broadcast pixels are exactly the block average of the original
    let source = decode(&original, &DecodeLimits::default()).unwrap().pixels;
    let expected = pixelate(&source, broadcast_block_size(240, 24));
    let broadcast = bot.chat.file(post.file_id()).unwrap();
    let broadcast = decode(&broadcast, &DecodeLimits::default()).unwrap().pixels;
    assert_eq!(broadcast, expected);
    assert_ne!(broadcast, source);
}

#[tokio::test]
async fn test_publish_confirms_in_approval_message() {
    // Test: The approval caption switches from ready to published
    let bot = BotHarness::new();
    let admin = User::anonymous(ADMIN);

    let ui = bot.submit(&admin, test_png(96, 64), Some("harbour")).await;
    let callback_id = bot.press(&admin, &ui, "publish").await;

    let ui = bot.refresh(&ui).expect("approval message kept");
    assert_eq!(
        ui.caption,
        Some(format!("harbour\n\n{}", Messages::default().publish_confirmation))
    );
    assert!(bot.chat.answered_callbacks().contains(&callback_id));
}

#[tokio::test]
async fn test_publish_without_caption_uses_generic_caption() {
    let bot = BotHarness::new();
    let admin = User::anonymous(ADMIN);

    let ui = bot.submit(&admin, test_png(96, 64), None).await;
    bot.press(&admin, &ui, "publish").await;

    let posts = bot.broadcast_posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].caption.as_deref(),
        Some(Messages::default().published_caption.as_str())
    );
}

#[tokio::test]
async fn test_non_admin_cannot_publish() {
    // Test: Anyone outside the allow-list is told so and nothing is posted
    let bot = BotHarness::new();
    let mallory = User::named(7, "mallory");

    let ui = bot.submit(&mallory, test_png(96, 64), None).await;
    bot.press(&mallory, &ui, "publish").await;

    assert!(bot.broadcast_posts().is_empty());
    assert!(bot.registry.is_empty());
    assert_eq!(bot.chat.texts_in(mallory.id), vec![Messages::default().not_admin]);
}

#[tokio::test]
async fn test_republish_overwrites_single_entry() {
    // Test: Publishing the same photo twice keeps one entry per public id
    let bot = BotHarness::new();
    let admin = User::anonymous(ADMIN);

    let ui = bot.submit(&admin, test_png(96, 64), Some("dock")).await;
    bot.press(&admin, &ui, "publish").await;
    let ui = bot.refresh(&ui).unwrap();
    bot.press(&admin, &ui, "publish").await;

    assert_eq!(bot.broadcast_posts().len(), 2);
    assert_eq!(bot.registry.len(), 1);

    // The caption already carries the confirmation, so it is not re-edited
    let ui = bot.refresh(&ui).unwrap();
    assert_eq!(
        ui.caption,
        Some(format!("dock\n\n{}", Messages::default().publish_confirmation))
    );
}

#[tokio::test]
async fn test_help_and_unsupported_text() {
    let bot = BotHarness::new();
    let user = User::anonymous(55);
    let messages = Messages::default();

    bot.send_text(&user, "/start").await;
    bot.send_text(&user, "hello").await;
    bot.send_text(&user, "where do I send photos?").await;

    assert_eq!(
        bot.chat.texts_in(user.id),
        vec![messages.help.clone(), messages.help, messages.no_photo]
    );
}
