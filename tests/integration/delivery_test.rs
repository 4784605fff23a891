// Delivery integration tests
// Broadcast post button -> personalized copy in the requester's private chat

use super::test_harness::*;
use tracemark::config::Messages;
use tracemark::imaging::{decode, DecodeLimits};
use tracemark::watermark::{stamp, WatermarkText};

/// Submit and publish a photo, returning the broadcast post.
async fn published(bot: &BotHarness, png: Vec<u8>, caption: Option<&str>) -> StoredMessage {
    let admin = User::anonymous(ADMIN);
    let ui = bot.submit(&admin, png, caption).await;
    bot.press(&admin, &ui, "publish").await;
    bot.broadcast_posts().pop().expect("post published")
}

fn expected_copy(bot: &BotHarness, original: &[u8], primary: &str, secondary: Option<&str>) -> image::RgbaImage {
    let style = bot.config.watermark.to_stamp_style().unwrap();
    let source = decode(original, &DecodeLimits::default()).unwrap().pixels;
    let text = WatermarkText {
        primary: primary.to_string(),
        secondary: secondary.map(str::to_string),
    };
    stamp(source, &text, &style).unwrap()
}

fn delivered_pixels(bot: &BotHarness, message: &StoredMessage) -> image::RgbaImage {
    let data = bot.chat.file(message.file_id()).unwrap();
    decode(&data, &DecodeLimits::default()).unwrap().pixels
}

#[tokio::test]
async fn test_named_requester_gets_two_line_watermark() {
    // Test: A requester with a username gets name and id stamped on the original
    let bot = BotHarness::new();
    let original = test_png(320, 200);
    let post = published(&bot, original.clone(), Some("harbour")).await;

    let alice = User::named(1001, "alice");
    let data = post.callback_data().remove(0);
    bot.press(&alice, &post, &data).await;

    let delivered = bot.chat.photos_in(alice.id);
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].caption.as_deref(), Some("harbour"));
    assert!(delivered[0].keyboard.is_none());

    let pixels = delivered_pixels(&bot, &delivered[0]);
    assert_eq!(pixels, expected_copy(&bot, &original, "alice", Some("1001")));
    assert_ne!(pixels, decode(&original, &DecodeLimits::default()).unwrap().pixels);
}

#[tokio::test]
async fn test_anonymous_requester_gets_handle_only() {
    // Test: Without a username only the numeric id is stamped
    let bot = BotHarness::new();
    let original = test_png(320, 200);
    let post = published(&bot, original.clone(), None).await;

    let requester = User::anonymous(2002);
    let data = post.callback_data().remove(0);
    bot.press(&requester, &post, &data).await;

    let delivered = bot.chat.photos_in(requester.id);
    assert_eq!(delivered.len(), 1);
    // Generic post caption is replaced by the delivery caption
    assert_eq!(
        delivered[0].caption.as_deref(),
        Some(Messages::default().delivery_caption.as_str())
    );
    assert_eq!(
        delivered_pixels(&bot, &delivered[0]),
        expected_copy(&bot, &original, "2002", None)
    );
}

#[tokio::test]
async fn test_each_requester_gets_own_copy() {
    // Test: Two requesters receive differently stamped copies of the same original
    let bot = BotHarness::new();
    let post = published(&bot, test_png(320, 200), None).await;
    let data = post.callback_data().remove(0);

    let alice = User::named(1001, "alice");
    let bob = User::named(1002, "bob");
    bot.press(&alice, &post, &data).await;
    bot.press(&bob, &post, &data).await;
    bot.press(&alice, &post, &data).await;

    let alice_copies = bot.chat.photos_in(alice.id);
    let bob_copies = bot.chat.photos_in(bob.id);
    assert_eq!(alice_copies.len(), 2);
    assert_eq!(bob_copies.len(), 1);

    // Recomputed per request, never cached per requester
    assert_ne!(alice_copies[0].file_id(), alice_copies[1].file_id());
    assert_eq!(
        delivered_pixels(&bot, &alice_copies[0]),
        delivered_pixels(&bot, &alice_copies[1])
    );
    assert_ne!(
        delivered_pixels(&bot, &alice_copies[0]),
        delivered_pixels(&bot, &bob_copies[0])
    );
    assert!(bot.chat.photos_in(CHANNEL).len() == 1);
}

#[tokio::test]
async fn test_unknown_photo_is_unavailable() {
    // Test: A request for an id that was never published gets the unavailable notice
    let bot = BotHarness::new();
    let post = published(&bot, test_png(96, 64), None).await;
    let requester = User::anonymous(3003);

    let callback_id = bot.press(&requester, &post, "photo_id:never-published").await;

    assert!(bot.chat.photos_in(requester.id).is_empty());
    assert_eq!(
        bot.chat.texts_in(requester.id),
        vec![Messages::default().unavailable]
    );
    assert!(bot.chat.answered_callbacks().contains(&callback_id));
}
