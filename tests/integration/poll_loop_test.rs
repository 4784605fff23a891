// Run loop integration tests
// Scripted update source -> dispatcher -> fake platform

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use super::test_harness::*;
use tracemark::bot::{run, UpdateSource};
use tracemark::config::Messages;
use tracemark::transport::wire::Update;
use tracemark::transport::TransportError;

/// Plays back scripted batches, then signals that it ran dry.
struct ScriptedSource {
    batches: Mutex<VecDeque<Result<Vec<Update>, TransportError>>>,
    offsets: Mutex<Vec<Option<i64>>>,
    drained: Arc<Notify>,
}

impl ScriptedSource {
    fn new(batches: Vec<Result<Vec<Update>, TransportError>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            offsets: Mutex::new(Vec::new()),
            drained: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl UpdateSource for ScriptedSource {
    async fn next_batch(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError> {
        self.offsets.lock().push(offset);
        let next = self.batches.lock().pop_front();
        match next {
            Some(batch) => batch,
            None => {
                self.drained.notify_one();
                std::future::pending().await
            }
        }
    }
}

fn text_update(update_id: i64, chat: i64, text: &str) -> Update {
    serde_json::from_value(serde_json::json!({
        "update_id": update_id,
        "message": {"message_id": update_id, "chat": {"id": chat}, "text": text}
    }))
    .unwrap()
}

#[tokio::test]
async fn test_run_dispatches_until_shutdown() {
    // Test: Every update is handled before run returns, offsets advance,
    // and a poll error is survived
    let bot = BotHarness::new();
    let source = ScriptedSource::new(vec![
        Ok(vec![text_update(10, 5, "/help"), text_update(11, 6, "hi")]),
        Err(TransportError::Request("connection reset".to_string())),
        Ok(vec![text_update(12, 5, "no photo here")]),
    ]);
    let drained = Arc::clone(&source.drained);

    let dispatched = run(
        &source,
        Arc::clone(&bot.dispatcher),
        Duration::from_millis(1),
        Duration::from_secs(5),
        async move { drained.notified().await },
    )
    .await;

    assert_eq!(dispatched, 3);
    assert_eq!(
        *source.offsets.lock(),
        vec![None, Some(12), Some(12), Some(13)]
    );

    let messages = Messages::default();
    assert_eq!(bot.chat.texts_in(5), vec![messages.help.clone(), messages.no_photo]);
    assert_eq!(bot.chat.texts_in(6), vec![messages.help]);
}

#[tokio::test]
async fn test_run_stops_immediately_on_shutdown() {
    let bot = BotHarness::new();
    let source = ScriptedSource::new(Vec::new());

    let dispatched = run(
        &source,
        Arc::clone(&bot.dispatcher),
        Duration::from_millis(1),
        Duration::from_secs(5),
        async {},
    )
    .await;

    assert_eq!(dispatched, 0);
}
