//! Scripted in-memory queue service for router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use aws_sdk_sqs::types::Message;
use rs_sqs_router::{QueueServiceError, SqsRouterConfig, client::QueueService};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted answer to a poll.
pub enum Poll {
    Messages(Vec<Message>),
    Fail(QueueServiceError),
    /// Never completes.
    Hang,
}

#[derive(Default)]
struct State {
    scripts: HashMap<String, VecDeque<Poll>>,
    polls: HashMap<String, usize>,
    deletes: Vec<(String, String)>,
    delete_error: Option<QueueServiceError>,
}

/// Answers polls from a per-queue script, then with empty polls once the
/// script runs out.
#[derive(Clone, Default)]
pub struct ScriptedQueueService {
    state: Arc<Mutex<State>>,
}

impl ScriptedQueueService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, queue_url: &str, poll: Poll) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .entry(queue_url.to_string())
            .or_default()
            .push_back(poll);
    }

    pub fn polls(&self, queue_url: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .polls
            .get(queue_url)
            .copied()
            .unwrap_or(0)
    }

    /// Makes every later delete fail with `err`. Attempts are still recorded.
    pub fn fail_deletes(&self, err: QueueServiceError) {
        self.state.lock().unwrap().delete_error = Some(err);
    }

    /// Delete attempts, successful or not.
    pub fn deletes(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().deletes.clone()
    }
}

#[async_trait]
impl QueueService for ScriptedQueueService {
    async fn receive_messages(
        &self,
        queue_url: &str,
        _config: &SqsRouterConfig,
    ) -> Result<Vec<Message>, QueueServiceError> {
        let next = {
            let mut state = self.state.lock().unwrap();
            *state.polls.entry(queue_url.to_string()).or_default() += 1;
            state.scripts.get_mut(queue_url).and_then(VecDeque::pop_front)
        };

        match next {
            Some(Poll::Messages(messages)) => Ok(messages),
            Some(Poll::Fail(err)) => Err(err),
            Some(Poll::Hang) => std::future::pending().await,
            None => {
                tokio::time::sleep(Duration::from_millis(2)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), QueueServiceError> {
        let mut state = self.state.lock().unwrap();
        state
            .deletes
            .push((queue_url.to_string(), receipt_handle.to_string()));

        match &state.delete_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

pub fn message(body: &str, receipt_handle: &str) -> Message {
    Message::builder()
        .body(body)
        .receipt_handle(receipt_handle)
        .message_id(format!("id-{receipt_handle}"))
        .build()
}

pub fn message_without_receipt(body: &str) -> Message {
    Message::builder().body(body).message_id("id-no-receipt").build()
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Runs `fut` with a two second timeout.
pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(2), fut)
        .await
        .expect("timed out")
}
