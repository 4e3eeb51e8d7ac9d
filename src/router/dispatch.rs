use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use aws_sdk_sqs::types::Message;
use futures::FutureExt;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use crate::client::QueueService;
use crate::context::Context;
use crate::router::handler::{InvocationMode, MessageHandler};

/// Runs a queue's handler for each received message and performs the
/// requested delete afterwards.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    queue_url: Arc<str>,
    handler: Arc<dyn MessageHandler>,
    mode: InvocationMode,
    service: Arc<dyn QueueService>,
    limiter: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    pub(crate) fn new(
        queue_url: Arc<str>,
        handler: Arc<dyn MessageHandler>,
        mode: InvocationMode,
        service: Arc<dyn QueueService>,
        max_concurrent_handlers: Option<usize>,
    ) -> Self {
        Dispatcher {
            queue_url,
            handler,
            mode,
            service,
            limiter: max_concurrent_handlers.map(|max| Arc::new(Semaphore::new(max.max(1)))),
        }
    }

    /// Sync mode returns once the handler and delete are done. Async mode
    /// returns as soon as the invocation is spawned.
    pub(crate) async fn dispatch(&self, message: Message) {
        match self.mode {
            InvocationMode::Sync => self.process(message).await,
            InvocationMode::Async => {
                let permit = match &self.limiter {
                    // The semaphore is never closed, so acquiring only fails if it is.
                    Some(limiter) => limiter.clone().acquire_owned().await.ok(),
                    None => None,
                };

                let dispatcher = self.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    dispatcher.process(message).await;
                });
            }
        }
    }

    // The delete decision is read on the same task that ran the handler.
    async fn process(&self, message: Message) {
        let mut ctx = Context::new(message);
        debug!(queue_url = %self.queue_url, message_id = ?ctx.message_id(), "dispatching message");

        let outcome = AssertUnwindSafe(self.handler.handle(&mut ctx))
            .catch_unwind()
            .await;
        if outcome.is_err() {
            error!(
                queue_url = %self.queue_url,
                message_id = ?ctx.message_id(),
                "handler panicked, message left on queue"
            );
            return;
        }

        if !ctx.delete_on_finish() {
            return;
        }

        let Some(receipt_handle) = ctx.receipt_handle() else {
            warn!(
                queue_url = %self.queue_url,
                message_id = ?ctx.message_id(),
                "message has no receipt handle, skipping delete"
            );
            return;
        };

        if let Err(err) = self.service.delete_message(&self.queue_url, receipt_handle).await {
            error!(
                queue_url = %self.queue_url,
                receipt_handle,
                error = %err,
                "failed to delete message"
            );
        }
    }
}
