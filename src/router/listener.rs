use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::client::QueueService;
use crate::errors::SqsRouterError;
use crate::router::SqsRouterConfig;
use crate::router::classify::{ErrorClass, classify};
use crate::router::dispatch::Dispatcher;

/// How a listener loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerExit {
    Stopped,
    Fatal,
}

/// Polls one queue until a stop request arrives or the queue turns out not to exist.
pub(crate) struct Listener {
    pub(crate) queue_url: Arc<str>,
    pub(crate) service: Arc<dyn QueueService>,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) config: SqsRouterConfig,
}

impl Listener {
    /// Runs the polling loop.
    ///
    /// The stop request is checked before every poll; once it is seen no further
    /// poll is issued. A dropped sender counts as a stop request. The fatal
    /// queue-not-found condition is sent on `fatal_tx` once and ends the loop.
    pub(crate) async fn run(
        self,
        mut stop_rx: oneshot::Receiver<()>,
        fatal_tx: mpsc::UnboundedSender<SqsRouterError>,
    ) -> ListenerExit {
        info!(queue_url = %self.queue_url, "listener started");

        loop {
            match stop_rx.try_recv() {
                Err(oneshot::error::TryRecvError::Empty) => {}
                Ok(()) | Err(oneshot::error::TryRecvError::Closed) => {
                    info!(queue_url = %self.queue_url, "listener stopped");
                    return ListenerExit::Stopped;
                }
            }

            match self.service.receive_messages(&self.queue_url, &self.config).await {
                Ok(messages) => {
                    for message in messages {
                        self.dispatcher.dispatch(message).await;
                    }
                }
                Err(err) => match classify(&err) {
                    ErrorClass::QueueNotFound => {
                        error!(
                            queue_url = %self.queue_url,
                            error = %err,
                            "queue not found, listener giving up"
                        );
                        let fatal = SqsRouterError::QueueNotFound {
                            queue_url: self.queue_url.to_string(),
                        };
                        if fatal_tx.send(fatal).is_err() {
                            error!(queue_url = %self.queue_url, "fatal error receiver dropped");
                        }
                        return ListenerExit::Fatal;
                    }
                    ErrorClass::Unauthorized => {
                        warn!(
                            queue_url = %self.queue_url,
                            error = %err,
                            "no valid credentials, retrying"
                        );
                    }
                    ErrorClass::Service { code, message } => {
                        error!(queue_url = %self.queue_url, code = %code, "{message}");
                    }
                    ErrorClass::Unknown(text) => {
                        error!(queue_url = %self.queue_url, "{text}");
                    }
                },
            }

            // Services that answer without suspending would otherwise starve the runtime.
            tokio::task::yield_now().await;
        }
    }
}
