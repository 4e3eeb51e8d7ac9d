use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::client::QueueService;
use crate::context::Context;
use crate::errors::SqsRouterError;

mod classify;
mod config;
mod dispatch;
mod handler;
mod listener;

pub use classify::{ErrorClass, classify};
pub use config::SqsRouterConfig;
pub use handler::{HandlerFn, InvocationMode, MessageHandler};

use dispatch::Dispatcher;
use listener::{Listener, ListenerExit};

/// Receives the fatal error of every listener that gave up on its queue.
pub type FatalErrors = mpsc::UnboundedReceiver<SqsRouterError>;

/// A queue together with the handler that processes its messages.
struct HandlerRegistration {
    queue_url: Arc<str>,
    handler: Arc<dyn MessageHandler>,
    mode: InvocationMode,
}

/// The stop side of a running listener.
///
/// Sending on `stop_tx` asks the listener to exit; completion of `join` is the
/// acknowledgment that it has.
struct ListenerHandle {
    queue_url: Arc<str>,
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<ListenerExit>,
}

/// Routes messages from SQS queues to their registered handlers.
///
/// One listener task runs per registration between [`start`](SqsRouter::start)
/// and [`stop`](SqsRouter::stop). Dropping a running router makes each listener
/// exit before its next poll, without waiting for it.
///
/// # Example
///
/// ```rust,no_run
/// use rs_sqs_router::{client::SqsQueueService, router::SqsRouter};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = SqsQueueService::from_env().await;
///     let mut router = SqsRouter::new(service);
///
///     router.add_handler_fn(
///         "https://sqs.region.amazonaws.com/account/queue-name",
///         |mut ctx, _: ()| async move {
///             println!("Processing message: {:?}", ctx.body());
///             ctx.set_delete_on_finish(true);
///             ctx
///         },
///         (),
///     )?;
///
///     let _fatal = router.start()?;
///     tokio::signal::ctrl_c().await?;
///     router.stop().await?;
///     Ok(())
/// }
/// ```
pub struct SqsRouter {
    service: Arc<dyn QueueService>,
    config: SqsRouterConfig,
    registrations: Vec<HandlerRegistration>,
    listeners: Option<Vec<ListenerHandle>>,
}

impl SqsRouter {
    pub fn new(service: impl QueueService + 'static) -> Self {
        SqsRouter::with_config(service, SqsRouterConfig::default())
    }

    pub fn with_config(service: impl QueueService + 'static, config: SqsRouterConfig) -> Self {
        SqsRouter {
            service: Arc::new(service),
            config,
            registrations: Vec::new(),
            listeners: None,
        }
    }

    /// Registers a handler whose invocations the listener waits for, so messages
    /// from `queue_url` are handled one at a time in arrival order.
    pub fn add_handler(
        &mut self,
        queue_url: &str,
        handler: impl MessageHandler,
    ) -> Result<(), SqsRouterError> {
        self.register(queue_url, Arc::new(handler), InvocationMode::Sync)
    }

    /// Registers a handler whose invocations each run on their own task while the
    /// listener keeps polling.
    pub fn add_async_handler(
        &mut self,
        queue_url: &str,
        handler: impl MessageHandler,
    ) -> Result<(), SqsRouterError> {
        self.register(queue_url, Arc::new(handler), InvocationMode::Async)
    }

    /// Registers an async function as a sync-mode handler.
    ///
    /// # Arguments
    ///
    /// * `queue_url` - The SQS queue URL to poll
    /// * `handler_fn` - Receives the context and a clone of `shared_resources`,
    ///   and returns the context when done
    /// * `shared_resources` - Resources shared between message processing calls
    pub fn add_handler_fn<F, Fut, TShared>(
        &mut self,
        queue_url: &str,
        handler_fn: F,
        shared_resources: TShared,
    ) -> Result<(), SqsRouterError>
    where
        F: Fn(Context, TShared) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Context> + Send + 'static,
        TShared: Send + Sync + Clone + 'static,
    {
        self.add_handler(queue_url, HandlerFn::new(handler_fn, shared_resources))
    }

    /// Registers an async function as an async-mode handler.
    pub fn add_async_handler_fn<F, Fut, TShared>(
        &mut self,
        queue_url: &str,
        handler_fn: F,
        shared_resources: TShared,
    ) -> Result<(), SqsRouterError>
    where
        F: Fn(Context, TShared) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Context> + Send + 'static,
        TShared: Send + Sync + Clone + 'static,
    {
        self.add_async_handler(queue_url, HandlerFn::new(handler_fn, shared_resources))
    }

    fn register(
        &mut self,
        queue_url: &str,
        handler: Arc<dyn MessageHandler>,
        mode: InvocationMode,
    ) -> Result<(), SqsRouterError> {
        if self.is_running() {
            return Err(SqsRouterError::AlreadyStarted);
        }

        self.registrations.push(HandlerRegistration {
            queue_url: Arc::from(queue_url),
            handler,
            mode,
        });
        Ok(())
    }

    /// Spawns one listener per registration.
    ///
    /// Must be called from within a tokio runtime. The returned receiver yields
    /// [`SqsRouterError::QueueNotFound`] once for every listener whose queue does
    /// not exist; that listener has already stopped polling. What to do about it
    /// is up to the caller, who still calls [`stop`](SqsRouter::stop) as usual.
    pub fn start(&mut self) -> Result<FatalErrors, SqsRouterError> {
        if self.is_running() {
            return Err(SqsRouterError::AlreadyStarted);
        }

        let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();
        let listeners: Vec<ListenerHandle> = self
            .registrations
            .iter()
            .map(|registration| {
                let (stop_tx, stop_rx) = oneshot::channel();
                let listener = Listener {
                    queue_url: registration.queue_url.clone(),
                    service: self.service.clone(),
                    dispatcher: Dispatcher::new(
                        registration.queue_url.clone(),
                        registration.handler.clone(),
                        registration.mode,
                        self.service.clone(),
                        self.config.max_concurrent_handlers,
                    ),
                    config: self.config.clone(),
                };

                ListenerHandle {
                    queue_url: registration.queue_url.clone(),
                    stop_tx,
                    join: tokio::spawn(listener.run(stop_rx, fatal_tx.clone())),
                }
            })
            .collect();

        self.listeners = Some(listeners);
        info!(listeners = self.registrations.len(), "router started");
        Ok(fatal_rx)
    }

    /// Stops every listener in registration order, waiting for each to exit
    /// before signalling the next.
    ///
    /// A listener finishes its in-progress poll and, in sync mode, the handler
    /// invocation it is running before it observes the request. Async handler
    /// tasks that are still running are not waited for.
    pub async fn stop(&mut self) -> Result<(), SqsRouterError> {
        let listeners = self.listeners.take().ok_or(SqsRouterError::NotStarted)?;

        for listener in listeners {
            // A listener that already exited has dropped its receiver.
            let _ = listener.stop_tx.send(());

            match listener.join.await {
                Ok(exit) => {
                    info!(queue_url = %listener.queue_url, ?exit, "listener acknowledged stop");
                }
                Err(err) => {
                    error!(queue_url = %listener.queue_url, error = %err, "listener task failed");
                }
            }
        }

        info!("router stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.listeners.is_some()
    }

    /// Registered queue URLs, in registration order.
    pub fn queue_urls(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.queue_url.as_ref())
    }
}
