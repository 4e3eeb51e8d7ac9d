use async_trait::async_trait;
use std::future::Future;

use crate::context::Context;

/// Trait for implementing SQS message handlers.
///
/// A handler receives one message at a time through its [`Context`] and decides
/// whether the router should delete the message by calling
/// [`Context::set_delete_on_finish`].
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    async fn handle(&self, ctx: &mut Context);
}

/// Whether the listener waits for a handler invocation before polling again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// The handler runs on the listener's own task, one message at a time.
    Sync,
    /// Each invocation runs on its own spawned task.
    Async,
}

/// [`MessageHandler`] wrapping an async function and a shared resource.
///
/// The function takes ownership of the context and hands it back once it is
/// done, so the router sees every change the handler made.
///
/// # Type Parameters
///
/// * `F` - The message handler function type
/// * `Fut` - The future returned by the handler function
/// * `TShared` - The type of shared resources passed to the handler
pub struct HandlerFn<F, Fut, TShared>
where
    F: Fn(Context, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    handler_fn: F,
    shared_resources: TShared,
}

impl<F, Fut, TShared> HandlerFn<F, Fut, TShared>
where
    F: Fn(Context, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    /// Creates a new handler from a function and the resources it shares
    /// across invocations.
    pub fn new(handler_fn: F, shared_resources: TShared) -> Self {
        HandlerFn {
            handler_fn,
            shared_resources,
        }
    }
}

#[async_trait]
impl<F, Fut, TShared> MessageHandler for HandlerFn<F, Fut, TShared>
where
    F: Fn(Context, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    async fn handle(&self, ctx: &mut Context) {
        let returned = (self.handler_fn)(ctx.duplicate(), self.shared_resources.clone()).await;
        ctx.set_delete_on_finish(returned.delete_on_finish());
    }
}
