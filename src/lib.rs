//! # SQS Router
//!
//! An asynchronous AWS SQS consumer router: register one handler per queue, and
//! the router polls every queue on its own task and hands each received message
//! to that queue's handler.
//!
//! ## Features
//!
//! - One listener task per registered queue, started and stopped together
//! - Sync handlers, processed one message at a time in arrival order
//! - Async handlers, each invocation on its own task, optionally bounded
//! - Handler-controlled deletion through [`Context::set_delete_on_finish`]
//! - Continue-on-error polling; only a missing queue stops a listener
//! - Graceful stop that waits for every listener to exit
//! - SNS notification envelope parsing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rs_sqs_router::{Context, SqsRouter, client::SqsQueueService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = SqsQueueService::from_env().await;
//!     let queue_url = "https://sqs.region.amazonaws.com/account/queue-name";
//!     let shared_data = "shared state".to_string();
//!
//!     let mut router = SqsRouter::new(service);
//!     router.add_handler_fn(
//!         queue_url,
//!         |mut ctx: Context, shared: String| async move {
//!             if let Ok(notification) = ctx.notification() {
//!                 println!("Processing {} with shared: {}", notification.message, shared);
//!                 ctx.set_delete_on_finish(true);
//!             }
//!             ctx
//!         },
//!         shared_data,
//!     )?;
//!
//!     let mut fatal = router.start()?;
//!     tokio::select! {
//!         _ = tokio::signal::ctrl_c() => {}
//!         Some(err) = fatal.recv() => eprintln!("{err}"),
//!     }
//!     router.stop().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod context;
pub mod envelope;
pub mod errors;
pub mod router;

pub use context::Context;
pub use envelope::NotificationEnvelope;
pub use errors::{QueueServiceError, SqsRouterError};
pub use router::{InvocationMode, MessageHandler, SqsRouter, SqsRouterConfig};
