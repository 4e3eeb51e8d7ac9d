//! Prints every SNS notification delivered to `SQS_URL` and deletes it.
//!
//! ```text
//! SQS_URL=https://sqs.us-east-1.amazonaws.com/123456789012/my-queue \
//!     RUST_LOG=info cargo run --example sns_printer
//! ```

use rs_sqs_router::{Context, SqsRouter, client::SqsQueueService};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "rs_sqs_router=info".into()),
        )
        .init();

    let queue_url = std::env::var("SQS_URL")?;
    let service = SqsQueueService::from_env().await;

    let mut router = SqsRouter::new(service);
    router.add_handler_fn(
        &queue_url,
        |mut ctx: Context, _: ()| async move {
            ctx.set_delete_on_finish(true);

            match ctx.notification() {
                Ok(notification) => println!("{notification:#?}"),
                Err(err) => error!(error = %err, "not an SNS notification"),
            }
            ctx
        },
        (),
    )?;

    let mut fatal = router.start()?;

    let failure = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("interrupted, shutting down");
            None
        }
        Some(err) = fatal.recv() => Some(err),
    };

    router.stop().await?;

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
