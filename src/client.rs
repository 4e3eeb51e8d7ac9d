use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_sqs::config::{BehaviorVersion, SharedCredentialsProvider};
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::types::Message;

use crate::errors::QueueServiceError;
use crate::router::SqsRouterConfig;

/// Error code reported when no credentials could be resolved on the client side.
pub const NO_CREDENTIALS_CODE: &str = "NoCredentialProviders";

/// The queue operations the router needs from a message queue service.
///
/// One implementation is shared by every listener of a router, so calls must be
/// stateless request/response operations.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Polls `queue_url` once, returning whatever messages the service delivered.
    ///
    /// The router asks for at most `config.max_number_of_messages` messages but
    /// tolerates receiving more.
    async fn receive_messages(
        &self,
        queue_url: &str,
        config: &SqsRouterConfig,
    ) -> Result<Vec<Message>, QueueServiceError>;

    /// Deletes the delivered message instance identified by `receipt_handle`.
    async fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), QueueServiceError>;
}

/// [`QueueService`] backed by an `aws_sdk_sqs::Client`.
#[derive(Debug, Clone)]
pub struct SqsQueueService {
    client: aws_sdk_sqs::Client,
}

impl SqsQueueService {
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        SqsQueueService { client }
    }

    /// Creates a service using credentials and configuration from the environment.
    ///
    /// This loads AWS configuration from environment variables such as:
    /// - `AWS_ACCESS_KEY_ID`
    /// - `AWS_SECRET_ACCESS_KEY`
    /// - `AWS_REGION`
    /// - `AWS_PROFILE`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use rs_sqs_router::client::SqsQueueService;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let service = SqsQueueService::from_env().await;
    ///     // Hand the service to a router...
    /// }
    /// ```
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        SqsQueueService::new(aws_sdk_sqs::Client::new(&config))
    }

    /// Creates a service with explicitly provided credentials and region.
    ///
    /// # Arguments
    ///
    /// * `access_key_id` - The AWS access key ID
    /// * `secret_access_key` - The AWS secret access key
    /// * `region` - The AWS region (e.g., "us-east-1", "eu-west-1")
    pub fn with_credentials(access_key_id: &str, secret_access_key: &str, region: &str) -> Self {
        let credentials = aws_sdk_sqs::config::Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "sqs-router",
        );

        let config = aws_sdk_sqs::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .build();

        SqsQueueService::new(aws_sdk_sqs::Client::from_conf(config))
    }

    /// The underlying SDK client.
    pub fn client(&self) -> &aws_sdk_sqs::Client {
        &self.client
    }
}

#[async_trait]
impl QueueService for SqsQueueService {
    async fn receive_messages(
        &self,
        queue_url: &str,
        config: &SqsRouterConfig,
    ) -> Result<Vec<Message>, QueueServiceError> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(config.max_number_of_messages)
            .wait_time_seconds(config.wait_time_seconds)
            .send()
            .await
            .map_err(from_sdk_error)?;

        Ok(output.messages.unwrap_or_default())
    }

    async fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), QueueServiceError> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(from_sdk_error)?;

        Ok(())
    }
}

fn from_sdk_error<E, R>(err: SdkError<E, R>) -> QueueServiceError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    if let Some(service_err) = err.as_service_error() {
        if let Some(code) = service_err.code() {
            return QueueServiceError::service(code, service_err.message().unwrap_or_default());
        }
    }

    let text = DisplayErrorContext(&err).to_string();
    // Identity resolution failures never reach the service, so they carry no code.
    if matches!(err, SdkError::DispatchFailure(_) | SdkError::ConstructionFailure(_))
        && text.to_ascii_lowercase().contains("credential")
    {
        return QueueServiceError::service(NO_CREDENTIALS_CODE, text);
    }

    QueueServiceError::Unstructured(text)
}
