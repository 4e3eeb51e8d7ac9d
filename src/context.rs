use aws_sdk_sqs::types::Message;

use crate::envelope::NotificationEnvelope;
use crate::errors::SqsRouterError;

/// The unit of work handed to a handler: one received message plus the
/// handler's decision on whether the router should delete it afterwards.
///
/// A fresh context is built for every dispatched message. The router reads
/// [`delete_on_finish`](Context::delete_on_finish) only once the handler has
/// returned, so the last value set wins.
#[derive(Debug)]
pub struct Context {
    message: Message,
    delete_on_finish: bool,
}

impl Context {
    /// Wraps a received message with `delete_on_finish` cleared.
    pub fn new(message: Message) -> Self {
        Context {
            message,
            delete_on_finish: false,
        }
    }

    /// The received message, as delivered by the service.
    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn body(&self) -> Option<&str> {
        self.message.body()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message.message_id()
    }

    /// The token identifying this delivery, required to delete the message.
    pub fn receipt_handle(&self) -> Option<&str> {
        self.message.receipt_handle()
    }

    /// Parses the message body as an SNS notification envelope.
    ///
    /// A parse failure is returned to the caller only; it neither changes
    /// `delete_on_finish` nor affects the listener.
    pub fn notification(&self) -> Result<NotificationEnvelope, SqsRouterError> {
        let body = self.body().ok_or(SqsRouterError::MissingBody)?;
        NotificationEnvelope::parse(body)
    }

    /// Requests (or withdraws a request) that the router delete the message once
    /// the handler returns normally.
    pub fn set_delete_on_finish(&mut self, delete: bool) {
        self.delete_on_finish = delete;
    }

    /// Whether the router will delete the message once the handler returns.
    pub fn delete_on_finish(&self) -> bool {
        self.delete_on_finish
    }

    pub(crate) fn duplicate(&self) -> Self {
        Context {
            message: self.message.clone(),
            delete_on_finish: self.delete_on_finish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: Option<&str>) -> Message {
        Message::builder()
            .set_body(body.map(str::to_string))
            .receipt_handle("r1")
            .message_id("m1")
            .build()
    }

    #[test]
    fn delete_flag_defaults_to_false_and_last_write_wins() {
        let mut ctx = Context::new(message(Some("{}")));
        assert!(!ctx.delete_on_finish());

        ctx.set_delete_on_finish(true);
        ctx.set_delete_on_finish(false);
        ctx.set_delete_on_finish(true);

        assert!(ctx.delete_on_finish());
        assert_eq!(ctx.receipt_handle(), Some("r1"));
        assert_eq!(ctx.message_id(), Some("m1"));
    }

    #[test]
    fn notification_without_body_is_an_error() {
        let ctx = Context::new(message(None));
        assert!(matches!(ctx.notification(), Err(SqsRouterError::MissingBody)));
    }

    #[test]
    fn parse_failure_leaves_delete_flag_untouched() {
        let mut ctx = Context::new(message(Some("not json")));
        ctx.set_delete_on_finish(true);

        assert!(ctx.notification().is_err());
        assert!(ctx.delete_on_finish());
    }
}
