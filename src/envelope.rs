//! SNS notification envelope carried in the body of SNS-to-SQS deliveries.

use serde::Deserialize;

use crate::errors::SqsRouterError;

/// An SNS notification as delivered to a subscribed SQS queue.
///
/// Fields absent from the JSON decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NotificationEnvelope {
    #[serde(rename = "Type")]
    pub notification_type: String,
    pub message_id: String,
    pub topic_arn: String,
    pub message: String,
    pub timestamp: String,
    pub signature_version: String,
    pub signature: String,
    #[serde(rename = "SignatureCertURL")]
    pub signature_cert_url: String,
    #[serde(rename = "UnsubscribeURL")]
    pub unsubscribe_url: String,
}

impl NotificationEnvelope {
    /// Decodes a message body, returning [`SqsRouterError::Envelope`] when it is
    /// not a JSON object of the expected shape.
    pub fn parse(body: &str) -> Result<Self, SqsRouterError> {
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_notification() {
        let body = r#"{
            "Type": "Notification",
            "MessageId": "22b80b92-fdea-4c2c-8f9d-bdfb0c7bf324",
            "TopicArn": "arn:aws:sns:us-west-2:123456789012:MyTopic",
            "Message": "hello",
            "Timestamp": "2012-05-02T00:54:06.655Z",
            "SignatureVersion": "1",
            "Signature": "EXAMPLEw6JRN",
            "SignatureCertURL": "https://sns.us-west-2.amazonaws.com/cert.pem",
            "UnsubscribeURL": "https://sns.us-west-2.amazonaws.com/?Action=Unsubscribe"
        }"#;

        let envelope = NotificationEnvelope::parse(body).unwrap();

        assert_eq!(envelope.notification_type, "Notification");
        assert_eq!(envelope.message_id, "22b80b92-fdea-4c2c-8f9d-bdfb0c7bf324");
        assert_eq!(envelope.topic_arn, "arn:aws:sns:us-west-2:123456789012:MyTopic");
        assert_eq!(envelope.message, "hello");
        assert_eq!(envelope.signature_version, "1");
        assert_eq!(
            envelope.signature_cert_url,
            "https://sns.us-west-2.amazonaws.com/cert.pem"
        );
        assert_eq!(
            envelope.unsubscribe_url,
            "https://sns.us-west-2.amazonaws.com/?Action=Unsubscribe"
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let envelope =
            NotificationEnvelope::parse(r#"{"Type":"Notification","Message":"hello"}"#).unwrap();

        assert_eq!(envelope.message, "hello");
        assert!(envelope.topic_arn.is_empty());
        assert!(envelope.signature.is_empty());
    }

    #[test]
    fn rejects_non_json_body() {
        let err = NotificationEnvelope::parse("not json").unwrap_err();
        assert!(matches!(err, SqsRouterError::Envelope(_)));
    }
}
