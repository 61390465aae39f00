//! Integration tests for events

#[cfg(test)]
mod tests {
    use yedctl_errors::{NetworkError, UserFacingError};
    use yedctl_events::*;

    #[tokio::test]
    async fn test_event_sender_emit_helpers() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_debug("test debug");

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            AppEvent::General(GeneralEvent::Error { .. })
        ));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(
            event2,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[test]
    fn test_failure_context_from_error() {
        let err = NetworkError::Timeout {
            url: "https://example.com".into(),
        };
        let failure = FailureContext::from_error(&err);
        assert_eq!(failure.code.as_deref(), Some("network.timeout"));
        assert_eq!(failure.message, err.user_message());
        assert!(failure.retryable);
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = AppEvent::Acquire(AcquireEvent::Started {
            version: "v0.3.6".into(),
            asset: "yed.linux".into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "acquire");
        assert_eq!(json["event"]["type"], "Started");
        assert_eq!(json["event"]["version"], "v0.3.6");
    }
}
