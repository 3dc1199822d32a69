//! Starting a refresh job.
//!
//! The accepted request shape varies between deployments, so each shape in
//! [`RefreshVariant::FALLBACK_ORDER`] is tried exactly once until one is
//! accepted. This is not a retry loop: the specific error never changes what
//! is tried next.

use thiserror::Error;
use tracing::{trace, warn};

use super::events::{RefreshEvent, RefreshReporter};
use crate::client::{ApiError, DocumentStoreApi, RefreshVariant};

/// Likely causes when the refresh endpoint answers with a 5xx.
pub const SERVER_ERROR_HINTS: &[&str] = &[
    "The document store may not have any loaders configured",
    "The vector store configuration may be invalid",
    "Check the server logs for more details",
];

/// One rejected request shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub variant: RefreshVariant,
    pub error: ApiError,
}

/// Every request shape was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to trigger refresh for store {store_id}: {}", describe_last(.attempts))]
pub struct TriggerError {
    pub store_id: String,
    pub attempts: Vec<AttemptFailure>,
}

fn describe_last(attempts: &[AttemptFailure]) -> String {
    match attempts.last() {
        Some(failure) => failure.error.to_string(),
        None => "no request shapes attempted".to_string(),
    }
}

impl TriggerError {
    pub fn last_failure(&self) -> Option<&AttemptFailure> {
        self.attempts.last()
    }

    pub fn last_status(&self) -> Option<u16> {
        self.last_failure().and_then(|f| f.error.status_code())
    }

    /// Body of the last response, or the transport error message.
    pub fn last_body(&self) -> Option<String> {
        self.last_failure().map(|f| f.error.body())
    }

    /// Actionable hints, only for server-side failures.
    pub fn hints(&self) -> &'static [&'static str] {
        match self.last_failure() {
            Some(f) if f.error.is_server_error() => SERVER_ERROR_HINTS,
            _ => &[],
        }
    }
}

/// Try every request shape in order. Returns the accepted shape.
pub async fn trigger_refresh(
    api: &dyn DocumentStoreApi,
    reporter: &dyn RefreshReporter,
    store_id: &str,
) -> Result<RefreshVariant, TriggerError> {
    trace!("Triggering refresh for store {} (Authorization=Bearer ***)", store_id);

    let mut attempts = Vec::with_capacity(RefreshVariant::FALLBACK_ORDER.len());

    for variant in RefreshVariant::FALLBACK_ORDER {
        reporter.report(RefreshEvent::TriggerAttempt {
            store_id: store_id.to_string(),
            variant,
        });

        match api.request_refresh(store_id, variant).await {
            Ok(_) => {
                trace!("Refresh for store {} accepted with {}", store_id, variant);
                reporter.report(RefreshEvent::TriggerSucceeded {
                    store_id: store_id.to_string(),
                    variant,
                });
                return Ok(variant);
            }
            Err(error) => {
                trace!("Refresh for store {} failed with {}: {}", store_id, variant, error);
                reporter.report(RefreshEvent::TriggerAttemptFailed {
                    store_id: store_id.to_string(),
                    variant,
                    error: error.clone(),
                });
                attempts.push(AttemptFailure { variant, error });
            }
        }
    }

    let error = TriggerError {
        store_id: store_id.to_string(),
        attempts,
    };
    warn!("{}", error);
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::test_support::{RecordingReporter, ScriptedApi};
    use crate::refresh::NullReporter;

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            status: code,
            body: format!("error {}", code),
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_accepted_variant() {
        let api = ScriptedApi::new().with_refresh(
            "s1",
            vec![
                Err(status(404)),
                Err(status(400)),
                Err(ApiError::Transport("reset".to_string())),
                Ok(()),
            ],
        );

        let accepted = trigger_refresh(&api, &NullReporter, "s1").await.unwrap();

        assert_eq!(accepted, RefreshVariant::PutNoBody);
        assert_eq!(
            api.refresh_calls("s1"),
            RefreshVariant::FALLBACK_ORDER[..4].to_vec()
        );
    }

    #[tokio::test]
    async fn test_first_variant_success_sends_one_request() {
        let api = ScriptedApi::new();
        let accepted = trigger_refresh(&api, &NullReporter, "s1").await.unwrap();
        assert_eq!(accepted, RefreshVariant::PostNoBody);
        assert_eq!(api.refresh_calls("s1").len(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_variant() {
        let api = ScriptedApi::new().with_refresh(
            "s1",
            vec![
                Err(status(404)),
                Err(status(405)),
                Err(status(415)),
                Err(status(405)),
                Err(status(422)),
            ],
        );

        let err = trigger_refresh(&api, &NullReporter, "s1")
            .await
            .unwrap_err();

        assert_eq!(err.attempts.len(), 5);
        let last = err.last_failure().unwrap();
        assert_eq!(last.variant, RefreshVariant::PutEmptyObject);
        assert_eq!(err.last_status(), Some(422));
        assert_eq!(err.last_body().as_deref(), Some("error 422"));
        assert!(err.hints().is_empty());
        assert_eq!(api.refresh_calls("s1").len(), 5);
    }

    #[tokio::test]
    async fn test_server_error_adds_hints() {
        let api = ScriptedApi::new().with_refresh("s1", vec![Err(status(500)); 5]);

        let err = trigger_refresh(&api, &NullReporter, "s1")
            .await
            .unwrap_err();

        assert_eq!(err.hints(), SERVER_ERROR_HINTS);
        assert_eq!(
            err.to_string(),
            "Failed to trigger refresh for store s1: HTTP 500: error 500"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_has_no_status() {
        let api = ScriptedApi::new().with_refresh(
            "s1",
            vec![Err(ApiError::Transport("connection refused".to_string())); 5],
        );

        let err = trigger_refresh(&api, &NullReporter, "s1")
            .await
            .unwrap_err();

        assert_eq!(err.last_status(), None);
        assert!(err.hints().is_empty());
        assert_eq!(
            err.last_body().as_deref(),
            Some("Network error: connection refused")
        );
    }

    #[tokio::test]
    async fn test_attempt_events_are_debug_level() {
        let api = ScriptedApi::new().with_refresh("s1", vec![Err(status(404)), Ok(())]);
        let reporter = RecordingReporter::default();

        trigger_refresh(&api, &reporter, "s1").await.unwrap();

        let events = reporter.events();
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.is_debug()));
        assert!(matches!(
            events[1],
            RefreshEvent::TriggerAttemptFailed {
                variant: RefreshVariant::PostNoBody,
                ..
            }
        ));
        assert!(matches!(
            events[3],
            RefreshEvent::TriggerSucceeded {
                variant: RefreshVariant::PostEmptyObject,
                ..
            }
        ));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_attempt_chatter_is_silent_at_debug_log_level() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);

        let api = ScriptedApi::new().with_refresh("s1", vec![Err(status(404)), Err(status(400))]);
        let accepted = trigger_refresh(&api, &NullReporter, "s1").await.unwrap();
        drop(guard);

        assert_eq!(accepted, RefreshVariant::PostEmptyItems);
        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.is_empty(), "{text}");
    }
}
