//! Slot state
//!
//! Each dashboard resource lives in a slot that is `Loading`, `Error(reason)`,
//! `Loaded(value)` or `Stale { value, error }`. A slot goes stale when a
//! refresh fails after an earlier fetch succeeded.

use serde::Serialize;

/// State of one independently fetched resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Slot<T> {
    /// No response yet
    Loading,
    /// Last fetch failed and nothing was ever loaded; carries the reason
    Error(String),
    /// Last fetch succeeded
    Loaded(T),
    /// Last fetch failed; keeps the value from the last successful one
    Stale { value: T, error: String },
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Loading
    }
}

impl<T> Slot<T> {
    /// Slot for a completed fetch
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Slot::Loaded(value),
            Err(e) => Slot::Error(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Slot::Loading)
    }

    /// Loaded, stale or failed
    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    /// The latest fetch failed, whether or not an older value is kept
    pub fn is_error(&self) -> bool {
        matches!(self, Slot::Error(_) | Slot::Stale { .. })
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Slot::Stale { .. })
    }

    /// Most recent successfully fetched value, stale or not
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Slot::Loaded(value) | Slot::Stale { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Reason the latest fetch failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Slot::Error(reason) | Slot::Stale { error: reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl<T: Clone> Slot<T> {
    /// Slot that results from `next` arriving while `self` is shown
    ///
    /// Success always replaces. A failure keeps the last loaded value.
    pub fn merge(&self, next: Slot<T>) -> Slot<T> {
        match (self.loaded(), next) {
            (Some(value), Slot::Error(error)) => Slot::Stale {
                value: value.clone(),
                error,
            },
            (_, next) => next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_loading() {
        let slot: Slot<f64> = Slot::default();
        assert!(slot.is_loading());
        assert!(!slot.is_settled());
        assert_eq!(slot.loaded(), None);
    }

    #[test]
    fn test_from_result() {
        let ok: Slot<u32> = Slot::from_result(Ok::<_, String>(7));
        assert_eq!(ok.loaded(), Some(&7));

        let err: Slot<u32> = Slot::from_result(Err("connection refused"));
        assert!(err.is_error());
        assert!(err.is_settled());
        assert_eq!(err.error(), Some("connection refused"));
    }

    #[test]
    fn test_merge_failure_keeps_last_value() {
        let loaded = Slot::Loaded(7u32);

        let stale = loaded.merge(Slot::Error("timeout".to_string()));
        assert_eq!(
            stale,
            Slot::Stale {
                value: 7,
                error: "timeout".to_string()
            }
        );
        assert!(stale.is_error());
        assert_eq!(stale.loaded(), Some(&7));
        assert_eq!(stale.error(), Some("timeout"));

        // A second failure keeps the same value with the newer reason
        let again = stale.merge(Slot::Error("HTTP 502: bad gateway".to_string()));
        assert_eq!(again.loaded(), Some(&7));
        assert_eq!(again.error(), Some("HTTP 502: bad gateway"));

        // Success clears staleness
        assert_eq!(again.merge(Slot::Loaded(9)), Slot::Loaded(9));
    }

    #[test]
    fn test_merge_failure_without_value() {
        let loading: Slot<u32> = Slot::Loading;
        let failed = loading.merge(Slot::Error("refused".to_string()));
        assert_eq!(failed, Slot::Error("refused".to_string()));

        let still = failed.merge(Slot::Error("timeout".to_string()));
        assert_eq!(still, Slot::Error("timeout".to_string()));
    }

    #[test]
    fn test_serialize_tagged() {
        let loading: Slot<f64> = Slot::Loading;
        assert_eq!(
            serde_json::to_value(&loading).unwrap(),
            serde_json::json!({"status": "loading"})
        );

        let loaded = Slot::Loaded(1.5);
        assert_eq!(
            serde_json::to_value(&loaded).unwrap(),
            serde_json::json!({"status": "loaded", "data": 1.5})
        );

        let error: Slot<f64> = Slot::Error("HTTP 500: boom".to_string());
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!({"status": "error", "data": "HTTP 500: boom"})
        );

        let stale = Slot::Stale {
            value: 1.5,
            error: "timeout".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&stale).unwrap(),
            serde_json::json!({"status": "stale", "data": {"value": 1.5, "error": "timeout"}})
        );
    }
}
