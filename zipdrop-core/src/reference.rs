//! Extracts a download reference from a file host's response body.
//!
//! The host does not keep a stable shape: the link may sit at the top level,
//! one level down under `data`, or be missing even on a 2xx answer. The rules
//! are applied in order and the first match wins:
//!
//! 1. top-level `link` is a string
//! 2. `data.link` is a string
//! 3. otherwise [`UploadResult::Unresolved`], keeping the raw body
//!
//! A body that is not JSON at all is treated like rule 3.

use serde_json::Value;
use tracing::{debug, warn};

use crate::contract::UploadResult;

pub fn resolve_reference(body: &str) -> UploadResult {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Upload response is not JSON");
            return UploadResult::Unresolved {
                raw_response: body.to_string(),
                success_flag: false,
            };
        }
    };

    let top_level = value.get("link").and_then(Value::as_str);
    let nested = || {
        value
            .get("data")
            .filter(|d| d.is_object())
            .and_then(|d| d.get("link"))
            .and_then(Value::as_str)
    };

    if let Some(reference) = top_level.or_else(nested) {
        debug!(reference, "Resolved download reference");
        return UploadResult::Resolved {
            reference: reference.to_string(),
        };
    }

    let success_flag = value
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    UploadResult::Unresolved {
        raw_response: body.to_string(),
        success_flag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::UNRESOLVED_REFERENCE;

    #[test]
    fn top_level_link_wins() {
        let result = resolve_reference(r#"{"success": true, "link": "https://x/1"}"#);
        assert_eq!(
            result,
            UploadResult::Resolved {
                reference: "https://x/1".into()
            }
        );
    }

    #[test]
    fn nested_link_is_used_when_top_level_is_missing() {
        let result = resolve_reference(r#"{"data": {"link": "https://x/2"}}"#);
        assert_eq!(result.reference(), "https://x/2");
        assert!(result.is_resolved());
    }

    #[test]
    fn top_level_link_is_preferred_over_nested() {
        let result =
            resolve_reference(r#"{"link": "https://top", "data": {"link": "https://nested"}}"#);
        assert_eq!(result.reference(), "https://top");
    }

    #[test]
    fn non_string_top_level_link_falls_through_to_nested() {
        let body = r#"{"link": {"href": "x"}, "data": {"link": "https://x/3"}}"#;
        let result = resolve_reference(body);
        assert_eq!(result.reference(), "https://x/3");
    }

    #[test]
    fn success_without_link_is_unresolved_with_flag_set() {
        let body = r#"{"success": true}"#;
        let result = resolve_reference(body);
        assert_eq!(
            result,
            UploadResult::Unresolved {
                raw_response: body.into(),
                success_flag: true,
            }
        );
        assert_eq!(result.reference(), UNRESOLVED_REFERENCE);
    }

    #[test]
    fn no_success_and_no_link_is_unresolved_without_flag() {
        let body = r#"{"success": false, "data": {"link": 42}}"#;
        match resolve_reference(body) {
            UploadResult::Unresolved {
                raw_response,
                success_flag,
            } => {
                assert_eq!(raw_response, body);
                assert!(!success_flag);
            }
            other => panic!("expected unresolved, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_unresolved() {
        let result = resolve_reference("<html>bad gateway</html>");
        assert!(matches!(
            result,
            UploadResult::Unresolved {
                success_flag: false,
                ..
            }
        ));
    }
}
