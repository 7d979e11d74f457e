//! Query and path parameter parsing.
//!
//! These are the HTTP front-door checks. They are stricter than the service
//! (which clamps instead of rejecting) so that obviously wrong requests get a
//! 400 instead of a silently adjusted result.

use serde::Deserialize;

use parley_types::message::MessageId;

use crate::http::error::AppError;

/// Raw query parameters for the message list endpoint.
///
/// Kept as strings so that non-numeric input produces our own 400 body
/// instead of the framework's plain-text rejection.
#[derive(Debug, Deserialize, Default)]
pub struct MessageListQuery {
    /// Maximum results (1..=100, default 50).
    pub limit: Option<String>,
    /// Offset for pagination (>= 0, default 0).
    pub offset: Option<String>,
}

/// Validated list parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl MessageListQuery {
    pub fn validate(&self) -> Result<ListParams, AppError> {
        let limit = match non_empty(&self.limit) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if (1..=100).contains(&n) => Some(n),
                _ => {
                    return Err(AppError::BadRequest(
                        "Limit must be between 1 and 100".to_string(),
                    ));
                }
            },
            None => None,
        };

        let offset = match non_empty(&self.offset) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => Some(n),
                _ => {
                    return Err(AppError::BadRequest(
                        "Offset must be a positive number".to_string(),
                    ));
                }
            },
            None => None,
        };

        Ok(ListParams { limit, offset })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a message id path segment; must be a positive integer.
pub fn parse_message_id(raw: &str) -> Result<MessageId, AppError> {
    match raw.parse::<MessageId>() {
        Ok(id) if id.0 >= 1 => Ok(id),
        _ => Err(AppError::BadRequest(
            "ID must be a positive integer".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> MessageListQuery {
        MessageListQuery {
            limit: limit.map(String::from),
            offset: offset.map(String::from),
        }
    }

    #[test]
    fn defaults_when_absent() {
        assert_eq!(query(None, None).validate().unwrap(), ListParams::default());
        assert_eq!(query(Some(""), Some(" ")).validate().unwrap(), ListParams::default());
    }

    #[test]
    fn accepts_in_range_values() {
        let params = query(Some("100"), Some("0")).validate().unwrap();
        assert_eq!(params.limit, Some(100));
        assert_eq!(params.offset, Some(0));
    }

    #[test]
    fn rejects_out_of_range_limit() {
        for bad in ["0", "101", "-3", "ten"] {
            assert!(query(Some(bad), None).validate().is_err(), "limit {bad} accepted");
        }
    }

    #[test]
    fn rejects_negative_or_garbage_offset() {
        assert!(query(None, Some("-1")).validate().is_err());
        assert!(query(None, Some("x")).validate().is_err());
    }

    #[test]
    fn message_id_must_be_positive() {
        assert_eq!(parse_message_id("12").unwrap(), MessageId(12));
        assert!(parse_message_id("0").is_err());
        assert!(parse_message_id("-4").is_err());
        assert!(parse_message_id("abc").is_err());
    }
}
