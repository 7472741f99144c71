//! JSON request and reply codec.
//!
//! One request maps to one reply. A successful reply carries the route and
//! its metrics; a failed one is `{"error": "..."}` with a message that starts
//! with the error kind.

use serde::{Deserialize, Serialize};

use crate::{RequestValidationError, RouteRequest, RouteResponse, SolveError};

/// Reply body for a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Human-readable message prefixed by the error kind.
    pub error: String,
}

/// Either reply shape, serialised without a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteReply {
    /// The route and its metrics.
    Success(RouteResponse),
    /// The failure message.
    Failure(ErrorReply),
}

impl From<&Result<RouteResponse, SolveError>> for RouteReply {
    fn from(result: &Result<RouteResponse, SolveError>) -> Self {
        match result {
            Ok(response) => Self::Success(response.clone()),
            Err(err) => Self::Failure(ErrorReply {
                error: err.to_string(),
            }),
        }
    }
}

const ENCODING_FAILED: &str = r#"{"error":"computation failed: reply could not be encoded"}"#;

/// Decode one request from JSON.
///
/// Missing optional fields take their defaults. An absent `start` decodes to
/// an empty id, which validation rejects as missing.
///
/// # Errors
/// Any JSON error becomes [`SolveError::InvalidInput`] wrapping
/// [`RequestValidationError::Malformed`].
///
/// # Examples
/// ```rust
/// use stopover_core::wire::decode_request;
///
/// let request = decode_request(r#"{"start":"DFW","candidates":["IAH"],"budget":14.25}"#)?;
/// assert_eq!(request.start.as_str(), "DFW");
/// assert!(!request.return_to_start);
/// # Ok::<(), stopover_core::SolveError>(())
/// ```
pub fn decode_request(json: &str) -> Result<RouteRequest, SolveError> {
    serde_json::from_str(json)
        .map_err(|err| SolveError::InvalidInput(RequestValidationError::Malformed(err.to_string())))
}

/// Encode a solve result as one line of JSON.
///
/// # Examples
/// ```rust
/// use stopover_core::SolveError;
/// use stopover_core::wire::encode_reply;
///
/// let line = encode_reply(&Err(SolveError::ComputationTimeout));
/// assert_eq!(
///     line,
///     r#"{"error":"computation timed out before a feasible route was confirmed"}"#
/// );
/// ```
#[must_use]
pub fn encode_reply(result: &Result<RouteResponse, SolveError>) -> String {
    serde_json::to_string(&RouteReply::from(result)).unwrap_or_else(|err| {
        log::warn!("failed to encode reply: {err}");
        ENCODING_FAILED.to_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    use crate::StopId;

    #[rstest]
    fn decodes_optional_fields() {
        let request = decode_request(
            r#"{"start":"A","candidates":["B"],"budget":3,"return_to_start":true,"max_stops":1}"#,
        )
        .expect("valid json");
        assert!(request.return_to_start);
        assert_eq!(request.max_stops, Some(1));
        assert_eq!(request.budget, 3.0);
    }

    #[rstest]
    fn absent_candidates_default_to_empty() {
        let request = decode_request(r#"{"start":"A","budget":1}"#).expect("valid json");
        assert!(request.candidates.is_empty());
    }

    #[rstest]
    fn absent_start_fails_validation() {
        let request = decode_request(r#"{"budget":1}"#).expect("valid json");
        assert_eq!(
            request.validate().expect_err("missing start"),
            RequestValidationError::MissingStart
        );
    }

    #[rstest]
    #[case("")]
    #[case("{")]
    #[case(r#"{"start":"A"}"#)]
    #[case(r#"{"start":"A","budget":"ten"}"#)]
    #[case(r#"{"start":7,"budget":1}"#)]
    fn malformed_json_is_invalid_input(#[case] json: &str) {
        let err = decode_request(json).expect_err("malformed");
        assert!(matches!(
            err,
            SolveError::InvalidInput(RequestValidationError::Malformed(_))
        ));
        assert!(err.to_string().starts_with("invalid input: malformed request"));
    }

    #[rstest]
    fn encodes_success() {
        let line = encode_reply(&Ok(RouteResponse {
            route: vec![StopId::from("A"), StopId::from("B"), StopId::from("C")],
            total_value: 2.0,
            total_duration: Duration::from_secs(3),
        }));
        assert_eq!(
            line,
            r#"{"route":["A","B","C"],"total_value":2.0,"total_duration":3.0}"#
        );
    }

    #[rstest]
    fn encodes_unknown_node() {
        let line = encode_reply(&Err(SolveError::UnknownNode {
            id: StopId::from("ZZZ"),
        }));
        assert_eq!(line, r#"{"error":"unknown node: ZZZ"}"#);
    }

    #[rstest]
    fn replies_decode_back_to_their_shape() {
        let reply: RouteReply =
            serde_json::from_str(r#"{"error":"invalid input: budget must not be negative"}"#)
                .expect("valid reply");
        assert!(matches!(reply, RouteReply::Failure(_)));
    }
}
