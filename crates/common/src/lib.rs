//! Shared building blocks for the workspace: wire envelopes, logging setup, startup checks.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::types::{DataResponse, ErrorResponse, Health};

    #[test]
    fn health_type_ok() {
        let h = Health { status: "ok" };
        assert_eq!(serde_json::to_value(&h).unwrap()["status"], "ok");
    }

    #[test]
    fn data_envelope_wraps_payload() {
        let body = serde_json::to_value(DataResponse::new(vec![1, 2, 3])).unwrap();
        assert_eq!(body, serde_json::json!({ "data": [1, 2, 3] }));
    }

    #[test]
    fn empty_list_serializes_as_array_not_null() {
        let body = serde_json::to_value(DataResponse::new(Vec::<u8>::new())).unwrap();
        assert_eq!(body["data"], serde_json::json!([]));
    }

    #[test]
    fn error_envelope_shape() {
        let err: ErrorResponse = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(err.error, "boom");
    }
}
