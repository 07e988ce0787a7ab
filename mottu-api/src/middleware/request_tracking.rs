//! Request IDs and sensitive header masking

use axum::http::{header, HeaderName, Request};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

/// Headers masked in trace output
pub fn sensitive_headers() -> [HeaderName; 3] {
    [header::AUTHORIZATION, header::COOKIE, header::SET_COOKIE]
}

/// Generates `x-request-id` values from time-ordered UUIDv7s
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeUuidV7RequestId;

impl MakeRequestId for MakeUuidV7RequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        let header_value = http::HeaderValue::from_str(&id).ok()?;
        Some(RequestId::new(header_value))
    }
}

/// Set `x-request-id` on requests that lack one
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidV7RequestId> {
    SetRequestIdLayer::x_request_id(MakeUuidV7RequestId)
}

/// Copy `x-request-id` from the request onto the response
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new(sensitive_headers())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_request_id() {
        let mut maker = MakeUuidV7RequestId;
        let request = Request::builder().body(()).unwrap();

        let id = maker.make_request_id(&request).unwrap();
        let header_value = id.into_header_value();
        let parsed = uuid::Uuid::parse_str(header_value.to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }
}
