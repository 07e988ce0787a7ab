//! HTTP middleware

mod jwt;
mod request_tracking;

pub use jwt::{extract_token, JwtAuth};
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers, sensitive_headers_layer,
    MakeUuidV7RequestId,
};
