//! Request extraction with JSON error envelopes

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::Error;

/// JSON body that has passed [`Validate::validate`]
///
/// Syntax errors, wrong content types and field constraint violations are
/// all rejected with 400.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::JsonDataError(e) => Error::ValidationError(e.body_text()),
                other => Error::BadRequest(other.body_text()),
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string whose parse failures use the same 400 body as [`ValidJson`]
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| Error::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hateoas::PageQuery;
    use crate::models::CreateVehicle;
    use axum::{body::Body, http::header};

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/api/motos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_payload() {
        let ValidJson(dto) = ValidJson::<CreateVehicle>::from_request(json_request(r#"{"placa":"ABC1234"}"#), &())
            .await
            .unwrap();
        assert_eq!(dto.plate, "ABC1234");
    }

    #[tokio::test]
    async fn test_rejects_constraint_violation() {
        let result =
            ValidJson::<CreateVehicle>::from_request(json_request(r#"{"placa":"ABC"}"#), &()).await;
        assert!(matches!(result, Err(Error::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_rejects_missing_field_and_bad_syntax() {
        let missing = ValidJson::<CreateVehicle>::from_request(json_request(r#"{}"#), &()).await;
        assert!(matches!(missing, Err(Error::ValidationError(_))));

        let syntax = ValidJson::<CreateVehicle>::from_request(json_request("{"), &()).await;
        assert!(matches!(syntax, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_rejects_missing_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/motos")
            .body(Body::from(r#"{"placa":"ABC1234"}"#))
            .unwrap();
        let result = ValidJson::<CreateVehicle>::from_request(request, &()).await;
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }

    async fn query(uri: &str) -> Result<QueryParams<PageQuery>, Error> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::<PageQuery>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_query_params_parse_integers() {
        let QueryParams(page) = query("/api/motos?page=-2&pageSize=500").await.unwrap();
        assert_eq!(page.page, Some(-2));
        assert_eq!(page.page_size, Some(500));

        let QueryParams(empty) = query("/api/motos").await.unwrap();
        assert_eq!(empty.page, None);
    }

    #[tokio::test]
    async fn test_query_params_reject_non_integer_as_bad_request() {
        let result = query("/api/motos?page=abc").await;
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }
}
