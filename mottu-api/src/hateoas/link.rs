//! Links and the builder that makes them absolute

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, Method},
};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A navigable action attached to a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation name, e.g. `self`, `update`, `next`
    pub rel: String,
    /// Absolute target URL
    pub href: String,
    /// Uppercase HTTP verb
    pub method: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>, method: &Method) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            method: method.as_str().to_string(),
        }
    }

    pub fn is_self(&self) -> bool {
        self.rel == "self"
    }
}

/// Scheme and host of the request being answered
///
/// Extracted from the request URI when it is absolute, otherwise from the
/// `Host` header. Requests with neither are rejected with 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    scheme: String,
    host: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    pub fn from_parts(parts: &Parts) -> Result<Self, Error> {
        let scheme = parts.uri.scheme_str().unwrap_or("http");

        let host = parts
            .uri
            .authority()
            .map(|authority| authority.as_str().to_string())
            .or_else(|| {
                parts
                    .headers
                    .get(header::HOST)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .filter(|host| !host.is_empty())
            .ok_or_else(|| Error::BadRequest("Missing Host header".to_string()))?;

        Ok(Self::new(scheme, host))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}

/// Builds absolute [`Link`]s against one request origin
///
/// Paths are relative to the origin root and keep their query string
/// verbatim: `/api/motos?page=2&pageSize=10`.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(origin: &RequestOrigin) -> Self {
        Self {
            base_url: format!("{}://{}", origin.scheme, origin.host),
        }
    }

    /// The `self` relation with GET
    pub fn self_link(&self, path: &str) -> Link {
        self.action("self", path, Method::GET)
    }

    pub fn action(&self, rel: &str, path: &str, method: Method) -> Link {
        Link::new(rel, self.href(path), &method)
    }

    /// Absolute URL for a relative path
    pub fn href(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl<S> FromRequestParts<S> for LinkBuilder
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new(&RequestOrigin::from_parts(parts)?))
    }
}
