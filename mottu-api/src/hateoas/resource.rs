//! Single-item envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};

use super::Link;

/// A payload plus its links
///
/// Holds exactly one `self` link, serialized first; further links follow in
/// insertion order. Relation names besides `self` are not deduplicated.
///
/// ```json
/// {
///   "data": { "placa": "ABC1234" },
///   "links": [{ "rel": "self", "href": "http://host/api/motos/ABC1234", "method": "GET" }]
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Resource<T> {
    pub data: T,
    self_link: Link,
    links: Vec<Link>,
}

impl<T> Resource<T> {
    /// `self_link` is stored under the `self` relation whatever its `rel`
    pub fn new(data: T, mut self_link: Link) -> Self {
        if !self_link.is_self() {
            self_link.rel = "self".to_string();
        }
        Self {
            data,
            self_link,
            links: Vec::new(),
        }
    }

    /// Append a non-self link; a second `self` is dropped
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        if link.is_self() {
            tracing::warn!(href = %link.href, "Ignoring extra self link");
        } else {
            self.links.push(link);
        }
        self
    }

    /// All links, `self` first
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        std::iter::once(&self.self_link).chain(self.links.iter())
    }

    pub fn self_link(&self) -> &Link {
        &self.self_link
    }
}

impl<T: Serialize> Serialize for Resource<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Envelope<'a, T> {
            data: &'a T,
            links: Vec<&'a Link>,
        }

        Envelope {
            data: &self.data,
            links: self.links().collect(),
        }
        .serialize(serializer)
    }
}

impl<T: Serialize> IntoResponse for Resource<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
