//! Generic CRUD endpoints for keyed collections
//!
//! Each entity mounts five routes under its collection path:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `{collection}?page=&pageSize=` | 200 `PagedResult` |
//! | GET | `{collection}/{key}` | 200 `Resource` with self, update, delete |
//! | POST | `{collection}` | 201 `Resource`, `Location` = self href |
//! | PUT | `{collection}/{key}` | 204 |
//! | DELETE | `{collection}/{key}` | 204 |

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::Method,
    routing::get,
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use super::extract::{QueryParams, ValidJson};
use crate::{
    error::{Error, Result},
    hateoas::{LinkBuilder, PageQuery, PageWindow, PagedResult, Resource},
    repository::{Entity, Repository},
    responses::{Created, NoContent},
    state::AppState,
};

/// An entity exposed as a REST collection
pub trait CollectionResource: Entity + Serialize + From<Self::Create> {
    /// Mount path, e.g. `/api/motos`
    const COLLECTION: &'static str;

    /// Body accepted by POST
    type Create: DeserializeOwned + Validate + Send + 'static;

    /// Body accepted by PUT
    type Update: DeserializeOwned + Validate + Send + 'static;

    fn repository(state: &AppState) -> Arc<dyn Repository<Self>>;

    /// Merge an update body into the stored entity, keeping its key
    fn apply_update(self, update: Self::Update) -> Self;

    fn item_path(key: &str) -> String {
        format!("{}/{}", Self::COLLECTION, key)
    }
}

/// The five CRUD routes for `R`
pub fn routes<R: CollectionResource>() -> Router<AppState> {
    Router::new()
        .route(R::COLLECTION, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/{{key}}", R::COLLECTION),
            get(find::<R>).put(update::<R>).delete(remove::<R>),
        )
}

pub async fn list<R: CollectionResource>(
    State(state): State<AppState>,
    links: LinkBuilder,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<PagedResult<R>> {
    let window = PageWindow::resolve(&query, &state.config().pagination);
    let repository = R::repository(&state);

    let total = repository.count().await?;
    let items = repository.find_page(window.to_pagination()).await?;

    tracing::debug!(
        entity = R::NAME,
        page = window.page(),
        page_size = window.page_size(),
        total,
        returned = items.len(),
        "Listed collection"
    );

    Ok(window.into_result(items, total, &links, R::COLLECTION))
}

pub async fn find<R: CollectionResource>(
    State(state): State<AppState>,
    links: LinkBuilder,
    Path(key): Path<String>,
) -> Result<Resource<R>> {
    let entity = R::repository(&state)
        .find_by_key(&key)
        .await?
        .ok_or_else(|| not_found::<R>(&key))?;

    let path = R::item_path(&key);
    Ok(Resource::new(entity, links.self_link(&path))
        .with_link(links.action("update", &path, Method::PUT))
        .with_link(links.action("delete", &path, Method::DELETE)))
}

pub async fn create<R: CollectionResource>(
    State(state): State<AppState>,
    links: LinkBuilder,
    ValidJson(payload): ValidJson<R::Create>,
) -> Result<Created<Resource<R>>> {
    let created = R::repository(&state).create(R::from(payload)).await?;
    tracing::info!(entity = R::NAME, key = created.key(), "Created");

    let path = R::item_path(created.key());
    let resource = Resource::new(created, links.self_link(&path));
    let location = resource.self_link().href.clone();

    Ok(Created::new(resource).with_location(location))
}

pub async fn update<R: CollectionResource>(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ValidJson(payload): ValidJson<R::Update>,
) -> Result<NoContent> {
    let repository = R::repository(&state);
    let existing = repository
        .find_by_key(&key)
        .await?
        .ok_or_else(|| not_found::<R>(&key))?;

    repository.update(existing.apply_update(payload)).await?;
    tracing::info!(entity = R::NAME, key = %key, "Updated");

    Ok(NoContent)
}

pub async fn remove<R: CollectionResource>(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<NoContent> {
    if !R::repository(&state).delete(&key).await? {
        return Err(not_found::<R>(&key));
    }
    tracing::info!(entity = R::NAME, key = %key, "Deleted");

    Ok(NoContent)
}

fn not_found<R: Entity>(key: &str) -> Error {
    Error::NotFound(format!("{} {}", R::NAME, key))
}
