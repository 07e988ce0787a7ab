//! Registration and login

use axum::{extract::State, routing::post, Json, Router};

use super::{collection::CollectionResource, extract::ValidJson};
use crate::{
    auth::IssuedToken,
    error::{Error, Result},
    models::{AuthResponse, LoginRequest, Person, RegisterRequest},
    repository::{Entity, RepositoryErrorKind},
    responses::Created,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Create a person with a password and sign them in
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<Created<AuthResponse>> {
    let password_hash = state
        .passwords()
        .hash_blocking(request.password.clone())
        .await?;

    let person = state
        .persons()
        .create(request.into_person(password_hash))
        .await
        .map_err(|e| match e.kind {
            RepositoryErrorKind::AlreadyExists => Error::Conflict("Usuário já existe.".to_string()),
            _ => Error::from(e),
        })?;

    let issued = state.tokens().issue(&person)?;
    tracing::info!(cpf = %person.cpf, "Registered");

    let location = Person::item_path(person.key());
    Ok(Created::new(auth_response(person, issued)).with_location(location))
}

/// Exchange cpf and password for a token
///
/// Unknown cpf, accounts without a password and wrong passwords are all 401.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let person = state
        .persons()
        .find_by_key(&request.cpf)
        .await?
        .ok_or_else(|| Error::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let Some(hash) = person.password_hash.clone() else {
        tracing::debug!(cpf = %person.cpf, "Login for account without password");
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !state
        .passwords()
        .verify_blocking(request.password, hash)
        .await?
    {
        tracing::debug!(cpf = %person.cpf, "Login with wrong password");
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let issued = state.tokens().issue(&person)?;
    tracing::info!(cpf = %person.cpf, "Logged in");

    Ok(Json(auth_response(person, issued)))
}

fn auth_response(person: Person, issued: IssuedToken) -> AuthResponse {
    AuthResponse {
        cpf: person.cpf,
        nome: person.name,
        token: issued.token,
        expires_at: issued.expires_at,
    }
}
