//! Registration and login payloads

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use validator::Validate;

use super::person::{datetime, Person};

/// Body of `POST /api/auth/register`
#[derive(Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(equal = 11, message = "cpf must be exactly 11 characters"))]
    pub cpf: String,
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 50, message = "nome must be between 1 and 50 characters"))]
    pub name: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 6, max = 60, message = "senha must be between 6 and 60 characters"))]
    pub password: String,
    #[serde(default, rename = "dataNascimento", with = "datetime")]
    pub birth_date: Option<NaiveDateTime>,
    #[serde(default, rename = "nrCep")]
    #[validate(length(equal = 8, message = "nrCep must be exactly 8 characters"))]
    pub postal_code: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("cpf", &self.cpf)
            .field("name", &self.name)
            .field("password", &"***")
            .finish_non_exhaustive()
    }
}

impl RegisterRequest {
    /// The person record to store, carrying the given hash
    pub fn into_person(self, password_hash: String) -> Person {
        Person {
            cpf: self.cpf,
            name: self.name,
            birth_date: self.birth_date,
            postal_code: self.postal_code,
            plate: None,
            password_hash: Some(password_hash),
        }
    }
}

/// Body of `POST /api/auth/login`
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(equal = 11, message = "cpf must be exactly 11 characters"))]
    pub cpf: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 6, max = 60, message = "senha must be between 6 and 60 characters"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("cpf", &self.cpf)
            .finish_non_exhaustive()
    }
}

/// Issued token returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub cpf: String,
    pub nome: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_validation() {
        let ok: RegisterRequest = serde_json::from_value(json!({
            "cpf": "12345678901",
            "nome": "Ana",
            "senha": "segredo1",
            "nrCep": "01001000"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let short: RegisterRequest = serde_json::from_value(json!({
            "cpf": "12345678901",
            "nome": "Ana",
            "senha": "12345"
        }))
        .unwrap();
        assert!(short.validate().is_err());

        let long: RegisterRequest = serde_json::from_value(json!({
            "cpf": "12345678901",
            "nome": "Ana",
            "senha": "x".repeat(61)
        }))
        .unwrap();
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_into_person_stores_hash() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "cpf": "12345678901",
            "nome": "Ana",
            "senha": "segredo1"
        }))
        .unwrap();
        let person = request.into_person("$argon2id$v=19$...".to_string());
        assert_eq!(person.cpf, "12345678901");
        assert!(person.password_hash.is_some());
    }

    #[test]
    fn test_debug_hides_password() {
        let login = LoginRequest {
            cpf: "12345678901".to_string(),
            password: "segredo1".to_string(),
        };
        assert!(!format!("{:?}", login).contains("segredo1"));
    }

    #[test]
    fn test_auth_response_wire_names() {
        let response = AuthResponse {
            cpf: "12345678901".to_string(),
            nome: "Ana".to_string(),
            token: "t".to_string(),
            expires_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("expiresAt").is_some());
        assert_eq!(value["nome"], "Ana");
    }
}
