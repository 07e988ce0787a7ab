//! Users, keyed by CPF

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use validator::Validate;

use crate::repository::Entity;

/// A registered person
///
/// `password_hash` is set only for accounts created through registration
/// and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub cpf: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: Option<NaiveDateTime>,
    #[serde(rename = "nrCep")]
    pub postal_code: Option<String>,
    #[serde(rename = "cdPlaca")]
    pub plate: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
}

impl Entity for Person {
    const NAME: &'static str = "Usuario";

    fn key(&self) -> &str {
        &self.cpf
    }
}

/// Body of `POST /api/usuarios`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePerson {
    #[validate(length(equal = 11, message = "cpf must be exactly 11 characters"))]
    pub cpf: String,
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 50, message = "nome must be between 1 and 50 characters"))]
    pub name: String,
    #[serde(default, rename = "dataNascimento", with = "datetime")]
    pub birth_date: Option<NaiveDateTime>,
    #[serde(default, rename = "nrCep")]
    #[validate(length(equal = 8, message = "nrCep must be exactly 8 characters"))]
    pub postal_code: Option<String>,
    #[serde(default, rename = "cdPlaca")]
    #[validate(length(equal = 7, message = "cdPlaca must be exactly 7 characters"))]
    pub plate: Option<String>,
}

impl From<CreatePerson> for Person {
    fn from(dto: CreatePerson) -> Self {
        Self {
            cpf: dto.cpf,
            name: dto.name,
            birth_date: dto.birth_date,
            postal_code: dto.postal_code,
            plate: dto.plate,
            password_hash: None,
        }
    }
}

/// Body of `PUT /api/usuarios/{cpf}`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePerson {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 50, message = "nome must be between 1 and 50 characters"))]
    pub name: String,
    #[serde(default, rename = "dataNascimento", with = "datetime")]
    pub birth_date: Option<NaiveDateTime>,
    #[serde(default, rename = "nrCep")]
    #[validate(length(equal = 8, message = "nrCep must be exactly 8 characters"))]
    pub postal_code: Option<String>,
    #[serde(default, rename = "cdPlaca")]
    #[validate(length(equal = 7, message = "cdPlaca must be exactly 7 characters"))]
    pub plate: Option<String>,
}

impl Person {
    /// Overwrite the profile fields, keeping key and password hash
    pub fn apply(self, dto: UpdatePerson) -> Self {
        Self {
            cpf: self.cpf,
            name: dto.name,
            birth_date: dto.birth_date,
            postal_code: dto.postal_code,
            plate: dto.plate,
            password_hash: self.password_hash,
        }
    }
}

/// Lenient ISO-8601 input for `dataNascimento`
///
/// Accepts RFC 3339 (converted to UTC), a naive date-time or a bare date.
pub(crate) mod datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = raw.parse::<NaiveDateTime>() {
            return Some(dt);
        }
        raw.parse::<NaiveDate>()
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid datetime: {}", raw))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn create(value: serde_json::Value) -> CreatePerson {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_person() {
        let dto = create(json!({
            "cpf": "12345678901",
            "nome": "Maria Silva",
            "dataNascimento": "1990-05-17T00:00:00",
            "nrCep": "01001000",
            "cdPlaca": "ABC1234"
        }));
        assert!(dto.validate().is_ok());
        assert_eq!(
            dto.birth_date.map(|d| d.date()),
            NaiveDate::from_ymd_opt(1990, 5, 17)
        );
    }

    #[test]
    fn test_name_required_and_bounded() {
        assert!(create(json!({"cpf": "12345678901", "nome": ""})).validate().is_err());
        let long = "a".repeat(51);
        assert!(create(json!({"cpf": "12345678901", "nome": long})).validate().is_err());
        assert!(serde_json::from_value::<CreatePerson>(json!({"cpf": "12345678901"})).is_err());
    }

    #[test]
    fn test_optional_codes_checked() {
        let dto = create(json!({"cpf": "12345678901", "nome": "Ana", "nrCep": "0100"}));
        assert!(dto.validate().is_err());
        let dto = create(json!({"cpf": "12345678901", "nome": "Ana", "cdPlaca": "AB"}));
        assert!(dto.validate().is_err());
        let dto = create(json!({"cpf": "1234", "nome": "Ana"}));
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2000, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5));
        assert_eq!(datetime::parse("2000-01-02T03:04:05"), expected);
        assert_eq!(datetime::parse("2000-01-02T03:04:05Z"), expected);
        assert_eq!(datetime::parse("2000-01-02T00:04:05-03:00"), expected);
        assert!(datetime::parse("2000-01-02").is_some());
        assert!(datetime::parse("yesterday").is_none());
    }

    #[test]
    fn test_serialization_hides_hash() {
        let person = Person {
            cpf: "12345678901".to_string(),
            name: "Ana".to_string(),
            birth_date: None,
            postal_code: None,
            plate: None,
            password_hash: Some("$argon2id$secret".to_string()),
        };
        let value = serde_json::to_value(&person).unwrap();
        assert_eq!(value["nome"], "Ana");
        assert!(value.get("passwordHash").is_none());
        assert!(!value.to_string().contains("argon2id"));
    }

    #[test]
    fn test_apply_keeps_hash() {
        let person = Person {
            cpf: "12345678901".to_string(),
            name: "Ana".to_string(),
            birth_date: None,
            postal_code: None,
            plate: None,
            password_hash: Some("hash".to_string()),
        };
        let updated = person.apply(UpdatePerson {
            name: "Ana Souza".to_string(),
            birth_date: None,
            postal_code: Some("01001000".to_string()),
            plate: None,
        });
        assert_eq!(updated.cpf, "12345678901");
        assert_eq!(updated.name, "Ana Souza");
        assert_eq!(updated.password_hash.as_deref(), Some("hash"));
    }
}
