//! Addresses, keyed by postal code (CEP)

use serde::{Deserialize, Serialize};

use validator::Validate;

use crate::repository::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "nrCep")]
    pub postal_code: String,
    #[serde(rename = "idPais")]
    pub country: Option<String>,
    /// Two-letter state code, e.g. "SP"
    #[serde(rename = "siglaEstado")]
    pub state: Option<String>,
    #[serde(rename = "idCidade")]
    pub city: Option<String>,
    #[serde(rename = "idBairro")]
    pub district: Option<String>,
    #[serde(rename = "nrNumero")]
    pub number: Option<String>,
    #[serde(rename = "logradouro")]
    pub street: Option<String>,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
}

impl Entity for Address {
    const NAME: &'static str = "Endereço";

    fn key(&self) -> &str {
        &self.postal_code
    }
}

/// Body of `POST /api/enderecos`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAddress {
    #[serde(rename = "nrCep")]
    #[validate(length(equal = 8, message = "nrCep must be exactly 8 characters"))]
    pub postal_code: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub details: UpdateAddress,
}

impl From<CreateAddress> for Address {
    fn from(dto: CreateAddress) -> Self {
        Address::blank(dto.postal_code).apply(dto.details)
    }
}

/// Body of `PUT /api/enderecos/{nrCep}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAddress {
    #[serde(default, rename = "idPais")]
    pub country: Option<String>,
    #[serde(default, rename = "siglaEstado")]
    #[validate(length(equal = 2, message = "siglaEstado must be exactly 2 characters"))]
    pub state: Option<String>,
    #[serde(default, rename = "idCidade")]
    pub city: Option<String>,
    #[serde(default, rename = "idBairro")]
    pub district: Option<String>,
    #[serde(default, rename = "nrNumero")]
    pub number: Option<String>,
    #[serde(default, rename = "logradouro")]
    pub street: Option<String>,
    #[serde(default, rename = "complemento")]
    pub complement: Option<String>,
}

impl Address {
    fn blank(postal_code: String) -> Self {
        Self {
            postal_code,
            country: None,
            state: None,
            city: None,
            district: None,
            number: None,
            street: None,
            complement: None,
        }
    }

    /// Overwrite every field but the postal code
    pub fn apply(self, dto: UpdateAddress) -> Self {
        Self {
            postal_code: self.postal_code,
            country: dto.country,
            state: dto.state,
            city: dto.city,
            district: dto.district,
            number: dto.number,
            street: dto.street,
            complement: dto.complement,
        }
    }
}
