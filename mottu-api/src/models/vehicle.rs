//! Motorcycles, keyed by plate

use serde::{Deserialize, Serialize};

use validator::Validate;

use crate::repository::Entity;

/// A registered motorcycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "placa")]
    pub plate: String,
    /// CPF of the owner
    #[serde(rename = "cpf")]
    pub owner_cpf: Option<String>,
    pub nv: Option<String>,
    #[serde(rename = "motor")]
    pub engine: Option<String>,
    pub renavam: Option<i64>,
    pub fipe: Option<i32>,
}

impl Entity for Vehicle {
    const NAME: &'static str = "Moto";

    fn key(&self) -> &str {
        &self.plate
    }
}

/// Body of `POST /api/motos`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicle {
    #[serde(rename = "placa")]
    #[validate(length(equal = 7, message = "placa must be exactly 7 characters"))]
    pub plate: String,
    #[serde(default, rename = "cpf")]
    #[validate(length(equal = 11, message = "cpf must be exactly 11 characters"))]
    pub owner_cpf: Option<String>,
    #[serde(default)]
    pub nv: Option<String>,
    #[serde(default, rename = "motor")]
    pub engine: Option<String>,
    #[serde(default)]
    pub renavam: Option<i64>,
    #[serde(default)]
    pub fipe: Option<i32>,
}

impl From<CreateVehicle> for Vehicle {
    fn from(dto: CreateVehicle) -> Self {
        Self {
            plate: dto.plate,
            owner_cpf: dto.owner_cpf,
            nv: dto.nv,
            engine: dto.engine,
            renavam: dto.renavam,
            fipe: dto.fipe,
        }
    }
}

/// Body of `PUT /api/motos/{placa}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicle {
    #[serde(default, rename = "cpf")]
    #[validate(length(equal = 11, message = "cpf must be exactly 11 characters"))]
    pub owner_cpf: Option<String>,
    #[serde(default)]
    pub nv: Option<String>,
    #[serde(default, rename = "motor")]
    pub engine: Option<String>,
    #[serde(default)]
    pub renavam: Option<i64>,
    #[serde(default)]
    pub fipe: Option<i32>,
}

impl Vehicle {
    /// Overwrite every mutable field; absent fields become empty
    pub fn apply(self, dto: UpdateVehicle) -> Self {
        Self {
            plate: self.plate,
            owner_cpf: dto.owner_cpf,
            nv: dto.nv,
            engine: dto.engine,
            renavam: dto.renavam,
            fipe: dto.fipe,
        }
    }
}
