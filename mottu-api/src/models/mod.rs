//! Domain records and their request payloads
//!
//! Field names are English in Rust and Portuguese (camelCase) on the wire.

mod address;
mod auth;
mod person;
mod vehicle;

pub use address::{Address, CreateAddress, UpdateAddress};
pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use person::{CreatePerson, Person, UpdatePerson};
pub use vehicle::{CreateVehicle, UpdateVehicle, Vehicle};
