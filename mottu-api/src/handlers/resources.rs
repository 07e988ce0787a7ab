//! Collection bindings for the three entities

use std::sync::Arc;

use super::collection::CollectionResource;
use crate::{
    models::{
        Address, CreateAddress, CreatePerson, CreateVehicle, Person, UpdateAddress, UpdatePerson,
        UpdateVehicle, Vehicle,
    },
    repository::Repository,
    state::AppState,
};

impl CollectionResource for Vehicle {
    const COLLECTION: &'static str = "/api/motos";
    type Create = CreateVehicle;
    type Update = UpdateVehicle;

    fn repository(state: &AppState) -> Arc<dyn Repository<Self>> {
        Arc::clone(state.vehicles())
    }

    fn apply_update(self, update: UpdateVehicle) -> Self {
        self.apply(update)
    }
}

impl CollectionResource for Person {
    const COLLECTION: &'static str = "/api/usuarios";
    type Create = CreatePerson;
    type Update = UpdatePerson;

    fn repository(state: &AppState) -> Arc<dyn Repository<Self>> {
        Arc::clone(state.persons())
    }

    fn apply_update(self, update: UpdatePerson) -> Self {
        self.apply(update)
    }
}

impl CollectionResource for Address {
    const COLLECTION: &'static str = "/api/enderecos";
    type Create = CreateAddress;
    type Update = UpdateAddress;

    fn repository(state: &AppState) -> Arc<dyn Repository<Self>> {
        Arc::clone(state.addresses())
    }

    fn apply_update(self, update: UpdateAddress) -> Self {
        self.apply(update)
    }
}
