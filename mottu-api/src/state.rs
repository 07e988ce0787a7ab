//! Application state management

use std::sync::Arc;

use crate::{
    auth::{JwtIssuer, PasswordHasher},
    config::Config,
    error::Result,
    middleware::JwtAuth,
    models::{Address, Person, Vehicle},
    repository::{MemoryRepository, Repository},
};

/// Application state shared across handlers
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    vehicles: Arc<dyn Repository<Vehicle>>,
    persons: Arc<dyn Repository<Person>>,
    addresses: Arc<dyn Repository<Address>>,
    passwords: PasswordHasher,
    tokens: JwtIssuer,
    jwt_auth: JwtAuth,
}

impl AppState {
    pub fn builder(config: Config) -> AppStateBuilder {
        AppStateBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn vehicles(&self) -> &Arc<dyn Repository<Vehicle>> {
        &self.vehicles
    }

    pub fn persons(&self) -> &Arc<dyn Repository<Person>> {
        &self.persons
    }

    pub fn addresses(&self) -> &Arc<dyn Repository<Address>> {
        &self.addresses
    }

    pub fn passwords(&self) -> &PasswordHasher {
        &self.passwords
    }

    pub fn tokens(&self) -> &JwtIssuer {
        &self.tokens
    }

    pub fn jwt_auth(&self) -> &JwtAuth {
        &self.jwt_auth
    }
}

/// Builder for [`AppState`]
///
/// Repositories that are not supplied explicitly are chosen at build time:
/// PostgreSQL when the `database` feature is enabled and `[database]` is
/// configured, in-memory otherwise.
pub struct AppStateBuilder {
    config: Config,
    vehicles: Option<Arc<dyn Repository<Vehicle>>>,
    persons: Option<Arc<dyn Repository<Person>>>,
    addresses: Option<Arc<dyn Repository<Address>>>,
}

impl AppStateBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            vehicles: None,
            persons: None,
            addresses: None,
        }
    }

    pub fn vehicles(mut self, repository: Arc<dyn Repository<Vehicle>>) -> Self {
        self.vehicles = Some(repository);
        self
    }

    pub fn persons(mut self, repository: Arc<dyn Repository<Person>>) -> Self {
        self.persons = Some(repository);
        self
    }

    pub fn addresses(mut self, repository: Arc<dyn Repository<Address>>) -> Self {
        self.addresses = Some(repository);
        self
    }

    /// Validate configuration, connect storage and build auth components
    #[cfg_attr(not(feature = "database"), allow(unused_mut))]
    pub async fn build(mut self) -> Result<AppState> {
        self.config.validate()?;

        let passwords = PasswordHasher::new(&self.config.password)?;
        let tokens = JwtIssuer::new(&self.config.jwt)?;
        let jwt_auth = JwtAuth::new(&self.config.jwt)?;

        #[cfg(feature = "database")]
        self.connect_database().await?;

        let vehicles = self
            .vehicles
            .unwrap_or_else(|| Arc::new(MemoryRepository::<Vehicle>::new()) as Arc<dyn Repository<Vehicle>>);
        let persons = self
            .persons
            .unwrap_or_else(|| Arc::new(MemoryRepository::<Person>::new()) as Arc<dyn Repository<Person>>);
        let addresses = self
            .addresses
            .unwrap_or_else(|| Arc::new(MemoryRepository::<Address>::new()) as Arc<dyn Repository<Address>>);

        Ok(AppState {
            config: Arc::new(self.config),
            vehicles,
            persons,
            addresses,
            passwords,
            tokens,
            jwt_auth,
        })
    }

    /// Fill unset repositories with PostgreSQL-backed ones
    #[cfg(feature = "database")]
    async fn connect_database(&mut self) -> Result<()> {
        use crate::repository::postgres::{PgAddressRepository, PgPersonRepository, PgVehicleRepository};

        let Some(db_config) = self.config.database.clone() else {
            tracing::info!("No database configured, using in-memory repositories");
            return Ok(());
        };
        if self.vehicles.is_some() && self.persons.is_some() && self.addresses.is_some() {
            return Ok(());
        }

        let pool = crate::database::create_pool(&db_config).await?;

        if self.vehicles.is_none() {
            self.vehicles = Some(Arc::new(PgVehicleRepository::new(pool.clone())));
        }
        if self.persons.is_none() {
            self.persons = Some(Arc::new(PgPersonRepository::new(pool.clone())));
        }
        if self.addresses.is_none() {
            self.addresses = Some(Arc::new(PgAddressRepository::new(pool)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn config() -> Config {
        let mut config = Config::default();
        config.jwt.secret = "state-test-secret-0123456789abcdef".to_string();
        config
    }

    #[tokio::test]
    async fn test_build_with_memory_repositories() {
        let state = AppState::builder(config()).build().await.unwrap();
        assert_eq!(state.persons().count().await.unwrap(), 0);
        assert_eq!(state.config().service.name, "mottu-api");
    }

    #[tokio::test]
    async fn test_build_uses_supplied_repository() {
        let vehicles = Arc::new(MemoryRepository::with_entities([Vehicle {
            plate: "ABC1234".to_string(),
            owner_cpf: None,
            nv: None,
            engine: None,
            renavam: None,
            fipe: None,
        }]));
        let state = AppState::builder(config())
            .vehicles(vehicles)
            .build()
            .await
            .unwrap();
        assert_eq!(state.vehicles().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_build_rejects_missing_secret() {
        let result = AppState::builder(Config::default()).build().await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
