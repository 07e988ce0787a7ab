//! PostgreSQL repositories
//!
//! One table per entity, keyed by the natural key column:
//!
//! - `t_mt_moto` (`cd_placa`)
//! - `t_mt_usuario` (`cd_cpf`)
//! - `t_mt_endereco` (`nr_cep`)

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    PgPool, Postgres, Row,
};

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::Pagination;
use super::traits::{Entity, Repository, RepositoryResult};
use crate::models::{Address, Person, Vehicle};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Table mapping for an entity stored in PostgreSQL
pub trait PgEntity: Entity {
    const TABLE: &'static str;
    const KEY_COLUMN: &'static str;
    /// Non-key columns, in [`PgEntity::bind_columns`] order
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

/// Generic repository over a [`PgEntity`] table
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

pub type PgVehicleRepository = PgRepository<Vehicle>;
pub type PgPersonRepository = PgRepository<Person>;
pub type PgAddressRepository = PgRepository<Address>;

impl<E: PgEntity> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn select_columns() -> String {
        std::iter::once(E::KEY_COLUMN)
            .chain(E::COLUMNS.iter().copied())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_by_key_sql() -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = $1",
            Self::select_columns(),
            E::TABLE,
            E::KEY_COLUMN
        )
    }

    fn select_page_sql() -> String {
        format!(
            "SELECT {} FROM {} ORDER BY {} ASC LIMIT $1 OFFSET $2",
            Self::select_columns(),
            E::TABLE,
            E::KEY_COLUMN
        )
    }

    fn insert_sql() -> String {
        let placeholders = (1..=E::COLUMNS.len() + 1)
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            Self::select_columns(),
            placeholders
        )
    }

    fn update_sql() -> String {
        let assignments = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            E::TABLE,
            assignments,
            E::KEY_COLUMN,
            E::COLUMNS.len() + 1
        )
    }

    fn delete_sql() -> String {
        format!("DELETE FROM {} WHERE {} = $1", E::TABLE, E::KEY_COLUMN)
    }
}

#[async_trait]
impl<E: PgEntity> Repository<E> for PgRepository<E> {
    async fn find_by_key(&self, key: &str) -> RepositoryResult<Option<E>> {
        let sql = Self::select_by_key_sql();
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindByKey, e))?;

        row.as_ref()
            .map(E::from_row)
            .transpose()
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindByKey, e))
    }

    async fn find_page(&self, pagination: Pagination) -> RepositoryResult<Vec<E>> {
        let sql = Self::select_page_sql();
        let rows = sqlx::query(&sql)
            .bind(pagination.limit_i64())
            .bind(pagination.offset_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindPage, e))?;

        rows.iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindPage, e))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Count, e))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn create(&self, entity: E) -> RepositoryResult<E> {
        let sql = Self::insert_sql();
        let query = sqlx::query(&sql).bind(entity.key());
        entity
            .bind_columns(query)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                    RepositoryError::already_exists(E::NAME, entity.key())
                } else {
                    RepositoryError::from_sqlx(RepositoryOperation::Create, e)
                }
            })?;

        Ok(entity)
    }

    async fn update(&self, entity: E) -> RepositoryResult<E> {
        let sql = Self::update_sql();
        let result = entity
            .bind_columns(sqlx::query(&sql))
            .bind(entity.key())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Update, e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                RepositoryOperation::Update,
                E::NAME,
                entity.key(),
            ));
        }
        Ok(entity)
    }

    async fn delete(&self, key: &str) -> RepositoryResult<bool> {
        let sql = Self::delete_sql();
        let result = sqlx::query(&sql)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Delete, e))?;

        Ok(result.rows_affected() > 0)
    }
}

impl PgEntity for Vehicle {
    const TABLE: &'static str = "t_mt_moto";
    const KEY_COLUMN: &'static str = "cd_placa";
    const COLUMNS: &'static [&'static str] = &["cd_cpf", "cd_nv", "cd_motor", "cd_renavam", "cd_fipe"];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            plate: row.try_get("cd_placa")?,
            owner_cpf: row.try_get("cd_cpf")?,
            nv: row.try_get("cd_nv")?,
            engine: row.try_get("cd_motor")?,
            renavam: row.try_get("cd_renavam")?,
            fipe: row.try_get("cd_fipe")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.owner_cpf)
            .bind(&self.nv)
            .bind(&self.engine)
            .bind(self.renavam)
            .bind(self.fipe)
    }
}

impl PgEntity for Person {
    const TABLE: &'static str = "t_mt_usuario";
    const KEY_COLUMN: &'static str = "cd_cpf";
    const COLUMNS: &'static [&'static str] =
        &["id_nome", "dt_nascimento", "nr_cep", "cd_placa", "ds_senha_hash"];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            cpf: row.try_get("cd_cpf")?,
            name: row.try_get("id_nome")?,
            birth_date: row.try_get("dt_nascimento")?,
            postal_code: row.try_get("nr_cep")?,
            plate: row.try_get("cd_placa")?,
            password_hash: row.try_get("ds_senha_hash")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.name)
            .bind(self.birth_date)
            .bind(&self.postal_code)
            .bind(&self.plate)
            .bind(&self.password_hash)
    }
}

impl PgEntity for Address {
    const TABLE: &'static str = "t_mt_endereco";
    const KEY_COLUMN: &'static str = "nr_cep";
    const COLUMNS: &'static [&'static str] = &[
        "id_pais",
        "sg_estado",
        "id_cidade",
        "id_bairro",
        "nr_numero",
        "ds_logradouro",
        "ds_complemento",
    ];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            postal_code: row.try_get("nr_cep")?,
            country: row.try_get("id_pais")?,
            state: row.try_get("sg_estado")?,
            city: row.try_get("id_cidade")?,
            district: row.try_get("id_bairro")?,
            number: row.try_get("nr_numero")?,
            street: row.try_get("ds_logradouro")?,
            complement: row.try_get("ds_complemento")?,
        })
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.country)
            .bind(&self.state)
            .bind(&self.city)
            .bind(&self.district)
            .bind(&self.number)
            .bind(&self.street)
            .bind(&self.complement)
    }
}
