use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime, Utc};
use diesel::{
    prelude::*,
    r2d2::{ConnectionManager, PooledConnection},
    SqliteConnection,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    db::SqlitePool,
    models::{CompanyChangeset, CompanyRow, NewCompanyRow},
    schema::companies,
};

type SqlitePooledConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Sector name to the identifier of the party responsible for it.
pub type SectorResponsibles = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("company not found")]
    NotFound,
    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
    #[error("failed to encode structured field: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub tax_id: Option<String>,
    pub tax_regime: Option<String>,
    pub new_tax_regime: Option<String>,
    pub complexity_level: Option<String>,
    pub client_class: Option<String>,
    pub segment: Option<String>,
    pub company_sector: Option<String>,
    pub classification: Option<String>,
    pub municipality: Option<String>,
    pub situation: Option<String>,
    pub group: Option<String>,
    pub honorary_value: Option<f64>,
    pub collaborator_ids: Vec<String>,
    pub sector_responsibles: SectorResponsibles,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub tax_id: Option<String>,
    pub tax_regime: Option<String>,
    pub new_tax_regime: Option<String>,
    pub complexity_level: Option<String>,
    pub client_class: Option<String>,
    pub segment: Option<String>,
    pub company_sector: Option<String>,
    pub classification: Option<String>,
    pub municipality: Option<String>,
    pub situation: Option<String>,
    pub group: Option<String>,
    pub honorary_value: Option<f64>,
    pub collaborator_ids: Vec<String>,
    pub sector_responsibles: SectorResponsibles,
}

/// Partial update. Outer `None` means "leave as is"; for nullable columns
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub tax_id: Option<Option<String>>,
    pub tax_regime: Option<Option<String>>,
    pub new_tax_regime: Option<Option<String>>,
    pub complexity_level: Option<Option<String>>,
    pub client_class: Option<Option<String>>,
    pub segment: Option<Option<String>>,
    pub company_sector: Option<Option<String>>,
    pub classification: Option<Option<String>>,
    pub municipality: Option<Option<String>>,
    pub situation: Option<Option<String>>,
    pub group: Option<Option<String>>,
    pub honorary_value: Option<Option<f64>>,
    pub collaborator_ids: Option<Vec<String>>,
    pub sector_responsibles: Option<SectorResponsibles>,
}

impl CompanyUpdate {
    fn into_changeset(self, updated_at: NaiveDateTime) -> Result<CompanyChangeset, StoreError> {
        let collaborator_ids = self
            .collaborator_ids
            .map(|ids| encode_field(&ids))
            .transpose()?
            .map(Some);
        let sector_responsibles = self
            .sector_responsibles
            .map(|map| encode_field(&map))
            .transpose()?
            .map(Some);

        Ok(CompanyChangeset {
            name: self.name,
            tax_id: self.tax_id,
            tax_regime: self.tax_regime,
            new_tax_regime: self.new_tax_regime,
            complexity_level: self.complexity_level,
            client_class: self.client_class,
            segment: self.segment,
            company_sector: self.company_sector,
            classification: self.classification,
            municipality: self.municipality,
            situation: self.situation,
            group_name: self.group,
            honorary_value: self.honorary_value,
            collaborator_ids,
            sector_responsibles,
            updated_at: Some(updated_at),
        })
    }
}

/// Resource store for company records. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct CompanyStore {
    pool: SqlitePool,
}

impl CompanyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn conn(&self) -> Result<SqlitePooledConnection, StoreError> {
        Ok(self.pool.get()?)
    }

    pub fn create(&self, company: NewCompany) -> Result<Company, StoreError> {
        let now = Utc::now().naive_utc();
        let row = NewCompanyRow {
            id: Uuid::new_v4().to_string(),
            name: company.name,
            tax_id: company.tax_id,
            tax_regime: company.tax_regime,
            new_tax_regime: company.new_tax_regime,
            complexity_level: company.complexity_level,
            client_class: company.client_class,
            segment: company.segment,
            company_sector: company.company_sector,
            classification: company.classification,
            municipality: company.municipality,
            situation: company.situation,
            group_name: company.group,
            honorary_value: company.honorary_value,
            collaborator_ids: Some(encode_field(&company.collaborator_ids)?),
            sector_responsibles: Some(encode_field(&company.sector_responsibles)?),
            created_at: now,
            updated_at: now,
        };

        let mut conn = self.conn()?;
        let stored = conn.immediate_transaction::<_, StoreError, _>(|conn| {
            diesel::insert_into(companies::table)
                .values(&row)
                .execute(conn)?;
            Ok(companies::table
                .find(row.id.as_str())
                .first::<CompanyRow>(conn)?)
        })?;

        Ok(Company::from_row(stored))
    }

    pub fn list(&self) -> Result<Vec<Company>, StoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<CompanyRow> = companies::table
            .order(companies::created_at.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Company::from_row).collect())
    }

    pub fn get(&self, id: &str) -> Result<Company, StoreError> {
        let mut conn = self.conn()?;
        let row = companies::table
            .find(id)
            .first::<CompanyRow>(&mut conn)
            .optional()?
            .ok_or(StoreError::NotFound)?;
        Ok(Company::from_row(row))
    }

    pub fn update(&self, id: &str, update: CompanyUpdate) -> Result<Company, StoreError> {
        let mut conn = self.conn()?;
        let row = conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let existing = companies::table
                .find(id)
                .first::<CompanyRow>(conn)
                .optional()?
                .ok_or(StoreError::NotFound)?;

            let changeset = update.into_changeset(next_timestamp(existing.updated_at))?;
            diesel::update(companies::table.find(id))
                .set(&changeset)
                .execute(conn)?;

            Ok(companies::table.find(id).first::<CompanyRow>(conn)?)
        })?;

        Ok(Company::from_row(row))
    }

    /// Removes the record and hands back its name.
    pub fn delete(&self, id: &str) -> Result<String, StoreError> {
        let mut conn = self.conn()?;
        conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let name = companies::table
                .find(id)
                .select(companies::name)
                .first::<String>(conn)
                .optional()?
                .ok_or(StoreError::NotFound)?;

            diesel::delete(companies::table.find(id)).execute(conn)?;
            Ok(name)
        })
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.conn()?;
        Ok(companies::table.count().get_result(&mut conn)?)
    }
}

impl Company {
    fn from_row(row: CompanyRow) -> Self {
        let collaborator_ids =
            decode_field(row.collaborator_ids.as_deref(), "collaborator_ids", &row.id);
        let sector_responsibles =
            decode_field(row.sector_responsibles.as_deref(), "sector_responsibles", &row.id);

        Self {
            id: row.id,
            name: row.name,
            tax_id: row.tax_id,
            tax_regime: row.tax_regime,
            new_tax_regime: row.new_tax_regime,
            complexity_level: row.complexity_level,
            client_class: row.client_class,
            segment: row.segment,
            company_sector: row.company_sector,
            classification: row.classification,
            municipality: row.municipality,
            situation: row.situation,
            group: row.group_name,
            honorary_value: row.honorary_value,
            collaborator_ids,
            sector_responsibles,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn encode_field<T: Serialize>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

fn decode_field<T>(raw: Option<&str>, column: &'static str, id: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let text = match raw.map(str::trim) {
        None | Some("") => return T::default(),
        Some(text) => text,
    };

    match serde_json::from_str::<Option<T>>(text) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(
                company_id = %id,
                column,
                error = %err,
                "stored structured field is not valid, reading it as empty"
            );
            T::default()
        }
    }
}

fn next_timestamp(previous: NaiveDateTime) -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
