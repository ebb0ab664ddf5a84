use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::*;

/// Row as stored; structured fields are still serialized text here.
#[derive(Debug, Clone, Queryable)]
pub struct CompanyRow {
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
    pub group_name: Option<String>,
    pub honorary_value: Option<f64>,
    pub collaborator_ids: Option<String>,
    pub sector_responsibles: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = companies)]
pub struct NewCompanyRow {
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
    pub group_name: Option<String>,
    pub honorary_value: Option<f64>,
    pub collaborator_ids: Option<String>,
    pub sector_responsibles: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// `None` leaves a column untouched, `Some(None)` writes NULL.
#[derive(Debug, AsChangeset, Default)]
#[diesel(table_name = companies)]
pub struct CompanyChangeset {
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
    pub group_name: Option<Option<String>>,
    pub honorary_value: Option<Option<f64>>,
    pub collaborator_ids: Option<Option<String>>,
    pub sector_responsibles: Option<Option<String>>,
    pub updated_at: Option<NaiveDateTime>,
}
