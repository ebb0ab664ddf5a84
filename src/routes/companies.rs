use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    extract::ApiJson,
    state::AppState,
    store::{Company, CompanyUpdate, NewCompany, SectorResponsibles},
    utils::json::{classify_nullable, NullableValue},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
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
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at")]
    pub updated_at: Option<String>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
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
            group: company.group,
            honorary_value: company.honorary_value,
            collaborator_ids: company.collaborator_ids,
            sector_responsibles: company.sector_responsibles,
            created_at: Some(to_iso(company.created_at)),
            updated_at: Some(to_iso(company.updated_at)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

pub async fn list_companies(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CompanyResponse>>> {
    let companies = state.with_store(|store| store.list()).await?;
    Ok(Json(companies.into_iter().map(CompanyResponse::from).collect()))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<Json<CompanyResponse>> {
    let company = state.with_store(move |store| store.get(&company_id)).await?;
    Ok(Json(company.into()))
}

pub async fn create_company(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<(StatusCode, Json<CompanyResponse>)> {
    let new_company = CompanyFields::from_body(&body)?.into_new_company()?;

    let company = state
        .with_store(move |store| store.create(new_company))
        .await?;
    tracing::info!(company_id = %company.id, name = %company.name, "company created");

    Ok((StatusCode::CREATED, Json(company.into())))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<Json<CompanyResponse>> {
    let update = CompanyFields::from_body(&body)?.into_update()?;

    let company = state
        .with_store(move |store| store.update(&company_id, update))
        .await?;
    tracing::info!(company_id = %company.id, name = %company.name, "company updated");

    Ok(Json(company.into()))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let id = company_id.clone();
    let name = state.with_store(move |store| store.delete(&id)).await?;
    tracing::info!(%company_id, %name, "company deleted");

    Ok(Json(DeleteResponse {
        message: format!("Company {name} deleted successfully"),
    }))
}

/// Every recognised key of a company payload, classified as omitted/null/set.
struct CompanyFields {
    name: NullableValue<String>,
    tax_id: NullableValue<String>,
    tax_regime: NullableValue<String>,
    new_tax_regime: NullableValue<String>,
    complexity_level: NullableValue<String>,
    client_class: NullableValue<String>,
    segment: NullableValue<String>,
    company_sector: NullableValue<String>,
    classification: NullableValue<String>,
    municipality: NullableValue<String>,
    situation: NullableValue<String>,
    group: NullableValue<String>,
    honorary_value: NullableValue<f64>,
    collaborator_ids: NullableValue<Vec<String>>,
    sector_responsibles: NullableValue<SectorResponsibles>,
}

impl CompanyFields {
    fn from_body(body: &Value) -> AppResult<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| AppError::bad_request("request body must be a JSON object"))?;

        let text = |key: &str| field::<String>(object.get(key), key, "string");

        Ok(Self {
            name: text("name")?,
            tax_id: text("taxId")?,
            tax_regime: text("taxRegime")?,
            new_tax_regime: text("newTaxRegime")?,
            complexity_level: text("complexityLevel")?,
            client_class: text("clientClass")?,
            segment: text("segment")?,
            company_sector: text("companySector")?,
            classification: text("classification")?,
            municipality: text("municipality")?,
            situation: text("situation")?,
            group: text("group")?,
            honorary_value: field(object.get("honoraryValue"), "honoraryValue", "number")?,
            collaborator_ids: field(
                object.get("collaboratorIds"),
                "collaboratorIds",
                "array of strings",
            )?,
            sector_responsibles: field(
                object.get("sectorResponsibles"),
                "sectorResponsibles",
                "object of strings",
            )?,
        })
    }

    fn into_new_company(self) -> AppResult<NewCompany> {
        let name = match self.name {
            NullableValue::Value(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err(AppError::bad_request("company name is required")),
        };

        // An absent taxId is stored as "", an explicit null stays NULL.
        let tax_id = match self.tax_id {
            NullableValue::Omitted => Some(String::new()),
            other => other.into_patch().flatten(),
        };

        Ok(NewCompany {
            name,
            tax_id,
            tax_regime: self.tax_regime.into_patch().flatten(),
            new_tax_regime: self.new_tax_regime.into_patch().flatten(),
            complexity_level: self.complexity_level.into_patch().flatten(),
            client_class: self.client_class.into_patch().flatten(),
            segment: self.segment.into_patch().flatten(),
            company_sector: self.company_sector.into_patch().flatten(),
            classification: self.classification.into_patch().flatten(),
            municipality: self.municipality.into_patch().flatten(),
            situation: self.situation.into_patch().flatten(),
            group: self.group.into_patch().flatten(),
            honorary_value: self.honorary_value.into_patch().flatten(),
            collaborator_ids: self.collaborator_ids.into_patch().flatten().unwrap_or_default(),
            sector_responsibles: self
                .sector_responsibles
                .into_patch()
                .flatten()
                .unwrap_or_default(),
        })
    }

    fn into_update(self) -> AppResult<CompanyUpdate> {
        let name = match self.name {
            NullableValue::Omitted => None,
            NullableValue::Value(name) if !name.trim().is_empty() => {
                Some(name.trim().to_string())
            }
            _ => return Err(AppError::bad_request("company name must not be empty")),
        };

        Ok(CompanyUpdate {
            name,
            tax_id: self.tax_id.into_patch(),
            tax_regime: self.tax_regime.into_patch(),
            new_tax_regime: self.new_tax_regime.into_patch(),
            complexity_level: self.complexity_level.into_patch(),
            client_class: self.client_class.into_patch(),
            segment: self.segment.into_patch(),
            company_sector: self.company_sector.into_patch(),
            classification: self.classification.into_patch(),
            municipality: self.municipality.into_patch(),
            situation: self.situation.into_patch(),
            group: self.group.into_patch(),
            honorary_value: self.honorary_value.into_patch(),
            collaborator_ids: self
                .collaborator_ids
                .into_patch()
                .map(Option::unwrap_or_default),
            sector_responsibles: self
                .sector_responsibles
                .into_patch()
                .map(Option::unwrap_or_default),
        })
    }
}

fn field<T: serde::de::DeserializeOwned>(
    value: Option<&Value>,
    key: &str,
    expected: &str,
) -> AppResult<NullableValue<T>> {
    classify_nullable(value, expected)
        .map_err(|err| AppError::bad_request(format!("{key}: {err}")))
}

fn to_iso(dt: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).to_rfc3339()
}
