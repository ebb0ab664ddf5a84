use anyhow::{Context, Result};

use crate::{
    db::{self, SqlitePool},
    store::{Company, CompanyStore, NewCompany},
};

/// Profile inserted the first time the service starts against an empty store.
pub fn seed_company() -> NewCompany {
    NewCompany {
        name: "Empresa Exemplo LTDA".to_string(),
        tax_id: Some("12.345.678/0001-90".to_string()),
        tax_regime: Some("SIMPLES NACIONAL".to_string()),
        new_tax_regime: Some("SIMPLES NACIONAL".to_string()),
        complexity_level: Some("Medium".to_string()),
        client_class: Some("Executive".to_string()),
        segment: Some("COMÉRCIO".to_string()),
        company_sector: Some("VAREJO".to_string()),
        classification: Some("BÁSICO".to_string()),
        municipality: Some("São Paulo".to_string()),
        situation: Some("ATIVO".to_string()),
        group: Some("GRUPO A".to_string()),
        honorary_value: Some(1500.0),
        collaborator_ids: Vec::new(),
        sector_responsibles: Default::default(),
    }
}

/// Inserts the seed record when the store holds nothing. Returns the record
/// when one was written.
pub fn seed_if_empty(store: &CompanyStore) -> Result<Option<Company>> {
    let existing = store.count().context("failed to count companies")?;
    if existing > 0 {
        tracing::info!(existing, "companies already present, skipping seed");
        return Ok(None);
    }

    let company = store
        .create(seed_company())
        .context("failed to insert seed company")?;
    tracing::info!(company_id = %company.id, name = %company.name, "seed company created");
    Ok(Some(company))
}

/// Schema first, then the seed.
pub fn bootstrap(pool: &SqlitePool) -> Result<CompanyStore> {
    db::run_migrations(pool)?;
    let store = CompanyStore::new(pool.clone());
    seed_if_empty(&store)?;
    Ok(store)
}
