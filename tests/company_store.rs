mod common;

use anyhow::Result;
use common::TestApp;
use company_directory::store::{CompanyUpdate, NewCompany, StoreError};

fn acme() -> NewCompany {
    NewCompany {
        name: "Acme".to_string(),
        tax_id: Some("11.222.333/0001-44".to_string()),
        situation: Some("ATIVO".to_string()),
        honorary_value: Some(750.0),
        collaborator_ids: vec!["3".to_string()],
        ..Default::default()
    }
}

#[tokio::test]
async fn failed_update_leaves_record_untouched() -> Result<()> {
    let app = TestApp::new().await?;

    app.with_store(|store| {
        let original = store.create(acme())?;

        let update = CompanyUpdate {
            name: Some(" ".into()),
            situation: Some(Some("INATIVO".to_string())),
            honorary_value: Some(None),
            ..Default::default()
        };
        let err = store.update(&original.id, update).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)), "unexpected error: {err}");

        let reloaded = store.get(&original.id)?;
        assert_eq!(reloaded, original);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn failed_create_persists_nothing() -> Result<()> {
    let app = TestApp::new().await?;

    app.with_store(|store| {
        let blank = NewCompany {
            name: "   ".to_string(),
            ..acme()
        };
        let err = store.create(blank).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)), "unexpected error: {err}");
        assert_eq!(store.count()?, 0);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn missing_ids_report_not_found() -> Result<()> {
    let app = TestApp::new().await?;

    app.with_store(|store| {
        assert!(matches!(store.get("missing"), Err(StoreError::NotFound)));
        assert!(matches!(
            store.update("missing", CompanyUpdate::default()),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(store.delete("missing"), Err(StoreError::NotFound)));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn delete_returns_the_removed_name() -> Result<()> {
    let app = TestApp::new().await?;

    app.with_store(|store| {
        let company = store.create(acme())?;
        assert_eq!(store.delete(&company.id)?, "Acme");
        assert_eq!(store.count()?, 0);
        Ok(())
    })
    .await
}
