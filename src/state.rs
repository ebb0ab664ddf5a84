use crate::{
    db::SqlitePool,
    error::AppResult,
    store::{CompanyStore, StoreError},
};

#[derive(Clone)]
pub struct AppState {
    pub store: CompanyStore,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            store: CompanyStore::new(pool),
        }
    }

    /// Runs a store call on the blocking thread pool.
    pub async fn with_store<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&CompanyStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let result = tokio::task::spawn_blocking(move || f(&store)).await?;
        Ok(result?)
    }
}
