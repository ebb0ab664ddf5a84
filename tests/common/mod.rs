use anyhow::{anyhow, Context, Result};
use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use company_directory::db;
use company_directory::routes;
use company_directory::seed;
use company_directory::state::AppState;
use company_directory::store::CompanyStore;
use diesel::connection::SimpleConnection;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestApp {
    pub state: AppState,
    router: Router,
    // Keeps the database file alive for the lifetime of the app.
    _dir: TempDir,
}

impl TestApp {
    /// Fresh database with the schema in place and no records.
    pub async fn new() -> Result<Self> {
        Self::build(false).await
    }

    /// Fresh database that went through the full startup bootstrap.
    #[allow(dead_code)]
    pub async fn bootstrapped() -> Result<Self> {
        Self::build(true).await
    }

    async fn build(run_seed: bool) -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        let database_url = dir
            .path()
            .join("companies.db")
            .to_str()
            .ok_or_else(|| anyhow!("temp path is not valid UTF-8"))?
            .to_string();

        let pool = db::init_pool_with_size(&database_url, db::DEFAULT_MAX_POOL_SIZE)?;
        let setup_pool = pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            if run_seed {
                seed::bootstrap(&setup_pool)?;
            } else {
                db::run_migrations(&setup_pool)?;
            }
            Ok(())
        })
        .await
        .context("setup task panicked")??;

        let state = AppState::new(pool);
        let router = routes::create_router(state.clone());

        Ok(Self {
            state,
            router,
            _dir: dir,
        })
    }

    /// Runs a closure against the store off the async runtime.
    #[allow(dead_code)]
    pub async fn with_store<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CompanyStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.state.store.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .context("store task panicked")?
    }

    /// Executes raw SQL against the app's database.
    #[allow(dead_code)]
    pub async fn execute_sql(&self, sql: &'static str) -> Result<()> {
        let pool = self.state.store.pool().clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool
                .get()
                .map_err(|err| anyhow!("failed to get database connection: {err}"))?;
            conn.batch_execute(sql)
                .with_context(|| format!("failed to execute {sql}"))?;
            Ok(())
        })
        .await
        .context("sql task panicked")?
    }

    #[allow(dead_code)]
    pub async fn company_count(&self) -> Result<i64> {
        self.with_store(|store| Ok(store.count()?)).await
    }

    #[allow(dead_code)]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(Method::POST, path, payload).await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<hyper::Response<Body>> {
        self.send_json(Method::PUT, path, payload).await
    }

    #[allow(dead_code)]
    pub async fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        body: &'static str,
    ) -> Result<hyper::Response<Body>> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("content-type", content_type)
            .body(Body::from(body))?;
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> Result<hyper::Response<Body>> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())?;
        self.send(request).await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, path: &str) -> Result<hyper::Response<Body>> {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(path)
            .body(Body::empty())?;
        self.send(request).await
    }

    #[allow(dead_code)]
    pub async fn send(&self, request: Request<Body>) -> Result<hyper::Response<Body>> {
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> Result<hyper::Response<Body>> {
        let body = serde_json::to_vec(payload)?;
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))?;
        self.send(request).await
    }
}

pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

pub async fn read_json<T: DeserializeOwned>(response: hyper::Response<Body>) -> Result<T> {
    let body = body_to_vec(response.into_body()).await?;
    serde_json::from_slice(&body).with_context(|| {
        format!(
            "unexpected response body: {}",
            String::from_utf8_lossy(&body)
        )
    })
}
