//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in the binary. Migrations
//! run once; each test gets its own pool and creates its own citizens.

use anyhow::{Context, Result};
use server_core::domains::auth::JwtService;
use server_core::kernel::{MockAI, ServerDeps};
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::ApiClient;

pub const TEST_JWT_SECRET: &str = "citywatch-test-secret";
pub const TEST_JWT_ISSUER: &str = "citywatch-test";

struct SharedTestInfra {
    db_url: String,
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test handle on the shared database
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let api = ctx.api(MockAI::new());
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {}
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            db_pool,
            jwt_service: Arc::new(JwtService::new(
                TEST_JWT_SECRET,
                TEST_JWT_ISSUER.to_string(),
            )),
        })
    }

    pub fn deps(&self, ai: MockAI) -> ServerDeps {
        ServerDeps::new(
            self.db_pool.clone(),
            Arc::new(ai),
            self.jwt_service.clone(),
            "india".to_string(),
        )
    }

    /// REST client over the full router (no rate limiting)
    pub fn api(&self, ai: MockAI) -> ApiClient {
        ApiClient::new(self.deps(ai), self.jwt_service.clone())
    }

    /// Wait for background classification to finish writing back
    pub async fn settle(&self) {
        tokio::time::sleep(tokio::time::Duration::from_millis(300)).await;
    }
}
