//! PostgreSQL containers for adapter tests
//!
//! The schema is applied straight from `migrations/`, so these helpers do
//! not need `infra_db` and can be shared with its own test suite.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgQueryResult};
use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use tokio::sync::OnceCell;

const IMAGE: (&str, &str) = ("postgres", "16-alpine");
const USER: &str = "shop";
const PASSWORD: &str = "shop";
const DATABASE: &str = "backoffice_test";

const SCHEMA: &str = include_str!("../../../migrations/20240101_000001_initial_schema.sql");

/// Every table the schema creates, children first
pub const BACK_OFFICE_TABLES: &[&str] = &[
    "sale_items",
    "sales",
    "invoice_sequences",
    "payments",
    "inventory_transactions",
    "products",
    "customers",
    "suppliers",
];

pub type TestDbResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A running Postgres container with the back-office schema applied
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub url: String,
    pub pool: PgPool,
}

impl TestDatabase {
    pub async fn start() -> TestDbResult<Self> {
        let container = GenericImage::new(IMAGE.0, IMAGE.1)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", USER)
            .with_env_var("POSTGRES_PASSWORD", PASSWORD)
            .with_env_var("POSTGRES_DB", DATABASE)
            .start()
            .await?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let url = connection_url(&host.to_string(), port);

        // the concurrency tests post twenty sales at once
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self {
            _container: container,
            url,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Empties every table, including the invoice counter
    pub async fn clear_data(&self) -> TestDbResult<()> {
        sqlx::query(&format!("TRUNCATE TABLE {}", BACK_OFFICE_TABLES.join(", ")))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Counts rows in one of [`BACK_OFFICE_TABLES`]
    pub async fn row_count(&self, table: &str) -> TestDbResult<i64> {
        if !BACK_OFFICE_TABLES.contains(&table) {
            return Err(format!("unknown table {}", table).into());
        }
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn connection_url(host: &str, port: u16) -> String {
    format!("postgres://{}:{}@{}:{}/{}", USER, PASSWORD, host, port, DATABASE)
}

static SHARED: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// One container for a whole test binary; callers clear data themselves
///
/// # Panics
///
/// Panics if the container fails to start
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::start()
                    .await
                    .expect("Failed to start shared Postgres container"),
            )
        })
        .await
        .clone()
}

/// A fresh container for a test that needs an empty invoice counter
pub async fn create_isolated_test_database() -> TestDbResult<TestDatabase> {
    TestDatabase::start().await
}

pub trait DatabaseTestAssertions {
    fn assert_rows_affected(&self, expected: u64);
}

impl DatabaseTestAssertions for PgQueryResult {
    fn assert_rows_affected(&self, expected: u64) {
        assert_eq!(
            self.rows_affected(),
            expected,
            "expected {} rows affected, got {}",
            expected,
            self.rows_affected()
        );
    }
}
