//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::upsert::excluded;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use uuid::Uuid;

use crate::api::{BinId, ScheduleId, StopId, UserId};
use crate::db::repository::{
    DirectoryRepository, ErrorContext, RepositoryError, RepositoryResult, ScheduleRepository,
    StopRepository,
};
use crate::models::{Bin, NewSchedule, NewStop, Schedule, Stop, StopStatus, User};

mod models;
mod schema;

use models::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse::<T>().ok())
                .unwrap_or(default)
        }

        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", 10),
            min_pool_size: env_or("PG_POOL_MIN", 1),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", 30),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", 600),
            max_retries: env_or("PG_MAX_RETRIES", 3),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", 100),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient
    /// failures.
    ///
    /// Runs the blocking Diesel call on the blocking pool and retries up to
    /// `max_retries` times with exponential backoff when a retryable error
    /// occurs (connection loss, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl DirectoryRepository for PostgresRepository {
    async fn get_user(&self, user_id: &UserId) -> RepositoryResult<Option<User>> {
        let id = user_id.value().to_string();
        let row = self
            .with_conn(move |conn| {
                schema::users::table
                    .find(&id)
                    .first::<UserRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(row.map(User::from))
    }

    async fn upsert_user(&self, user: &User) -> RepositoryResult<()> {
        let row = UserRow::from(user);
        self.with_conn(move |conn| {
            diesel::insert_into(schema::users::table)
                .values(&row)
                .on_conflict(schema::users::user_id)
                .do_update()
                .set((
                    schema::users::display_name.eq(excluded(schema::users::display_name)),
                    schema::users::address.eq(excluded(schema::users::address)),
                    schema::users::zone.eq(excluded(schema::users::zone)),
                ))
                .execute(conn)
                .map_err(RepositoryError::from)?;
            Ok(())
        })
        .await
    }

    async fn active_bins(&self, user_id: &UserId) -> RepositoryResult<Vec<Bin>> {
        let id = user_id.value().to_string();
        let rows = self
            .with_conn(move |conn| {
                schema::bins::table
                    .filter(schema::bins::user_id.eq(&id))
                    .filter(schema::bins::active.eq(true))
                    .order(schema::bins::bin_id.asc())
                    .load::<BinRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(rows.into_iter().map(Bin::from).collect())
    }

    async fn get_bin(&self, bin_id: &BinId) -> RepositoryResult<Option<Bin>> {
        let id = bin_id.value().to_string();
        let row = self
            .with_conn(move |conn| {
                schema::bins::table
                    .find(&id)
                    .first::<BinRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(row.map(Bin::from))
    }

    async fn upsert_bin(&self, bin: &Bin) -> RepositoryResult<()> {
        let row = BinRow::from(bin);
        self.with_conn(move |conn| {
            diesel::insert_into(schema::bins::table)
                .values(&row)
                .on_conflict(schema::bins::bin_id)
                .do_update()
                .set((
                    schema::bins::user_id.eq(excluded(schema::bins::user_id)),
                    schema::bins::bin_code.eq(excluded(schema::bins::bin_code)),
                    schema::bins::category.eq(excluded(schema::bins::category)),
                    schema::bins::active.eq(excluded(schema::bins::active)),
                ))
                .execute(conn)
                .map_err(RepositoryError::from)?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ScheduleRepository for PostgresRepository {
    async fn get_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<Option<Schedule>> {
        let id = schedule_id.value().to_string();
        let row = self
            .with_conn(move |conn| {
                schema::schedules::table
                    .find(&id)
                    .first::<ScheduleRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;
        row.map(Schedule::try_from).transpose()
    }

    async fn upcoming_in_zone(
        &self,
        zone: &str,
        from: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Schedule>> {
        let zone = zone.to_string();
        let rows = self
            .with_conn(move |conn| {
                schema::schedules::table
                    .filter(schema::schedules::zone.eq(&zone))
                    .filter(schema::schedules::status.eq("active"))
                    .filter(schema::schedules::collection_date.ge(from))
                    .order((
                        schema::schedules::collection_date.asc(),
                        schema::schedules::schedule_id.asc(),
                    ))
                    .load::<ScheduleRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        rows.into_iter().map(Schedule::try_from).collect()
    }

    async fn insert_schedule(&self, schedule: &NewSchedule) -> RepositoryResult<ScheduleId> {
        let id = ScheduleId::new(Self::generate_id());
        let row = NewScheduleRow::from_schedule(&id, schedule);
        self.with_conn(move |conn| {
            diesel::insert_into(schema::schedules::table)
                .values(&row)
                .execute(conn)
                .map_err(RepositoryError::from)?;
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map_err(RepositoryError::from)?;
            Ok(true)
        })
        .await
    }
}

#[async_trait]
impl StopRepository for PostgresRepository {
    async fn stops_for_bin(
        &self,
        schedule_id: &ScheduleId,
        user_id: &UserId,
        bin_id: &BinId,
    ) -> RepositoryResult<Vec<Stop>> {
        let schedule_id = schedule_id.value().to_string();
        let user_id = user_id.value().to_string();
        let bin_id = bin_id.value().to_string();
        let rows = self
            .with_conn(move |conn| {
                schema::stops::table
                    .filter(schema::stops::schedule_id.eq(&schedule_id))
                    .filter(schema::stops::user_id.eq(&user_id))
                    .filter(schema::stops::bin_id.eq(&bin_id))
                    .order((
                        schema::stops::created_at.asc(),
                        schema::stops::stop_id.asc(),
                    ))
                    .load::<StopRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        rows.into_iter().map(Stop::try_from).collect()
    }

    async fn list_stops(&self, schedule_id: &ScheduleId) -> RepositoryResult<Vec<Stop>> {
        let schedule_id = schedule_id.value().to_string();
        let rows = self
            .with_conn(move |conn| {
                schema::stops::table
                    .filter(schema::stops::schedule_id.eq(&schedule_id))
                    .order((
                        schema::stops::created_at.asc(),
                        schema::stops::stop_id.asc(),
                    ))
                    .load::<StopRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        rows.into_iter().map(Stop::try_from).collect()
    }

    async fn insert_stop(&self, stop: &NewStop) -> RepositoryResult<StopId> {
        let id = StopId::new(Self::generate_id());
        let row = NewStopRow::from_stop(&id, stop, Utc::now());
        self.with_conn(move |conn| {
            diesel::insert_into(schema::stops::table)
                .values(&row)
                .execute(conn)
                .map_err(RepositoryError::from)?;
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn update_stop_status(
        &self,
        stop_id: &StopId,
        status: StopStatus,
        note: Option<&str>,
    ) -> RepositoryResult<()> {
        let id = stop_id.value().to_string();
        let status = status.as_str().to_string();
        let note = note.map(|n| n.to_string());
        let updated = self
            .with_conn(move |conn| {
                let now = Utc::now();
                let target = schema::stops::table.find(&id);
                let updated = match &note {
                    Some(note) => diesel::update(target)
                        .set((
                            schema::stops::status.eq(&status),
                            schema::stops::notes.eq(note),
                            schema::stops::updated_at.eq(now),
                        ))
                        .execute(conn)
                        .map_err(RepositoryError::from)?,
                    None => diesel::update(target)
                        .set((
                            schema::stops::status.eq(&status),
                            schema::stops::updated_at.eq(now),
                        ))
                        .execute(conn)
                        .map_err(RepositoryError::from)?,
                };
                Ok(updated)
            })
            .await?;

        if updated == 0 {
            return Err(RepositoryError::not_found_with_context(
                "Stop not found",
                ErrorContext::new("update_stop_status")
                    .with_entity("stop")
                    .with_entity_id(stop_id),
            ));
        }
        Ok(())
    }
}
