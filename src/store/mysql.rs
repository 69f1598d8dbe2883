//! MySQL-backed implementation of [`DirectoryStore`].

use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{MySql, Row};
use tracing::debug;

use super::query::{
    organization_query, quarantine_page_query, SqlParam, SqlStatement, ORGANIZATION_COLUMNS,
    PING_SQL, QUARANTINE_COUNT_SQL,
};
use super::DirectoryStore;
use crate::directory::{BuildingPage, FieldFilter, OrganizationRow, QtBuilding};
use crate::error::StoreError;

/// Default size of the connection pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default upper bound on a single statement.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Directory store backed by a pooled MySQL connection.
///
/// The pool is cheap to clone and safe to share across request handlers.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlStore {
    /// Wrap an existing pool.
    pub fn new(pool: MySqlPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Open a pool and establish the first connection eagerly.
    ///
    /// Fails if the database is unreachable or the credentials are rejected.
    pub async fn connect(
        options: MySqlConnectOptions,
        max_connections: u32,
        query_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(query_timeout)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self::new(pool, query_timeout))
    }

    /// Connection options for a Cloud SQL unix socket at
    /// `{socket_prefix}/{connection_name}`.
    pub fn socket_options(
        socket_prefix: &str,
        connection_name: &str,
        user: &str,
        password: &str,
        database: &str,
    ) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .socket(socket_path(socket_prefix, connection_name))
            .username(user)
            .password(password)
            .database(database)
    }

    /// Connection options from a `mysql://` URL.
    pub fn url_options(url: &str) -> Result<MySqlConnectOptions, StoreError> {
        MySqlConnectOptions::from_str(url).map_err(|e| StoreError::Connection(e.to_string()))
    }

    async fn timed<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.query_timeout)),
        }
    }

    async fn fetch_all(&self, stmt: &SqlStatement) -> Result<Vec<MySqlRow>, StoreError> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "Executing query");
        self.timed(bind_all(stmt).fetch_all(&self.pool)).await
    }
}

/// Build the unix socket path for a Cloud SQL instance.
pub(crate) fn socket_path(socket_prefix: &str, connection_name: &str) -> PathBuf {
    PathBuf::from(socket_prefix.trim_end_matches('/')).join(connection_name)
}

fn bind_all(stmt: &SqlStatement) -> Query<'_, MySql, MySqlArguments> {
    let mut query = sqlx::query(&stmt.sql);
    for param in &stmt.params {
        query = match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::UInt(value) => query.bind(*value),
        };
    }
    query
}

#[async_trait]
impl DirectoryStore for MySqlStore {
    async fn organizations(
        &self,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<OrganizationRow>, StoreError> {
        let stmt = organization_query(filter);
        let rows = self.fetch_all(&stmt).await?;
        rows.iter().map(decode_organization).collect()
    }

    async fn quarantine_buildings(
        &self,
        page: &BuildingPage,
    ) -> Result<Vec<QtBuilding>, StoreError> {
        let stmt = quarantine_page_query(page);
        let rows = self.fetch_all(&stmt).await?;
        rows.iter().map(decode_building).collect()
    }

    async fn quarantine_building_count(&self) -> Result<i64, StoreError> {
        self.timed(sqlx::query_scalar::<_, i64>(QUARANTINE_COUNT_SQL).fetch_one(&self.pool))
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.timed(sqlx::query(PING_SQL).execute(&self.pool))
            .await
            .map(|_| ())
    }
}

// =============================================================================
// Row Decoding
// =============================================================================

fn decode_organization(row: &MySqlRow) -> Result<OrganizationRow, StoreError> {
    if row.len() != ORGANIZATION_COLUMNS {
        return Err(StoreError::RowDecode {
            column: "*".to_string(),
            message: format!(
                "expected {} columns, got {}",
                ORGANIZATION_COLUMNS,
                row.len()
            ),
        });
    }

    Ok(OrganizationRow {
        id: int_at(row, 0)?,
        name: text_at(row, 1)?,
        org_type: text_at(row, 2)?,
        website: text_at(row, 3)?,
        facebook: text_at(row, 4)?,
        br_number: text_at(row, 5)?,
        phone: text_at(row, 6)?,
        district: text_at(row, 7)?,
        address: text_at(row, 8)?,
        contact_person_name: text_at(row, 9)?,
        contact_person_phone: text_at(row, 10)?,
        contact_person_role: text_at(row, 11)?,
        email: text_at(row, 12)?,
        tg_id: text_at(row, 13)?,
        past_exp: text_at(row, 14)?,
        verified: int_at(row, 15)?,
        lat: float_at(row, 16)?,
        lng: float_at(row, 17)?,
        show_contact: int_at(row, 18)?,
        custom_resources: nullable_text_at(row, 19)?,
        custom_serving_target: nullable_text_at(row, 20)?,
        resources: nullable_text_at(row, 21)?,
        serving_targets: nullable_text_at(row, 22)?,
    })
}

fn decode_building(row: &MySqlRow) -> Result<QtBuilding, StoreError> {
    Ok(QtBuilding {
        id: int_at(row, 0)?,
        chi_addr: text_at(row, 1)?,
        eng_addr: text_at(row, 2)?,
        district: text_at(row, 3)?,
        end_date: text_at(row, 4)?,
        lat: float_at(row, 5)?,
        lng: float_at(row, 6)?,
    })
}

/// Text column; NULL decodes as the empty string.
fn text_at(row: &MySqlRow, index: usize) -> Result<String, StoreError> {
    Ok(nullable_text_at(row, index)?.unwrap_or_default())
}

/// Text or binary-collated column (`GROUP_CONCAT` over integers may come back
/// as VARBINARY/BLOB depending on server settings).
fn nullable_text_at(row: &MySqlRow, index: usize) -> Result<Option<String>, StoreError> {
    match row.try_get::<Option<String>, _>(index) {
        Ok(value) => Ok(value),
        Err(_) => {
            let bytes: Option<Vec<u8>> = row.try_get(index)?;
            Ok(bytes.map(|b| String::from_utf8_lossy(&b).into_owned()))
        }
    }
}

/// Integer column of any width or signedness that fits in an `i32`.
fn int_at(row: &MySqlRow, index: usize) -> Result<i32, StoreError> {
    let wide = match row.try_get::<i64, _>(index) {
        Ok(value) => value,
        Err(_) => {
            let value: u64 = row.try_get(index)?;
            i64::try_from(value).map_err(|_| out_of_range(index, value))?
        }
    };
    i32::try_from(wide).map_err(|_| out_of_range(index, wide))
}

/// FLOAT or DOUBLE column, narrowed to `f32`.
fn float_at(row: &MySqlRow, index: usize) -> Result<f32, StoreError> {
    match row.try_get::<f32, _>(index) {
        Ok(value) => Ok(value),
        Err(_) => {
            let value: f64 = row.try_get(index)?;
            Ok(value as f32)
        }
    }
}

fn out_of_range(index: usize, value: impl std::fmt::Display) -> StoreError {
    StoreError::RowDecode {
        column: index.to_string(),
        message: format!("value {} does not fit in a 32-bit integer", value),
    }
}
