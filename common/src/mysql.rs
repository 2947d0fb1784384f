//! MySQL/MariaDB implementation of the database seam

use crate::config::DbConfig;
use crate::db::{CellValue, Connector, Session};
use crate::error::DbError;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Connection, Row, TypeInfo, ValueRef};
use tracing::debug;

/// Connects over the MySQL wire protocol
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlConnector;

impl Connector for MySqlConnector {
    type Session = MySqlSession;

    async fn connect(&self, config: &DbConfig) -> Result<MySqlSession, DbError> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let mut conn = match tokio::time::timeout(config.connect_timeout, options.connect()).await
        {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(DbError::Connection(e.to_string())),
            Err(_) => {
                return Err(DbError::Connection(format!(
                    "timed out after {}s connecting to {}:{}",
                    config.connect_timeout.as_secs(),
                    config.host,
                    config.port
                )))
            }
        };

        // Writes stay pending until commit, matching the client connector default
        let setup = sqlx::raw_sql("SET autocommit = 0").execute(&mut conn).await;
        if let Err(e) = setup {
            let _ = conn.close().await;
            return Err(DbError::Statement(format!(
                "failed to disable autocommit: {}",
                e
            )));
        }

        debug!(host = %config.host, port = config.port, "Connected");
        Ok(MySqlSession { conn })
    }
}

pub struct MySqlSession {
    conn: MySqlConnection,
}

impl Session for MySqlSession {
    async fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        sqlx::raw_sql(sql)
            .execute(&mut self.conn)
            .await
            .map(|_| ())
            .map_err(|e| DbError::Statement(e.to_string()))
    }

    async fn fetch_all(&mut self, sql: &str) -> Result<Vec<Vec<CellValue>>, DbError> {
        let rows = sqlx::query(sql)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| (0..row.len()).map(|idx| decode_cell(row, idx)).collect())
            .collect())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        self.execute("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        self.execute("ROLLBACK").await
    }

    async fn close(self) -> Result<(), DbError> {
        self.conn
            .close()
            .await
            .map_err(|e| DbError::Connection(e.to_string()))
    }
}

fn decode_cell(row: &MySqlRow, idx: usize) -> CellValue {
    let type_name = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return CellValue::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return CellValue::Null,
    };

    let decoded = match type_name.as_str() {
        "BOOLEAN" => row.try_get::<bool, _>(idx).map(|v| CellValue::Int(v as i64)).ok(),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            row.try_get::<i64, _>(idx).map(CellValue::Int).ok()
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row.try_get::<u64, _>(idx).map(CellValue::UInt).ok(),
        "FLOAT" => row
            .try_get::<f32, _>(idx)
            .map(|v| CellValue::Float(v as f64))
            .ok(),
        "DOUBLE" => row.try_get::<f64, _>(idx).map(CellValue::Float).ok(),
        "DECIMAL" => row
            .try_get::<sqlx::types::BigDecimal, _>(idx)
            .map(|v| CellValue::Decimal(v.to_string()))
            .ok(),
        "DATE" => row
            .try_get::<sqlx::types::chrono::NaiveDate, _>(idx)
            .map(|v| CellValue::Text(v.to_string()))
            .ok(),
        "TIME" => row
            .try_get::<sqlx::types::chrono::NaiveTime, _>(idx)
            .map(|v| CellValue::Text(v.to_string()))
            .ok(),
        "DATETIME" | "TIMESTAMP" => row
            .try_get::<sqlx::types::chrono::NaiveDateTime, _>(idx)
            .map(|v| CellValue::Text(v.to_string()))
            .ok(),
        "JSON" => row
            .try_get::<sqlx::types::JsonValue, _>(idx)
            .map(|v| CellValue::Text(v.to_string()))
            .ok(),
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => row
            .try_get::<Vec<u8>, _>(idx)
            .map(bytes_cell)
            .ok(),
        _ => None,
    };

    decoded.unwrap_or_else(|| {
        row.try_get::<String, _>(idx)
            .map(CellValue::Text)
            .or_else(|_| row.try_get::<i64, _>(idx).map(CellValue::Int))
            .or_else(|_| row.try_get::<f64, _>(idx).map(CellValue::Float))
            .or_else(|_| row.try_get::<Vec<u8>, _>(idx).map(bytes_cell))
            .unwrap_or(CellValue::Null)
    })
}

/// Server metadata (e.g. `SHOW TABLES`) often arrives with a binary collation
fn bytes_cell(bytes: Vec<u8>) -> CellValue {
    match String::from_utf8(bytes) {
        Ok(text) => CellValue::Text(text),
        Err(e) => CellValue::Bytes(e.into_bytes()),
    }
}
