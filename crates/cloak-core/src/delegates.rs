//! Delegate hooks the host application plugs into the SDK: auth, consent,
//! HTTP transport, and cache storage.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};
use crate::types::Identity;

/// An OAuth2 challenge the SDK needs a token for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuth2Challenge {
    pub authority: String,
    pub resource: String,
    /// Additional claims requested by the service, JSON-encoded.
    pub claims: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Token {
    pub access_token: String,
}

/// Acquires auth tokens on behalf of the SDK.
pub trait AuthDelegate: Send + Sync {
    /// # Errors
    /// `NoAuthToken` when a token cannot be produced for the challenge.
    fn acquire_token(&self, identity: &Identity, challenge: &OAuth2Challenge)
        -> Result<OAuth2Token>;
}

/// A user's answer to a consent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    AcceptAlways,
    Accept,
    Reject,
}

/// Asks the user for consent before the SDK contacts a new endpoint.
pub trait ConsentDelegate: Send + Sync {
    fn consent(&self, url: &str) -> Consent;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpRequestType {
    Get,
    Post,
}

/// Minimum TLS version the transport must negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMinimumVersion {
    Tls1_2,
    Tls1_3,
}

/// An HTTP request the SDK wants sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Unique id correlating the response (and cancellation) to this
    /// request.
    pub id: String,
    pub request_type: HttpRequestType,
    pub url: String,
    pub body: Vec<u8>,
    pub headers: BTreeMap<String, String>,
    pub tls_minimum_version: TlsMinimumVersion,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Id of the request this answers.
    pub id: String,
    pub status_code: u16,
    pub body: Vec<u8>,
    pub headers: BTreeMap<String, String>,
}

/// HTTP transport override. When the host provides one, the SDK performs
/// no networking of its own.
pub trait HttpDelegate: Send + Sync {
    /// # Errors
    /// `Network` for transport failures; the category tells the SDK
    /// whether to retry.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;

    /// Best-effort cancel of an in-flight request.
    fn cancel(&self, request_id: &str);
}

/// A cache row: column name to value.
pub type StorageRow = BTreeMap<String, String>;

/// Key/value table storage backing SDK caches.
///
/// Columns named in `encrypted_columns` at table creation hold sensitive
/// material; an on-disk implementation must protect them at rest.
pub trait StorageDelegate: Send + Sync {
    /// # Errors
    /// `BadInput` if the table exists with different columns.
    fn create_table(
        &self,
        table: &str,
        columns: &[String],
        encrypted_columns: &[String],
        key_columns: &[String],
    ) -> Result<()>;

    fn insert(&self, table: &str, row: StorageRow) -> Result<()>;

    /// All rows where `key_column` equals `key`.
    fn get(&self, table: &str, key_column: &str, key: &str) -> Result<Vec<StorageRow>>;

    /// Replace matching rows with `row`; returns the number updated.
    fn update(&self, table: &str, key_column: &str, key: &str, row: StorageRow) -> Result<usize>;

    /// Delete matching rows; returns the number removed.
    fn delete(&self, table: &str, key_column: &str, key: &str) -> Result<usize>;
}

#[derive(Debug, Default)]
struct Table {
    columns: Vec<String>,
    rows: Vec<StorageRow>,
}

/// Process-memory storage, the default cache backing. Nothing survives
/// the process; suitable for hosts that must not persist license state.
#[derive(Debug, Default)]
pub struct InMemoryStorageDelegate {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryStorageDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_columns(table: &Table, row: &StorageRow) -> Result<()> {
        for column in row.keys() {
            if !table.columns.contains(column) {
                return Err(SdkError::BadInput(format!("unknown column: {column}")));
            }
        }
        Ok(())
    }
}

impl StorageDelegate for InMemoryStorageDelegate {
    fn create_table(
        &self,
        table: &str,
        columns: &[String],
        _encrypted_columns: &[String],
        _key_columns: &[String],
    ) -> Result<()> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.get(table) {
            if existing.columns != columns {
                return Err(SdkError::BadInput(format!(
                    "table {table} already exists with different columns"
                )));
            }
            return Ok(());
        }
        tables.insert(
            table.to_owned(),
            Table {
                columns: columns.to_vec(),
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    fn insert(&self, table: &str, row: StorageRow) -> Result<()> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| SdkError::BadInput(format!("no such table: {table}")))?;
        Self::check_columns(t, &row)?;
        t.rows.push(row);
        Ok(())
    }

    fn get(&self, table: &str, key_column: &str, key: &str) -> Result<Vec<StorageRow>> {
        let tables = self.tables.read();
        let t = tables
            .get(table)
            .ok_or_else(|| SdkError::BadInput(format!("no such table: {table}")))?;
        Ok(t.rows
            .iter()
            .filter(|row| row.get(key_column).map(String::as_str) == Some(key))
            .cloned()
            .collect())
    }

    fn update(&self, table: &str, key_column: &str, key: &str, row: StorageRow) -> Result<usize> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| SdkError::BadInput(format!("no such table: {table}")))?;
        Self::check_columns(t, &row)?;
        let mut updated = 0;
        for existing in t
            .rows
            .iter_mut()
            .filter(|r| r.get(key_column).map(String::as_str) == Some(key))
        {
            *existing = row.clone();
            updated += 1;
        }
        Ok(updated)
    }

    fn delete(&self, table: &str, key_column: &str, key: &str) -> Result<usize> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| SdkError::BadInput(format!("no such table: {table}")))?;
        let before = t.rows.len();
        t.rows
            .retain(|row| row.get(key_column).map(String::as_str) != Some(key));
        Ok(before - t.rows.len())
    }
}

/// Serializable description of a storage configuration, used when wiring
/// delegates from a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for on-disk cache files.
    #[serde(default)]
    pub path: Option<String>,
    /// Delete caches from earlier SDK versions instead of migrating.
    #[serde(default)]
    pub discard_old_caches: bool,
}
