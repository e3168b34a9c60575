//! FILENAME: app/src/loader.rs
//! PURPOSE: Fetches column headers and rows from a list store, once.
//! CONTEXT: The table never talks to a store itself. A `ListSource` hands
//! back `(headers, rows)`; `load_into` turns that into a mounted table. A
//! failed fetch is logged and the state stays `Loading` for good.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use table_engine::{CellValue, DataTable, Dataset, Row, TableError};
use thiserror::Error;

use crate::config::{AppConfig, ConfigError, SourceConfig};
use crate::{log_enter, log_error, log_exit, log_info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] persistence::PersistenceError),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Invalid table: {0}")]
    Table(#[from] TableError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// What a source returns: the column headers and positionally matched rows.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedList {
    pub column_headers: Vec<String>,
    pub rows: Dataset,
}

#[async_trait]
pub trait ListSource: Send + Sync {
    async fn fetch(&self) -> Result<LoadedList, LoadError>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}

// ============================================================================
// SHAREPOINT REST SOURCE
// ============================================================================

/// Reads items from a SharePoint list through the REST API.
#[derive(Debug, Clone)]
pub struct SharePointListSource {
    http_client: reqwest::Client,
    site_url: String,
    list_title: String,
    fields: Vec<String>,
    access_token: Option<String>,
}

impl SharePointListSource {
    pub fn new(site_url: impl Into<String>, list_title: impl Into<String>, fields: Vec<String>) -> Self {
        SharePointListSource {
            http_client: reqwest::Client::new(),
            site_url: site_url.into(),
            list_title: list_title.into(),
            fields,
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// First page URL: `{site}/_api/web/lists/getbytitle('{title}')/items?$select=...`
    pub fn items_url(&self) -> String {
        format!(
            "{}/_api/web/lists/getbytitle('{}')/items?$select={}",
            self.site_url.trim_end_matches('/'),
            self.list_title.replace('\'', "''"),
            self.fields.join(",")
        )
    }

    async fn get_page(&self, url: &str) -> Result<Value, LoadError> {
        let mut request = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json;odata=nometadata");
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LoadError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ListSource for SharePointListSource {
    async fn fetch(&self) -> Result<LoadedList, LoadError> {
        let mut items = Vec::new();
        let mut next = Some(self.items_url());

        while let Some(url) = next {
            let page = self.get_page(&url).await?;
            let (page_items, next_link) = split_items_page(page)?;
            items.extend(page_items);
            next = next_link;
        }

        Ok(LoadedList {
            column_headers: self.fields.clone(),
            rows: Dataset::from_rows(rows_from_items(&self.fields, &items)),
        })
    }

    fn describe(&self) -> String {
        format!("sharepoint list '{}' at {}", self.list_title, self.site_url)
    }
}

/// Pull the item array and the next page link out of a REST payload.
/// Accepts `{"value": [...]}` (nometadata/minimal) and `{"d": {"results": [...]}}` (verbose).
pub fn split_items_page(page: Value) -> Result<(Vec<Map<String, Value>>, Option<String>), LoadError> {
    let mut page = match page {
        Value::Object(map) => map,
        other => return Err(LoadError::Shape(format!("expected object, got {}", other))),
    };

    if let Some(Value::Object(d)) = page.remove("d") {
        page = d;
    }

    let next_link = ["odata.nextLink", "@odata.nextLink", "__next"]
        .iter()
        .find_map(|k| page.get(*k).and_then(Value::as_str).map(str::to_string));

    let items = match page.remove("value").or_else(|| page.remove("results")) {
        Some(Value::Array(items)) => items,
        _ => return Err(LoadError::Shape("missing item array".to_string())),
    };

    let items = items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            other => Err(LoadError::Shape(format!("expected item object, got {}", other))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((items, next_link))
}

/// Map list items to rows ordered by `fields`. Missing fields are empty.
pub fn rows_from_items(fields: &[String], items: &[Map<String, Value>]) -> Vec<Row> {
    items
        .iter()
        .map(|item| {
            fields
                .iter()
                .map(|f| item.get(f).map(json_to_cell).unwrap_or_default())
                .collect()
        })
        .collect()
}

fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(b) => CellValue::Boolean(*b),
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
        Value::String(s) => CellValue::Text(s.clone()),
        // Lookup and multi-choice fields arrive as objects/arrays
        other => CellValue::Text(other.to_string()),
    }
}

// ============================================================================
// FILE SOURCES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonListFile {
    column_headers: Vec<String>,
    data: Dataset,
}

/// Reads `{"columnHeaders": [...], "data": [[...], null, ...]}` from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }
}

#[async_trait]
impl ListSource for JsonFileSource {
    async fn fetch(&self) -> Result<LoadedList, LoadError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let file: JsonListFile = serde_json::from_str(&json)?;
        Ok(LoadedList {
            column_headers: file.column_headers,
            rows: file.data,
        })
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

/// Reads the first worksheet of an XLSX file (e.g. a previous export).
#[derive(Debug, Clone)]
pub struct XlsxFileSource {
    path: PathBuf,
}

impl XlsxFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        XlsxFileSource { path: path.into() }
    }
}

#[async_trait]
impl ListSource for XlsxFileSource {
    async fn fetch(&self) -> Result<LoadedList, LoadError> {
        let sheet = persistence::load_xlsx(&self.path)?;
        Ok(LoadedList {
            column_headers: sheet.column_headers,
            rows: sheet.rows,
        })
    }

    fn describe(&self) -> String {
        format!("xlsx file {}", self.path.display())
    }
}

/// Build the source named by the config.
pub fn source_from_config(config: &AppConfig) -> Box<dyn ListSource> {
    match &config.source {
        SourceConfig::Sharepoint {
            site_url,
            list_title,
            fields,
        } => Box::new(
            SharePointListSource::new(site_url.clone(), list_title.clone(), fields.clone())
                .with_access_token(config.access_token.clone()),
        ),
        SourceConfig::Json { path } => Box::new(JsonFileSource::new(path.clone())),
        SourceConfig::Xlsx { path } => Box::new(XlsxFileSource::new(path.clone())),
    }
}

// ============================================================================
// LOAD STATE
// ============================================================================

/// Table lifecycle as seen by the host.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(DataTable),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn table(&self) -> Option<&DataTable> {
        match self {
            LoadState::Ready(t) => Some(t),
            LoadState::Loading => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut DataTable> {
        match self {
            LoadState::Ready(t) => Some(t),
            LoadState::Loading => None,
        }
    }
}

/// Fetch and mount a table.
pub async fn load_table(source: &dyn ListSource, config: &AppConfig) -> Result<DataTable, LoadError> {
    let list = source.fetch().await?;
    let props = config.table_props(list.column_headers)?;
    Ok(DataTable::new(props, Arc::new(list.rows))?)
}

/// Fetch once and store the result. On failure the error is logged and the
/// state is left untouched (still `Loading`); there is no retry.
pub async fn load_into(state: &crate::AppState, source: &dyn ListSource) -> bool {
    log_enter!("LOAD", "load_into", "source={}", source.describe());

    let loaded = match load_table(source, &state.config).await {
        Ok(table) => {
            let rows = table.data().len();
            *crate::commands::lock_table(state) = LoadState::Ready(table);
            log_info!("LOAD", "loaded {} rows", rows);
            true
        }
        Err(e) => {
            log_error!("LOAD", "Error fetching data: {}", e);
            false
        }
    };

    log_exit!("LOAD", "load_into", "loaded={}", loaded);
    loaded
}
