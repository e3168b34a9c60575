//! FILENAME: app/src/config.rs
//! PURPOSE: Host configuration: where rows come from and how the table starts.
//! CONTEXT: Read once at startup from a JSON file. Every field has a default,
//! so an empty `{}` (or no file at all) yields the stock list setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use table_engine::{PageSize, TableError, TableProps, DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE_SIZE_OPTIONS};
use thiserror::Error;

/// Env var carrying the bearer token for the SharePoint source.
pub const ACCESS_TOKEN_ENV_VAR: &str = "DATATABLE_ACCESS_TOKEN";

/// Fields selected from the list, in column order.
pub const DEFAULT_LIST_FIELDS: [&str; 5] = ["Title", "number", "Date", "ID", "Choice"];

pub const DEFAULT_LIST_TITLE: &str = "post";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid table settings: {0}")]
    Table(#[from] TableError),
}

/// Where the loader fetches rows from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceConfig {
    #[serde(rename_all = "camelCase")]
    Sharepoint {
        site_url: String,
        #[serde(default = "default_list_title")]
        list_title: String,
        #[serde(default = "default_list_fields")]
        fields: Vec<String>,
    },
    Json {
        path: PathBuf,
    },
    Xlsx {
        path: PathBuf,
    },
}

fn default_list_title() -> String {
    DEFAULT_LIST_TITLE.to_string()
}

fn default_list_fields() -> Vec<String> {
    DEFAULT_LIST_FIELDS.iter().map(|f| f.to_string()).collect()
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Json {
            path: PathBuf::from("data.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub source: SourceConfig,
    /// Page size choices; -1 means all rows
    pub items_per_page_options: Vec<i64>,
    pub default_items_per_page: i64,
    pub export_path: PathBuf,
    /// `None` logs to the console only
    pub log_path: Option<PathBuf>,
    /// Bearer token; normally supplied through the environment instead
    pub access_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source: SourceConfig::default(),
            items_per_page_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE as i64,
            export_path: PathBuf::from(persistence::EXPORT_FILE_NAME),
            log_path: Some(PathBuf::from(crate::logging::DEFAULT_LOG_FILE)),
            access_token: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Read `path` if given, otherwise start from defaults.
    /// The access token env var always wins over the file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV_VAR) {
            if !token.is_empty() {
                config.access_token = Some(token);
            }
        }
        Ok(config)
    }

    /// Table props for the given headers using the configured page sizes.
    pub fn table_props(&self, column_headers: Vec<String>) -> Result<TableProps, ConfigError> {
        let items_per_page_options = self
            .items_per_page_options
            .iter()
            .map(|v| PageSize::from_option(*v))
            .collect::<Result<Vec<_>, _>>()?;
        let default_items_per_page = PageSize::from_option(self.default_items_per_page)?;

        Ok(TableProps {
            column_headers,
            items_per_page_options,
            default_items_per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.items_per_page_options, vec![5, 15, 25, 50, -1]);
        assert_eq!(config.default_items_per_page, 6);
        assert_eq!(config.export_path, PathBuf::from("data.xlsx"));
    }

    #[test]
    fn test_sharepoint_source_defaults() {
        let config = AppConfig::from_json(
            r#"{"source": {"kind": "sharepoint", "siteUrl": "https://contoso.sharepoint.com/sites/demo"}}"#,
        )
        .unwrap();
        match config.source {
            SourceConfig::Sharepoint { site_url, list_title, fields } => {
                assert_eq!(site_url, "https://contoso.sharepoint.com/sites/demo");
                assert_eq!(list_title, "post");
                assert_eq!(fields, vec!["Title", "number", "Date", "ID", "Choice"]);
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_table_props_conversion() {
        let config = AppConfig::default();
        let props = config.table_props(vec!["A".to_string()]).unwrap();
        assert_eq!(props.items_per_page_options.len(), 5);
        assert_eq!(props.items_per_page_options[4], PageSize::Unbounded);
        assert_eq!(props.default_items_per_page, PageSize::fixed(6).unwrap());
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let config = AppConfig::from_json(r#"{"itemsPerPageOptions": [5, 0]}"#).unwrap();
        assert!(matches!(
            config.table_props(vec!["A".to_string()]),
            Err(ConfigError::Table(TableError::InvalidPageSize(0)))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
