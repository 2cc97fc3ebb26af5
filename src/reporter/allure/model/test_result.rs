use std::path::Path;

use serde_derive::Deserialize;
use serde_json::Value;

use super::status::Status;
use crate::app::error::ResultParseError;

/// The part of an Allure `*-result.json` record the report needs
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    #[serde(default, with = "crate::configuration::deserialize::lenient_status")]
    pub status: Status,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl TestResult {
    pub fn from_file(path: &Path) -> Result<Self, ResultParseError> {
        let content = std::fs::read_to_string(path).map_err(|source| ResultParseError::Io {
            path: path.to_owned(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| ResultParseError::Json {
                path: path.to_owned(),
                source,
            })?;
        match value {
            Value::Null => Err(ResultParseError::Null {
                path: path.to_owned(),
            }),
            Value::Object(_) => serde_json::from_value(value).map_err(|source| {
                ResultParseError::Json {
                    path: path.to_owned(),
                    source,
                }
            }),
            // any other JSON value is a record without a readable status
            _ => Ok(Self::default()),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| self.full_name.as_deref())
    }
}

impl From<Status> for TestResult {
    fn from(status: Status) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}
