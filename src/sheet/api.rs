//! Google Sheets v4 REST backend
//!
//! Appends use `values:append` with raw input and row insertion. Every request
//! carries the configured timeout.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SheetStore;
use crate::error::{self, Result};

/// Values payload of the Sheets API
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Sheet store talking to the Google Sheets REST API with a bearer token
pub struct SheetsApiStore {
    client: Client,
    base_url: Url,
    token: String,
}

impl SheetsApiStore {
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            error::config::invalid(format!("invalid api_base_url '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(error::config::invalid(format!(
                "api_base_url '{base_url}' cannot carry a path"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// `<base>/v4/spreadsheets/<id>/values/<range><suffix>`
    fn values_url(&self, sheet_id: &str, range: &str, suffix: &str) -> Url {
        let mut url = self.base_url.clone();
        let last = format!("{range}{suffix}");
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", sheet_id, "values", last.as_str()]);
        }
        url
    }
}

impl SheetStore for SheetsApiStore {
    fn append(&self, sheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        let url = self.values_url(sheet_id, range, ":append");
        let body = ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values: rows
                .iter()
                .map(|row| row.iter().cloned().map(serde_json::Value::String).collect())
                .collect(),
        };

        debug!(%url, rows = rows.len(), "POST values:append");
        self.client
            .post(url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(&self.token)
            .json(&body)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn read(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(sheet_id, range, "");

        debug!(%url, "GET values");
        let response: ValueRange = self
            .client
            .get(url)
            .query(&[("majorDimension", "ROWS")])
            .bearer_auth(&self.token)
            .send()?
            .error_for_status()?
            .json()?;

        Ok(response
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
