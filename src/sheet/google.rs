//! Google Sheets backend (Sheets API v4 over blocking HTTP)
//!
//! Authentication is out of scope: the caller supplies an OAuth access token with the
//! spreadsheets scope, e.g. from `gcloud auth print-access-token`.

use crate::error::{Error, Result};
use crate::sheet::Workbook;
use crate::types::Row;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

static SPREADSHEET_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").unwrap());

/// Accept either a bare spreadsheet id or a full spreadsheet URL
pub fn spreadsheet_id(url_or_id: &str) -> Option<String> {
    let trimmed = url_or_id.trim();
    if let Some(caps) = SPREADSHEET_URL_REGEX.captures(trimmed) {
        return Some(caps[1].to_string());
    }
    if !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Some(trimmed.to_string());
    }
    None
}

/// A1 range covering a whole worksheet
fn whole_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Body of a `values:append` call
#[derive(Debug, Serialize)]
struct ValueRange<'a> {
    values: &'a [Row],
}

/// Body of a `:batchUpdate` call
#[derive(Debug, Serialize)]
struct BatchUpdate<'a> {
    requests: Vec<SheetRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum SheetRequest<'a> {
    AddSheet { properties: SheetProperties<'a> },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties<'a> {
    title: &'a str,
    grid_properties: GridProperties,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GridProperties {
    row_count: usize,
    column_count: usize,
}

pub struct GoogleSheets {
    client: Client,
    spreadsheet_id: String,
    token: String,
    titles: Option<Vec<String>>,
}

impl GoogleSheets {
    pub fn new(url_or_id: &str, token: impl Into<String>) -> Result<Self> {
        let spreadsheet_id = spreadsheet_id(url_or_id)
            .ok_or_else(|| Error::Config(format!("not a spreadsheet id or URL: {}", url_or_id)))?;
        let client = Client::builder().build().map_err(|source| Error::Http {
            url: SHEETS_API.to_string(),
            source,
        })?;
        Ok(GoogleSheets {
            client,
            spreadsheet_id,
            token: token.into(),
            titles: None,
        })
    }

    /// Spreadsheet URL with extra path segments, each percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(SHEETS_API)
            .map_err(|e| Error::Config(format!("bad Sheets API root: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("Sheets API root cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    fn send(&self, sheet: &str, request: reqwest::blocking::RequestBuilder) -> Result<Value> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .map_err(|source| Error::Http {
                url: SHEETS_API.to_string(),
                source,
            })?;
        let status = response.status();
        let body = response.text().map_err(|source| Error::Http {
            url: SHEETS_API.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(Error::Sheet {
                sheet: sheet.to_string(),
                message: format!("HTTP {}: {}", status.as_u16(), body),
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn load_titles(&mut self) -> Result<&mut Vec<String>> {
        if self.titles.is_none() {
            let mut url = self.url(&[])?;
            url.query_pairs_mut()
                .append_pair("fields", "sheets.properties.title");
            let meta = self.send("", self.client.get(url))?;
            let titles = crate::lookup::array_at(&meta, &["sheets"])
                .iter()
                .filter_map(|s| crate::lookup::str_at(s, &["properties", "title"]))
                .map(str::to_string)
                .collect();
            self.titles = Some(titles);
        }
        Ok(self.titles.get_or_insert_with(Vec::new))
    }
}

impl Workbook for GoogleSheets {
    fn has_worksheet(&mut self, title: &str) -> Result<bool> {
        Ok(self.load_titles()?.iter().any(|t| t == title))
    }

    fn add_worksheet(&mut self, title: &str, rows: usize, cols: usize) -> Result<()> {
        let mut url = self.url(&[])?;
        let path = format!("{}:batchUpdate", url.path());
        url.set_path(&path);
        let body = BatchUpdate {
            requests: vec![SheetRequest::AddSheet {
                properties: SheetProperties {
                    title,
                    grid_properties: GridProperties {
                        row_count: rows,
                        column_count: cols,
                    },
                },
            }],
        };
        self.send(title, self.client.post(url).json(&body))?;
        self.load_titles()?.push(title.to_string());
        Ok(())
    }

    fn clear(&mut self, title: &str) -> Result<()> {
        let range = format!("{}:clear", whole_sheet(title));
        let url = self.url(&["values", &range])?;
        debug!(sheet = title, "clearing worksheet");
        self.send(title, self.client.post(url).json(&json!({})))?;
        Ok(())
    }

    fn append_rows(&mut self, title: &str, rows: &[Row]) -> Result<()> {
        let range = format!("{}:append", whole_sheet(title));
        let mut url = self.url(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        debug!(sheet = title, rows = rows.len(), "appending rows");
        self.send(title, self.client.post(url).json(&ValueRange { values: rows }))?;
        Ok(())
    }
}
