use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::app::ports::{SheetSinkPort, SheetSourcePort};
use crate::common::constants::{DRIVE_API_BASE, SHEETS_API_BASE, SPREADSHEET_MIME_TYPE};
use crate::common::error::{Result, ValidatorError};
use crate::infra::sheets::auth::TokenProvider;
use crate::infra::sheets::range;

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Drive query that finds a spreadsheet by exact title.
pub fn title_query(title: &str) -> String {
    let escaped = title.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escaped, SPREADSHEET_MIME_TYPE
    )
}

/// Cell values arrive as JSON strings with the default render option; anything else is stringified.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Google Sheets v4 client acting as both sheet source and sheet sink.
pub struct SheetsClient {
    http: reqwest::Client,
    tokens: TokenProvider,
    sheets_base: Url,
    drive_base: Url,
    // spreadsheet title -> id
    ids: Mutex<HashMap<String, String>>,
}

impl SheetsClient {
    pub fn new(http: reqwest::Client, tokens: TokenProvider) -> Result<Self> {
        Self::with_endpoints(http, tokens, SHEETS_API_BASE, DRIVE_API_BASE)
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        tokens: TokenProvider,
        sheets_base: &str,
        drive_base: &str,
    ) -> Result<Self> {
        let parse = |base: &str| {
            Url::parse(base).map_err(|e| {
                ValidatorError::Config(format!("Invalid API base URL '{}': {}", base, e))
            })
        };
        Ok(Self {
            http,
            tokens,
            sheets_base: parse(sheets_base)?,
            drive_base: parse(drive_base)?,
            ids: Mutex::new(HashMap::new()),
        })
    }

    fn endpoint(base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn spreadsheet_url(&self, id: &str, tail: &[&str]) -> Url {
        let mut segments = vec!["v4", "spreadsheets", id];
        segments.extend_from_slice(tail);
        Self::endpoint(&self.sheets_base, &segments)
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, what: &str, request: RequestBuilder) -> Result<T> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ValidatorError::Sheets {
                message: format!("{} returned {}: {}", what, status, body),
            });
        }
        Ok(resp.json().await?)
    }

    /// Looks up a spreadsheet id by title, caching the answer for the life of the client.
    #[instrument(skip(self))]
    pub async fn open_by_title(&self, title: &str) -> Result<String> {
        if let Some(id) = self.ids.lock().await.get(title) {
            return Ok(id.clone());
        }

        let url = Self::endpoint(&self.drive_base, &["drive", "v3", "files"]);
        let query = title_query(title);
        let request = self.request(Method::GET, url).await?.query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);
        let list: DriveFileList = self.send("Drive files.list", request).await?;

        let id = list
            .files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| ValidatorError::Sheets {
                message: format!(
                    "Spreadsheet '{}' not found or not shared with {}",
                    title,
                    self.tokens.client_email()
                ),
            })?;
        info!(spreadsheet = title, id = %id, "Opened spreadsheet");
        self.ids.lock().await.insert(title.to_string(), id.clone());
        Ok(id)
    }

    /// Title of the worksheet with the lowest index.
    pub async fn first_worksheet_title(&self, id: &str) -> Result<String> {
        let url = self.spreadsheet_url(id, &[]);
        let request = self
            .request(Method::GET, url)
            .await?
            .query(&[("fields", "sheets.properties(title,index)")]);
        let meta: SpreadsheetMeta = self.send("spreadsheets.get", request).await?;
        meta.sheets
            .into_iter()
            .min_by_key(|s| s.properties.index)
            .map(|s| s.properties.title)
            .ok_or_else(|| {
                ValidatorError::MissingField(format!("spreadsheet {} has no worksheets", id))
            })
    }
}

#[async_trait]
impl SheetSourcePort for SheetsClient {
    async fn read_column(&self, spreadsheet: &str, column: u32) -> Result<Vec<String>> {
        if column == 0 {
            return Err(ValidatorError::InvalidInput("column numbers start at 1".to_string()));
        }
        let id = self.open_by_title(spreadsheet).await?;
        let worksheet = self.first_worksheet_title(&id).await?;
        let a1 = range::column_range(&worksheet, column);
        debug!(range = %a1, "Reading column");

        let url = self.spreadsheet_url(&id, &["values", &a1]);
        let request = self
            .request(Method::GET, url)
            .await?
            .query(&[("majorDimension", "COLUMNS")]);
        let values: ValueRange = self.send("values.get", request).await?;

        let cells: Vec<String> = values
            .values
            .into_iter()
            .next()
            .map(|col| col.iter().map(cell_text).collect())
            .unwrap_or_default();
        info!("Read {} cells from {}", cells.len(), a1);
        Ok(cells)
    }
}

#[async_trait]
impl SheetSinkPort for SheetsClient {
    async fn create_worksheet(
        &self,
        spreadsheet: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<()> {
        let id = self.open_by_title(spreadsheet).await?;
        // batchUpdate is addressed as `{id}:batchUpdate`
        let batch = format!("{}:batchUpdate", id);
        let url = Self::endpoint(&self.sheets_base, &["v4", "spreadsheets", &batch]);
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }]
        });
        let request = self.request(Method::POST, url).await?.json(&body);
        let _: Value = self.send("spreadsheets.batchUpdate", request).await?;
        info!(spreadsheet, worksheet = title, rows, cols, "Created worksheet");
        Ok(())
    }

    async fn write_column(&self, spreadsheet: &str, title: &str, values: &[String]) -> Result<()> {
        let id = self.open_by_title(spreadsheet).await?;
        let a1 = range::first_column_range(title, values.len());
        let url = self.spreadsheet_url(&id, &["values", &a1]);
        let body = json!({
            "range": a1,
            "majorDimension": "COLUMNS",
            "values": [values],
        });
        let request = self
            .request(Method::PUT, url)
            .await?
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        let _: Value = self.send("values.update", request).await?;
        debug!(range = %a1, "Wrote {} cells", values.len());
        Ok(())
    }
}
