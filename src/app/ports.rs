use async_trait::async_trait;

use crate::common::error::{LookupFailure, Result};
use crate::common::types::NormalizedQuery;

// Lookup-side ports
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Resolves one query to formatted address lines.
#[async_trait]
pub trait AddressLookupPort: Send + Sync {
    async fn lookup(&self, query: &NormalizedQuery) -> std::result::Result<String, LookupFailure>;
}

#[async_trait]
pub trait RateLimiterPort: Send + Sync {
    async fn acquire(&self);
}

// Sheet-side ports
#[async_trait]
pub trait SheetSourcePort: Send + Sync {
    /// Cell text of a 1-based column in the spreadsheet's first worksheet.
    async fn read_column(&self, spreadsheet: &str, column: u32) -> Result<Vec<String>>;
}

#[async_trait]
pub trait SheetSinkPort: Send + Sync {
    async fn create_worksheet(
        &self,
        spreadsheet: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<()>;

    /// Writes `values` into column A of `title`, one per row starting at row 1.
    async fn write_column(&self, spreadsheet: &str, title: &str, values: &[String]) -> Result<()>;
}

// One client can serve as both source and sink
#[async_trait]
impl<T: SheetSourcePort + ?Sized> SheetSourcePort for std::sync::Arc<T> {
    async fn read_column(&self, spreadsheet: &str, column: u32) -> Result<Vec<String>> {
        (**self).read_column(spreadsheet, column).await
    }
}

#[async_trait]
impl<T: SheetSinkPort + ?Sized> SheetSinkPort for std::sync::Arc<T> {
    async fn create_worksheet(
        &self,
        spreadsheet: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<()> {
        (**self).create_worksheet(spreadsheet, title, rows, cols).await
    }

    async fn write_column(&self, spreadsheet: &str, title: &str, values: &[String]) -> Result<()> {
        (**self).write_column(spreadsheet, title, values).await
    }
}
