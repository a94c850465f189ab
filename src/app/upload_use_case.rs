use tracing::info;

use crate::app::ports::SheetSinkPort;
use crate::common::constants::OUTPUT_COLUMNS;
use crate::common::error::{Result, ValidatorError};
use crate::observability::metrics;

/// Writes rendered results into a freshly created worksheet
pub struct UploadUseCase {
    sink: Box<dyn SheetSinkPort>,
    worksheet_title: String,
}

impl UploadUseCase {
    pub fn new(sink: Box<dyn SheetSinkPort>, worksheet_title: impl Into<String>) -> Self {
        Self {
            sink,
            worksheet_title: worksheet_title.into(),
        }
    }

    /// Creates the output worksheet and writes one value per row.
    ///
    /// Returns the number of rows written.
    pub async fn upload(&self, spreadsheet: &str, values: &[String]) -> Result<usize> {
        // The Sheets API rejects a zero-row grid
        let rows = u32::try_from(values.len().max(1)).map_err(|_| {
            ValidatorError::InvalidInput(format!(
                "{} rows exceed the worksheet limit",
                values.len()
            ))
        })?;

        info!(spreadsheet, worksheet = %self.worksheet_title, rows, "Creating output worksheet");
        self.sink
            .create_worksheet(spreadsheet, &self.worksheet_title, rows, OUTPUT_COLUMNS)
            .await?;

        if values.is_empty() {
            info!("No rows to write");
            return Ok(0);
        }

        self.sink
            .write_column(spreadsheet, &self.worksheet_title, values)
            .await?;
        metrics::rows::written(values.len() as u64);
        info!("Wrote {} rows to '{}'", values.len(), self.worksheet_title);
        Ok(values.len())
    }
}
