use tracing::info;

use crate::app::ports::SheetSourcePort;
use crate::app::upload_use_case::UploadUseCase;
use crate::app::validate_use_case::ValidateUseCase;
use crate::common::error::{Result, ValidatorError};
use crate::common::types::{AddressPair, ValidationResult};

/// Which spreadsheet to process and where its data lives. Columns and rows are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub spreadsheet: String,
    pub address_col: u32,
    pub postcode_col: u32,
    pub start_row: u32,
}

impl RunRequest {
    pub fn validate(&self) -> Result<()> {
        if self.spreadsheet.trim().is_empty() {
            return Err(ValidatorError::InvalidInput("spreadsheet name is empty".to_string()));
        }
        for (name, value) in [
            ("address column", self.address_col),
            ("postcode column", self.postcode_col),
            ("start row", self.start_row),
        ] {
            if value == 0 {
                return Err(ValidatorError::InvalidInput(format!("{} must be 1 or greater", name)));
            }
        }
        Ok(())
    }

    pub fn start_index(&self) -> usize {
        self.start_row.saturating_sub(1) as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub rows_read: usize,
    pub processed: usize,
    pub resolved: usize,
    pub failed: usize,
    pub written: usize,
}

/// Read both columns, validate every row, and upload the results
pub struct RunUseCase {
    source: Box<dyn SheetSourcePort>,
    validator: ValidateUseCase,
    uploader: UploadUseCase,
}

impl RunUseCase {
    pub fn new(
        source: Box<dyn SheetSourcePort>,
        validator: ValidateUseCase,
        uploader: UploadUseCase,
    ) -> Self {
        Self {
            source,
            validator,
            uploader,
        }
    }

    pub async fn read_pairs(&self, request: &RunRequest) -> Result<Vec<AddressPair>> {
        info!(spreadsheet = %request.spreadsheet, "Pulling data from sheet");
        let addresses = self
            .source
            .read_column(&request.spreadsheet, request.address_col)
            .await?;
        let postcodes = self
            .source
            .read_column(&request.spreadsheet, request.postcode_col)
            .await?;
        Ok(AddressPair::zip_columns(addresses, postcodes))
    }

    pub async fn run(&self, request: &RunRequest) -> Result<RunReport> {
        request.validate()?;

        let pairs = self.read_pairs(request).await?;
        let results = self.validator.validate(&pairs, request.start_index()).await;
        let cells: Vec<String> = results.iter().map(ValidationResult::to_cell_text).collect();
        let written = self.uploader.upload(&request.spreadsheet, &cells).await?;

        let resolved = results.iter().filter(|r| r.is_resolved()).count();
        Ok(RunReport {
            rows_read: pairs.len(),
            processed: results.len(),
            resolved,
            failed: results.len() - resolved,
            written,
        })
    }
}
