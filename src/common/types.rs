use serde::{Deserialize, Serialize};

use crate::common::constants::BAD_INPUT_MARKER;

/// One spreadsheet row: raw address cell text and raw postcode cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPair {
    pub raw_address: String,
    pub raw_postcode: String,
}

impl AddressPair {
    pub fn new(raw_address: impl Into<String>, raw_postcode: impl Into<String>) -> Self {
        Self {
            raw_address: raw_address.into(),
            raw_postcode: raw_postcode.into(),
        }
    }

    /// Pair two columns row by row. The shorter column is padded with empty cells.
    pub fn zip_columns(addresses: Vec<String>, postcodes: Vec<String>) -> Vec<AddressPair> {
        let len = addresses.len().max(postcodes.len());
        let mut addresses = addresses.into_iter();
        let mut postcodes = postcodes.into_iter();
        (0..len)
            .map(|_| AddressPair {
                raw_address: addresses.next().unwrap_or_default(),
                raw_postcode: postcodes.next().unwrap_or_default(),
            })
            .collect()
    }
}

/// Query sent to the lookup service, derived from an [`AddressPair`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuery {
    pub house_number: String,
    pub postcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Resolved {
        formatted_address: String,
        postcode: String,
    },
    Failed {
        marker: String,
        postcode: String,
    },
}

impl ValidationResult {
    pub fn resolved(formatted_address: impl Into<String>, postcode: impl Into<String>) -> Self {
        ValidationResult::Resolved {
            formatted_address: formatted_address.into(),
            postcode: postcode.into(),
        }
    }

    pub fn failed(postcode: impl Into<String>) -> Self {
        ValidationResult::Failed {
            marker: BAD_INPUT_MARKER.to_string(),
            postcode: postcode.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ValidationResult::Resolved { .. })
    }

    pub fn postcode(&self) -> &str {
        match self {
            ValidationResult::Resolved { postcode, .. }
            | ValidationResult::Failed { postcode, .. } => postcode,
        }
    }

    /// The address lines, or the marker for a failed row
    pub fn address_text(&self) -> &str {
        match self {
            ValidationResult::Resolved { formatted_address, .. } => formatted_address,
            ValidationResult::Failed { marker, .. } => marker,
        }
    }

    /// Text written to a single output cell: address (or marker), newline, postcode.
    pub fn to_cell_text(&self) -> String {
        format!("{}\n{}", self.address_text(), self.postcode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_for_resolved_row() {
        let result = ValidationResult::resolved("10\nDowning Street\nLondon", "SW1A2AA");
        assert_eq!(result.to_cell_text(), "10\nDowning Street\nLondon\nSW1A2AA");
        assert!(result.is_resolved());
    }

    #[test]
    fn test_cell_text_for_failed_row() {
        let result = ValidationResult::failed("ZZ99ZZ");
        assert_eq!(result.to_cell_text(), "BAD INPUT\nZZ99ZZ");
        assert_eq!(result.address_text(), BAD_INPUT_MARKER);
        assert!(!result.is_resolved());
    }

    #[test]
    fn test_zip_columns_pads_shorter_column() {
        let pairs = AddressPair::zip_columns(
            vec!["1 High St".into(), "2 High St".into(), "3 High St".into()],
            vec!["AB1 2CD".into()],
        );
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], AddressPair::new("1 High St", "AB1 2CD"));
        assert_eq!(pairs[2], AddressPair::new("3 High St", ""));

        let pairs = AddressPair::zip_columns(vec![], vec!["AB1 2CD".into(), "EF3 4GH".into()]);
        assert_eq!(pairs[1], AddressPair::new("", "EF3 4GH"));
    }
}
