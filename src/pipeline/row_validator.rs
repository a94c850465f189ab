//! Pure per-row transforms: skip rule, query derivation, and payload formatting.
//!
//! Nothing here touches the network; the lookup itself lives behind
//! [`crate::app::ports::AddressLookupPort`].

use serde_json::Value;

use crate::common::error::LookupFailure;
use crate::common::types::{AddressPair, NormalizedQuery};

/// A row is skipped only when both cells are empty. A row with one empty cell
/// is still looked up.
pub fn should_skip(pair: &AddressPair) -> bool {
    pair.raw_address.is_empty() && pair.raw_postcode.is_empty()
}

/// First space-delimited token of the address cell, or the whole cell when it has no space.
pub fn derive_house_number(raw_address: &str) -> &str {
    match raw_address.split_once(' ') {
        Some((house_number, _)) => house_number,
        None => raw_address,
    }
}

/// Removes every space character. Case and other characters are left alone.
pub fn normalize_postcode(raw_postcode: &str) -> String {
    raw_postcode.replace(' ', "")
}

pub fn normalize(pair: &AddressPair) -> NormalizedQuery {
    NormalizedQuery {
        house_number: derive_house_number(&pair.raw_address).to_string(),
        postcode: normalize_postcode(&pair.raw_postcode),
    }
}

/// Turns a comma-separated address into one line per part, dropping empty lines.
pub fn format_address(address: &str) -> String {
    address
        .replace(", ", "\n")
        .lines()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts and formats `Addresses[0]` from a lookup response body.
pub fn parse_lookup_payload(body: &[u8]) -> Result<String, LookupFailure> {
    let payload: Value =
        serde_json::from_slice(body).map_err(|e| LookupFailure::Payload(e.to_string()))?;

    let addresses = payload
        .get("Addresses")
        .and_then(Value::as_array)
        .ok_or_else(|| LookupFailure::Payload("missing Addresses list".to_string()))?;

    let first = addresses.first().ok_or(LookupFailure::NoAddresses)?;
    let first = first
        .as_str()
        .ok_or_else(|| LookupFailure::Payload("first address is not a string".to_string()))?;

    Ok(format_address(first))
}
