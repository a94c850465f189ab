//! A1-notation helpers for the Sheets values API.

/// 1-based column index to its letter name: 1 -> A, 26 -> Z, 27 -> AA.
pub fn column_letter(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = ((column - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Worksheet titles are always quoted; embedded quotes are doubled.
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Whole-column range, e.g. `'Sheet1'!B:B`.
pub fn column_range(title: &str, column: u32) -> String {
    let letter = column_letter(column);
    format!("{}!{}:{}", quote_title(title), letter, letter)
}

/// Rows 1..=rows of column A, e.g. `'Validated Addresses'!A1:A12`.
pub fn first_column_range(title: &str, rows: usize) -> String {
    format!("{}!A1:A{}", quote_title(title), rows.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(2), "B");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_ranges() {
        assert_eq!(column_range("Sheet1", 3), "'Sheet1'!C:C");
        assert_eq!(column_range("Bob's leads", 1), "'Bob''s leads'!A:A");
        assert_eq!(first_column_range("Validated Addresses", 12), "'Validated Addresses'!A1:A12");
    }
}
