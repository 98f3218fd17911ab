//! A1-notation start ranges such as `Components!A4`

use std::fmt;

use crate::error::{self, Result};

/// A sheet name plus the cell a table starts at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    sheet: String,
    column: String,
    row: u32,
}

impl SheetRange {
    /// Parse `Sheet!A4` or `'My Sheet'!B2`. An end cell (`Sheet!A4:ZZ`) is
    /// accepted and ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || error::config::invalid(format!("'{input}' is not a Sheet!A1 range"));

        let (sheet, cell) = input.rsplit_once('!').ok_or_else(invalid)?;
        let cell = cell.split_once(':').map_or(cell, |(start, _)| start);
        let sheet = sheet
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(sheet);
        if sheet.is_empty() {
            return Err(invalid());
        }

        let split = cell
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (column, row) = cell.split_at(split);
        if column.is_empty() || !column.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        let row: u32 = row.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self {
            sheet: sheet.to_string(),
            column: column.to_ascii_uppercase(),
            row,
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    /// Open-ended range covering the table from its start cell downwards
    pub fn table_range(&self) -> String {
        format!("{}!{}{}:ZZ", quote_sheet(&self.sheet), self.column, self.row)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}{}", quote_sheet(&self.sheet), self.column, self.row)
    }
}

fn quote_sheet(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{name}'")
    }
}
