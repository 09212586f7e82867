//! Workbook Decoder Module
//! Turns raw statement file bytes into positional, untyped rows.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("not a readable workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("workbook contains no sheets")]
    NoSheets,
    #[error("not a readable csv file: {0}")]
    Csv(#[from] csv::Error),
}

/// Date formats accepted for text date cells, tried in order. Day-first
/// formats win over month-first because the source layout is a day-first
/// bank statement.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%m/%d/%Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// One untyped spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

/// An ordered row of cells; positions carry the meaning, not names.
pub type RawRow = Vec<Cell>;

impl Cell {
    fn from_sheet(data: &Data) -> Cell {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(when) => Cell::Date(when.date()),
                None => Cell::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }

    /// The cell rendered as text; `Empty` renders as "".
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.to_string(),
        }
    }

    /// The cell as a finite number. Text is parsed after stripping
    /// thousands commas.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// The cell as a calendar date. Typed date cells pass through; text is
    /// tried against the statement date formats.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_text_date(s),
            _ => None,
        }
    }
}

fn parse_text_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(when) = NaiveDateTime::parse_from_str(text, format) {
            return Some(when.date());
        }
    }
    None
}

const ZIP_MAGIC: [u8; 2] = [0x50, 0x4B];
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Decode statement bytes into rows. Workbook formats are recognized by
/// their magic bytes; everything else is treated as CSV in the same layout.
pub fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    if bytes.starts_with(&ZIP_MAGIC) || bytes.starts_with(&OLE_MAGIC) {
        decode_sheet(bytes)
    } else {
        decode_csv(bytes)
    }
}

/// Read the first sheet of an xls/xlsx workbook, preserving absolute row
/// and column positions (calamine trims to the used range).
fn decode_sheet(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names = workbook.sheet_names();
    let first = names.first().cloned().ok_or(DecodeError::NoSheets)?;
    let range = workbook.worksheet_range(&first)?;

    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<RawRow> = vec![RawRow::new(); row_offset];
    for sheet_row in range.rows() {
        let mut row = vec![Cell::Empty; col_offset];
        row.extend(sheet_row.iter().map(Cell::from_sheet));
        rows.push(row);
    }
    Ok(rows)
}

fn decode_csv(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_decodes_positionally() {
        let bytes = b",,2024-01-05,,,,DR,50\n,,2024-01-01,,,,CR,100\n";
        let rows = decode_workbook(bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2], Cell::Text("2024-01-05".to_string()));
        assert_eq!(rows[0][6], Cell::Text("DR".to_string()));
        assert_eq!(rows[0][7], Cell::Text("50".to_string()));
        assert_eq!(rows[1][0], Cell::Empty);
    }

    #[test]
    fn test_ragged_csv_rows_are_kept() {
        let bytes = b"Account Statement\n,,2024-01-01,,,,CR,100\n";
        let rows = decode_workbook(bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 8);
    }

    #[test]
    fn test_empty_input_decodes_to_no_rows() {
        let rows = decode_workbook(b"").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_workbook_magic_with_garbage_body_fails() {
        let mut bytes = vec![0x50, 0x4B, 0x03, 0x04];
        bytes.extend_from_slice(b"this is not a real workbook");
        let err = decode_workbook(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Workbook(_)));
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(Cell::Number(50.0).as_number(), Some(50.0));
        assert_eq!(Cell::Text("30".to_string()).as_number(), Some(30.0));
        assert_eq!(Cell::Text(" 1,234.56 ".to_string()).as_number(), Some(1234.56));
        assert_eq!(Cell::Text("N/A".to_string()).as_number(), None);
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_date_coercion() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(Cell::Date(expected).as_date(), Some(expected));
        assert_eq!(Cell::Text("2024-01-05".to_string()).as_date(), Some(expected));
        assert_eq!(Cell::Text("05/01/2024".to_string()).as_date(), Some(expected));
        assert_eq!(Cell::Text("05 Jan 2024".to_string()).as_date(), Some(expected));
        assert_eq!(Cell::Text("N/A".to_string()).as_date(), None);
        assert_eq!(Cell::Empty.as_date(), None);
        assert_eq!(Cell::Number(45123.0).as_date(), None);
    }

    #[test]
    fn test_marker_text_rendering() {
        assert_eq!(Cell::Text(" dr ".to_string()).to_text(), " dr ");
        assert_eq!(Cell::Empty.to_text(), "");
        assert_eq!(Cell::Number(7.0).to_text(), "7");
    }
}
