//! Transaction Extractor Module
//! Pure transformation from raw statement rows to a clean, date-ordered series.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::workbook::RawRow;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no valid transactions found")]
    EmptyResult,
}

/// Rows above this index are statement header/metadata, never data.
const HEADER_ROWS: usize = 10;
const DATE_COL: usize = 2;
const KIND_COL: usize = 6;
const AMOUNT_COL: usize = 7;
const DEBIT_MARKER: &str = "DR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnKind {
    Debit,
    Credit,
}

/// One statement line. The sign of `amount` encodes the direction; `kind`
/// is derived from it and carries no independent authority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub kind: TxnKind,
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        let kind = if amount < 0.0 {
            TxnKind::Debit
        } else {
            TxnKind::Credit
        };
        Self { date, kind, amount }
    }
}

/// Transactions from one import, non-decreasing by date. Built once and
/// owned by the chart it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSeries {
    txns: Vec<Transaction>,
}

impl TransactionSeries {
    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.txns.iter()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.txns
    }

    /// Sum of signed amounts.
    pub fn net(&self) -> f64 {
        self.txns.iter().map(|t| t.amount).sum()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.txns.first().map(|t| t.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.txns.last().map(|t| t.date)
    }
}

/// Extract transactions from decoded statement rows.
///
/// The first ten rows are always skipped. A row is dropped silently when its
/// date cell is missing or unparseable, or its amount is missing or
/// non-finite. `"DR"` in the marker column (after trim and uppercase)
/// negates the amount; anything else leaves it positive. Errs when nothing
/// survives the filter.
pub fn extract(rows: &[RawRow]) -> Result<TransactionSeries, ExtractError> {
    let candidates = rows.len().saturating_sub(HEADER_ROWS);
    let mut txns: Vec<Transaction> = rows
        .iter()
        .skip(HEADER_ROWS)
        .filter_map(parse_row)
        .collect();

    let rejected = candidates - txns.len();
    if rejected > 0 {
        debug!("dropped {rejected} of {candidates} statement rows");
    }

    if txns.is_empty() {
        return Err(ExtractError::EmptyResult);
    }

    txns.sort_by_key(|t| t.date);
    Ok(TransactionSeries { txns })
}

fn parse_row(row: &RawRow) -> Option<Transaction> {
    let date = row.get(DATE_COL)?.as_date()?;
    let raw = row.get(AMOUNT_COL)?.as_number()?;
    let marker = row
        .get(KIND_COL)
        .map(|cell| cell.to_text())
        .unwrap_or_default();

    let amount = if marker.trim().to_uppercase() == DEBIT_MARKER {
        -raw
    } else {
        raw
    };
    Some(Transaction::new(date, amount))
}
