//! Data module - workbook decoding and transaction extraction

mod extractor;
mod workbook;

pub use extractor::{extract, ExtractError, Transaction, TransactionSeries, TxnKind};
pub use workbook::{decode_workbook, Cell, DecodeError, RawRow};
