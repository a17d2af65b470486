//! Fill tables
//!
//! The unit of fill reconciliation is a row of `(symbol, side, qty)`. Internal
//! rows come typed from the order manager's journal; broker rows often arrive
//! as loosely typed JSON and are validated here before anything is compared.

use meridian_core::{Fill, InstrumentId, Quantity, Side};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::error::{ReconError, Result};

pub const COL_SYMBOL: &str = "symbol";
pub const COL_SIDE: &str = "side";
pub const COL_QTY: &str = "qty";

const REQUIRED_COLUMNS: [&str; 3] = [COL_SYMBOL, COL_SIDE, COL_QTY];

/// One fill row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillRecord {
    #[serde(rename = "symbol")]
    pub instrument_id: InstrumentId,
    pub side: Side,
    #[serde(rename = "qty")]
    pub quantity: Quantity,
}

impl FillRecord {
    pub fn new(instrument_id: impl Into<InstrumentId>, side: Side, quantity: Quantity) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            side,
            quantity,
        }
    }
}

impl From<&Fill> for FillRecord {
    fn from(fill: &Fill) -> Self {
        Self::new(fill.instrument_id.clone(), fill.side, fill.quantity)
    }
}

impl From<Fill> for FillRecord {
    fn from(fill: Fill) -> Self {
        Self::new(fill.instrument_id, fill.side, fill.quantity)
    }
}

/// Validated collection of fill rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FillTable {
    records: Vec<FillRecord>,
}

impl FillTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FillRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[FillRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total quantity per (instrument, side)
    pub fn aggregate(&self) -> BTreeMap<(InstrumentId, Side), Quantity> {
        let mut totals = BTreeMap::new();
        for record in &self.records {
            *totals
                .entry((record.instrument_id.clone(), record.side))
                .or_insert(Quantity::ZERO) += record.quantity;
        }
        totals
    }

    /// Parse a JSON array of row objects
    ///
    /// The column set is the union of keys over all rows, so an empty array
    /// has no columns and is rejected. `table` names the input in errors.
    pub fn from_json_str(table: &str, json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| ReconError::InvalidValue {
            table: table.to_string(),
            row: 0,
            column: "<document>".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_rows(table, &value)
    }

    /// Build from loosely typed rows, checking the schema before any row
    pub fn from_json_rows(table: &str, rows: &Value) -> Result<Self> {
        let not_a_table = || ReconError::NotATable {
            table: table.to_string(),
        };
        let rows = rows.as_array().ok_or_else(not_a_table)?;
        let objects: Vec<&Map<String, Value>> = rows
            .iter()
            .map(|row| row.as_object().ok_or_else(not_a_table))
            .collect::<Result<_>>()?;

        let present: BTreeSet<&str> = objects
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !present.contains(*col))
            .map(|col| col.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !missing.is_empty() {
            return Err(ReconError::MissingColumns {
                table: table.to_string(),
                columns: missing,
            });
        }

        objects
            .iter()
            .enumerate()
            .map(|(row, object)| parse_row(table, row, object))
            .collect()
    }
}

impl FromIterator<FillRecord> for FillTable {
    fn from_iter<I: IntoIterator<Item = FillRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<FillRecord>> for FillTable {
    fn from(records: Vec<FillRecord>) -> Self {
        Self { records }
    }
}

fn parse_row(table: &str, row: usize, object: &Map<String, Value>) -> Result<FillRecord> {
    let invalid = |column: &str, reason: String| ReconError::InvalidValue {
        table: table.to_string(),
        row,
        column: column.to_string(),
        reason,
    };

    let symbol = match object.get(COL_SYMBOL) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        other => return Err(invalid(COL_SYMBOL, format!("expected a symbol, got {}", describe(other)))),
    };

    let side = match object.get(COL_SIDE) {
        Some(Value::String(s)) => {
            Side::from_str(s).map_err(|e| invalid(COL_SIDE, e.to_string()))?
        }
        other => return Err(invalid(COL_SIDE, format!("expected buy or sell, got {}", describe(other)))),
    };

    let quantity = match object.get(COL_QTY) {
        Some(Value::Number(n)) => parse_number(&n.to_string())
            .ok_or_else(|| invalid(COL_QTY, format!("not representable as a decimal: {}", n)))?,
        other => return Err(invalid(COL_QTY, format!("expected a number, got {}", describe(other)))),
    };

    Ok(FillRecord::new(symbol, side, quantity))
}

fn parse_number(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => format!("bool {}", b),
        Some(Value::Number(n)) => format!("number {}", n),
        Some(Value::String(s)) => format!("string {:?}", s),
        Some(Value::Array(_)) => "array".to_string(),
        Some(Value::Object(_)) => "object".to_string(),
    }
}
