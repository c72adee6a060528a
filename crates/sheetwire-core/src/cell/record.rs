//! Cached state of a single fetched cell

use serde_json::Value;

use super::{CellAddress, CellInput, CellValue, FormulaError, PendingValue};
use crate::api::{CellData, ExtendedValue};
use crate::error::{Error, Result};

/// One cell of a worksheet grid: committed server state plus an optional local edit
///
/// The committed half is whatever the service last reported. The pending half is
/// set only through [`set_value`](Self::set_value) / [`set_formula`](Self::set_formula)
/// and is cleared when the edit is saved or discarded. While an edit is pending the
/// effective value is unknown, so [`value`](Self::value) refuses to answer.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    address: CellAddress,
    data: CellData,
    error: Option<FormulaError>,
    pending: Option<PendingValue>,
}

impl CellRecord {
    /// Create a record from fetched cell data
    pub fn new(address: CellAddress, data: CellData) -> Self {
        let mut record = Self {
            address,
            data: CellData::default(),
            error: None,
            pending: None,
        };
        record.update_raw_data(data);
        record
    }

    /// Replace the committed state, keeping any pending edit
    pub(crate) fn update_raw_data(&mut self, data: CellData) {
        self.error = match &data.effective_value {
            Some(ExtendedValue::ErrorValue(e)) => Some(FormulaError::from(e)),
            _ => None,
        };
        self.data = data;
    }

    // === Position ===

    /// The cell's coordinate
    pub fn address(&self) -> CellAddress {
        self.address
    }

    /// Row index (0-based)
    pub fn row(&self) -> u32 {
        self.address.row
    }

    /// Column index (0-based)
    pub fn col(&self) -> u32 {
        self.address.col
    }

    /// Column letters ("B")
    pub fn a1_column(&self) -> String {
        self.address.a1_column()
    }

    /// Row number (1-based)
    pub fn a1_row(&self) -> u64 {
        self.address.a1_row()
    }

    /// A1 address ("B7")
    pub fn a1_address(&self) -> String {
        self.address.to_a1_string()
    }

    // === Committed state ===

    /// The effective value
    ///
    /// Returns the formula error if the last evaluation failed, and
    /// [`CellValue::Empty`] when the cell has no value.
    pub fn value(&self) -> Result<CellValue> {
        if self.is_dirty() {
            return Err(Error::UnsavedChangesPending(self.a1_address()));
        }
        if let Some(error) = &self.error {
            return Ok(CellValue::Error(error.clone()));
        }
        Ok(self
            .data
            .effective_value
            .as_ref()
            .map(CellValue::from)
            .unwrap_or_default())
    }

    /// Formula text, if the cell holds a formula
    pub fn formula(&self) -> Option<&str> {
        match &self.data.user_entered_value {
            Some(ExtendedValue::FormulaValue(f)) if !f.is_empty() => Some(f),
            _ => None,
        }
    }

    /// Error from the last formula evaluation
    pub fn formula_error(&self) -> Option<&FormulaError> {
        self.error.as_ref()
    }

    /// Display string as rendered by the service
    pub fn formatted_value(&self) -> Option<&str> {
        self.data
            .formatted_value
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    /// Text format of the user-entered format
    pub fn format(&self) -> Option<&Value> {
        self.data
            .user_entered_format
            .as_ref()
            .and_then(|f| f.get("textFormat"))
    }

    /// Raw committed data
    pub fn raw_data(&self) -> &CellData {
        &self.data
    }

    // === Local edits ===

    /// Whether a local edit is waiting to be saved
    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending edit, if any
    pub fn pending(&self) -> Option<&PendingValue> {
        self.pending.as_ref()
    }

    /// Stage a new value
    ///
    /// Booleans, finite numbers and strings are accepted; strings starting with `=`
    /// are formulas and an empty input clears the cell. Non-finite numbers are
    /// rejected with [`Error::InvalidValueType`] and leave the record unchanged.
    pub fn set_value<V: Into<CellInput>>(&mut self, value: V) -> Result<()> {
        let pending = value.into().into_pending()?;
        self.pending = Some(pending);
        Ok(())
    }

    /// Stage a formula; it must start with `=`
    pub fn set_formula(&mut self, formula: &str) -> Result<()> {
        if !formula.starts_with('=') {
            return Err(Error::InvalidFormula(format!(
                "formula must begin with \"=\", got {:?}",
                formula
            )));
        }
        self.pending = Some(PendingValue::Formula(formula.to_string()));
        Ok(())
    }

    /// Stage a clear of the cell
    pub fn clear_value(&mut self) {
        self.pending = Some(PendingValue::String(String::new()));
    }

    /// Drop the pending edit, returning it
    pub fn discard_pending(&mut self) -> Option<PendingValue> {
        self.pending.take()
    }

    /// Promote the pending edit into committed state after a successful save
    ///
    /// Formula results are unknown until the service sends them, so a committed
    /// formula has no effective value until the next fill.
    pub fn commit_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        self.error = None;
        self.data.formatted_value = None;
        if pending.is_clear() {
            self.data.user_entered_value = None;
            self.data.effective_value = None;
            return;
        }

        let value = pending.to_extended();
        self.data.effective_value = match pending {
            PendingValue::Formula(_) => None,
            _ => Some(value.clone()),
        };
        self.data.user_entered_value = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorValue;
    use crate::cell::ValueKind;

    fn record_with(effective: ExtendedValue) -> CellRecord {
        CellRecord::new(
            CellAddress::new(6, 1),
            CellData {
                user_entered_value: Some(effective.clone()),
                effective_value: Some(effective),
                formatted_value: Some("x".into()),
                ..CellData::default()
            },
        )
    }

    #[test]
    fn test_committed_value() {
        let record = record_with(ExtendedValue::NumberValue(42.0));
        assert_eq!(record.value().unwrap(), CellValue::Number(42.0));
        assert_eq!(record.a1_address(), "B7");
        assert!(!record.is_dirty());

        let empty = CellRecord::new(CellAddress::new(0, 0), CellData::default());
        assert_eq!(empty.value().unwrap(), CellValue::Empty);
        assert_eq!(empty.formatted_value(), None);
    }

    #[test]
    fn test_dirty_read_is_an_error() {
        let mut record = record_with(ExtendedValue::StringValue("old".into()));
        record.set_value("new").unwrap();
        assert!(record.is_dirty());
        assert!(matches!(
            record.value(),
            Err(Error::UnsavedChangesPending(addr)) if addr == "B7"
        ));

        record.commit_pending();
        assert!(!record.is_dirty());
        assert_eq!(record.value().unwrap(), CellValue::String("new".into()));
    }

    #[test]
    fn test_discard_restores_committed_value() {
        let mut record = record_with(ExtendedValue::BoolValue(true));
        record.set_value(false).unwrap();
        assert_eq!(record.discard_pending(), Some(PendingValue::Boolean(false)));
        assert_eq!(record.value().unwrap(), CellValue::Boolean(true));
    }

    #[test]
    fn test_set_value_null_and_nan() {
        let mut record = record_with(ExtendedValue::NumberValue(1.0));
        record.set_value(None::<&str>).unwrap();
        let pending = record.pending().unwrap();
        assert_eq!(pending.kind(), ValueKind::String);
        assert_eq!(pending, &PendingValue::String(String::new()));

        let mut clean = record_with(ExtendedValue::NumberValue(1.0));
        assert!(matches!(
            clean.set_value(f64::NAN),
            Err(Error::InvalidValueType(_))
        ));
        assert!(!clean.is_dirty());
    }

    #[test]
    fn test_set_formula() {
        let mut record = record_with(ExtendedValue::NumberValue(1.0));
        assert!(matches!(
            record.set_formula("SUM(A1:A2)"),
            Err(Error::InvalidFormula(_))
        ));
        assert!(!record.is_dirty());

        record.set_formula("=SUM(A1:A2)").unwrap();
        assert_eq!(record.pending().unwrap().kind(), ValueKind::Formula);

        record.commit_pending();
        assert_eq!(record.formula(), Some("=SUM(A1:A2)"));
        assert_eq!(record.value().unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_commit_clear() {
        let mut record = record_with(ExtendedValue::StringValue("bye".into()));
        record.clear_value();
        record.commit_pending();
        assert_eq!(record.value().unwrap(), CellValue::Empty);
        assert_eq!(record.raw_data().user_entered_value, None);
    }

    #[test]
    fn test_formula_error() {
        let record = CellRecord::new(
            CellAddress::new(0, 0),
            CellData {
                user_entered_value: Some(ExtendedValue::FormulaValue("=1/0".into())),
                effective_value: Some(ExtendedValue::ErrorValue(ErrorValue {
                    error_type: "DIVIDE_BY_ZERO".into(),
                    message: "Function DIVIDE parameter 2 cannot be zero.".into(),
                })),
                ..CellData::default()
            },
        );
        assert_eq!(record.formula(), Some("=1/0"));
        assert_eq!(record.formula_error().unwrap().error_type, "DIVIDE_BY_ZERO");
        assert!(record.value().unwrap().is_error());
    }

    #[test]
    fn test_fill_keeps_pending_edit() {
        let mut record = record_with(ExtendedValue::NumberValue(1.0));
        record.set_value(2).unwrap();
        record.update_raw_data(CellData::entered(ExtendedValue::NumberValue(5.0)));
        assert_eq!(record.pending(), Some(&PendingValue::Number(2.0)));
        assert_eq!(
            record.raw_data().user_entered_value,
            Some(ExtendedValue::NumberValue(5.0))
        );
    }
}
