// 🧾 Record Finalizer - numeric normalization, no business rules
// Numeric columns come out as numbers when parseable, blank when not.
// Null stays null and blank stays blank: they mean different things.

use crate::attributes::{AttributeType, CanonicalField};
use crate::record::{parse_decimal, CanonicalRecord, Cell};
use crate::report::{CoercionWarning, Stage};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on monetary columns
pub const MONEY_SCALE: u32 = 2;

fn normalize_number(value: Decimal, type_: AttributeType) -> Cell {
    match type_ {
        AttributeType::Money => Cell::Number(
            value
                .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
        ),
        AttributeType::Integer if value.fract().is_zero() => match value.to_i64() {
            Some(i) => Cell::Integer(i),
            None => Cell::Number(value.normalize()),
        },
        _ => Cell::Number(value.normalize()),
    }
}

pub struct RecordFinalizer;

impl RecordFinalizer {
    pub fn finalize(records: &mut [CanonicalRecord]) -> Vec<CoercionWarning> {
        let mut warnings = Vec::new();

        for record in records.iter_mut() {
            for field in CanonicalField::all() {
                let type_ = field.attribute_type();
                if !type_.is_numeric() {
                    continue;
                }
                if let Some(warning) = Self::finalize_cell(record, field, type_) {
                    warnings.push(warning);
                }
            }
        }

        warnings
    }

    fn finalize_cell(
        record: &mut CanonicalRecord,
        field: CanonicalField,
        type_: AttributeType,
    ) -> Option<CoercionWarning> {
        let (normalized, rejected) = match record.get(field) {
            Cell::Null | Cell::Blank | Cell::Integer(_) => return None,
            Cell::Number(d) => (normalize_number(*d, type_), None),
            Cell::Text(raw) => match parse_decimal(raw) {
                Some(d) => (normalize_number(d, type_), None),
                None if raw.trim().is_empty() => (Cell::Blank, None),
                None => (Cell::Blank, Some(raw.clone())),
            },
        };

        record.set(field, normalized);
        rejected.map(|raw| CoercionWarning::new(record, field, &raw, Stage::Finalization))
    }
}

// ============================================================================
// TESTS
// ============================================================================
