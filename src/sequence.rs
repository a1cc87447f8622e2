// 🔢 Line Sequencer - 1..N line numbers per invoice, in row order

use crate::attributes::CanonicalField;
use crate::record::{CanonicalRecord, Cell};
use std::collections::HashMap;

pub struct LineSequencer;

impl LineSequencer {
    /// Number the lines of each invoice group 1, 2, 3, … in the order the
    /// records appear. Records with a null invoice number are numbered as
    /// one more group.
    pub fn assign(records: &mut [CanonicalRecord]) {
        let mut counters: HashMap<Option<String>, i64> = HashMap::new();

        for record in records.iter_mut() {
            let counter = counters.entry(record.invoice_key()).or_insert(0);
            *counter += 1;
            record.set(CanonicalField::LineItemNumber, Cell::Integer(*counter));
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
