// 📋 Dropdown Lists - allowed values for the enumerated template columns
// Independent of data. Written next to the output as a JSON sidecar so a
// spreadsheet tool can attach list validation to these columns.

use crate::attributes::CanonicalField;
use indexmap::IndexMap;
use serde::Serialize;

const DOCUMENT_CATEGORIES: [&str; 12] = [
    "01-Inv.outward supply",
    "02-Inv.for inward supply from unregistered person",
    "03-Revised Income",
    "04-DN",
    "05-CN",
    "06-Receipt Voucher",
    "07-Payment Voucher",
    "08-Refund Voucher",
    "09-job work",
    "10-supply on approval",
    "11-liquid gas",
    "12-other than by way of supply",
];

const INVOICE_TYPES: [&str; 4] = ["B2B", "B2C", "EXP", "B2CS"];

const INVOICE_SUB_TYPES: [&str; 11] = [
    "R", "DE", "SEWOP", "SEWP", "NR", "EXMPT", "NGST", "E", "OE", "WPAY", "WOPAY",
];

const SUPPLY_NATURES: [&str; 2] = ["Inter", "Intra"];
const YES_NO: [&str; 2] = ["Y", "N"];
const GOODS_OR_SERVICES: [&str; 2] = ["G", "S"];

const DOCUMENT_NUMBER_MAX: u32 = 12;
const STATE_CODE_MAX: u32 = 37;

/// One enumerated column and its allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownList {
    pub field: &'static str,
    pub header: &'static str,
    pub options: Vec<String>,
}

impl DropdownList {
    fn new<S: ToString>(field: CanonicalField, options: impl IntoIterator<Item = S>) -> Self {
        DropdownList {
            field: field.name(),
            header: field.header(),
            options: options.into_iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// Every dropdown, in output column order.
pub fn standard_dropdowns() -> Vec<DropdownList> {
    vec![
        DropdownList::new(CanonicalField::DocumentCategory, DOCUMENT_CATEGORIES),
        DropdownList::new(CanonicalField::DocumentNumber, 1..=DOCUMENT_NUMBER_MAX),
        DropdownList::new(CanonicalField::InvoiceType, INVOICE_TYPES),
        DropdownList::new(CanonicalField::InvoiceSubType, INVOICE_SUB_TYPES),
        DropdownList::new(CanonicalField::NatureOfSupply, SUPPLY_NATURES),
        DropdownList::new(CanonicalField::ReverseCharge, YES_NO),
        DropdownList::new(CanonicalField::GoodsServicesIdentifier, GOODS_OR_SERVICES),
        DropdownList::new(CanonicalField::PlaceOfSupply, 1..=STATE_CODE_MAX),
    ]
}

/// Sidecar shape: output header → allowed values.
pub fn dropdowns_by_header() -> IndexMap<&'static str, Vec<String>> {
    standard_dropdowns()
        .into_iter()
        .map(|list| (list.header, list.options))
        .collect()
}

/// The dropdown for a field, if the field is enumerated.
pub fn dropdown_for(field: CanonicalField) -> Option<DropdownList> {
    standard_dropdowns()
        .into_iter()
        .find(|list| list.field == field.name())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_dropdowns_in_column_order() {
        let lists = standard_dropdowns();
        assert_eq!(lists.len(), 8);

        let positions: Vec<usize> = lists
            .iter()
            .map(|l| CanonicalField::lookup(l.field).unwrap().index())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_numeric_ranges() {
        let doc = dropdown_for(CanonicalField::DocumentNumber).unwrap();
        assert_eq!(doc.options.len(), 12);
        assert_eq!(doc.options.first().map(String::as_str), Some("1"));
        assert_eq!(doc.options.last().map(String::as_str), Some("12"));

        let pos = dropdown_for(CanonicalField::PlaceOfSupply).unwrap();
        assert_eq!(pos.options.len(), 37);
        assert!(pos.contains("37"));
        assert!(!pos.contains("38"));
    }

    #[test]
    fn test_rule_outputs_are_listed() {
        let types = dropdown_for(CanonicalField::InvoiceType).unwrap();
        assert!(types.contains("EXP"));
        assert!(types.contains("B2B"));

        let sub_types = dropdown_for(CanonicalField::InvoiceSubType).unwrap();
        assert!(sub_types.contains("WOPAY"));
        assert!(sub_types.contains("R"));

        let nature = dropdown_for(CanonicalField::NatureOfSupply).unwrap();
        assert_eq!(nature.options, vec!["Inter", "Intra"]);
    }

    #[test]
    fn test_non_enumerated_field() {
        assert_eq!(dropdown_for(CanonicalField::InvoiceValue), None);
    }

    #[test]
    fn test_sidecar_keyed_by_header() {
        let sidecar = dropdowns_by_header();
        let keys: Vec<&str> = sidecar.keys().copied().collect();
        assert_eq!(keys[0], "Document Category");
        assert_eq!(keys[1], "Document Number*");
        assert_eq!(sidecar["Reverse Charge*"], vec!["Y", "N"]);

        let json = serde_json::to_value(&sidecar).unwrap();
        assert_eq!(json["Identifier of Goods or Services*"], serde_json::json!(["G", "S"]));
    }
}
