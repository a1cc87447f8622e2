// 🏷️ Classification Rules - ordered (predicate, effect) rules
// Derives invoice type, sub-type, nature of supply, goods/services identifier,
// place of supply and tax rate. Rules run in list order over the whole batch;
// a later rule may overwrite what an earlier one set.

use crate::attributes::CanonicalField;
use crate::config::ReturnPeriod;
use crate::record::{CanonicalRecord, Cell};
use indexmap::IndexMap;
use rust_decimal::Decimal;

pub const INVOICE_TYPE_EXPORT: &str = "EXP";
pub const INVOICE_TYPE_B2B: &str = "B2B";
pub const SUB_TYPE_WITHOUT_PAYMENT: &str = "WOPAY";
pub const SUB_TYPE_REGULAR: &str = "R";
pub const SUPPLY_INTER: &str = "Inter";
pub const SUPPLY_INTRA: &str = "Intra";
pub const IDENTIFIER_SERVICES: &str = "S";
pub const SERVICES_HSN_PREFIX: &str = "99";
pub const DEFAULT_REVERSE_CHARGE: &str = "N";
pub const DEFAULT_DOCUMENT_CATEGORY: &str = "01-Inv. for Outward Supply";
pub const DEFAULT_DOCUMENT_NUMBER: i64 = 1;
pub const DEFAULT_TAX_RATE: i64 = 18;

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// Per-run values rules may read.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub return_period: &'a ReturnPeriod,
}

/// FieldRule - match a record, mutate a record
pub trait FieldRule: Send + Sync {
    /// Stable id used in logs and summaries
    fn id(&self) -> &'static str;

    fn matches(&self, record: &CanonicalRecord, ctx: &RuleContext<'_>) -> bool;

    fn apply(&self, record: &mut CanonicalRecord, ctx: &RuleContext<'_>);
}

// ============================================================================
// SHARED PREDICATES
// ============================================================================

/// Counterparty GSTIN null, blank, or whitespace.
fn counterparty_missing(record: &CanonicalRecord) -> bool {
    record.get(CanonicalField::CounterPartyGstin).is_missing()
}

fn is_export(record: &CanonicalRecord) -> bool {
    record.text_eq(CanonicalField::InvoiceType, INVOICE_TYPE_EXPORT)
}

/// Export already, or about to become one through `NoCounterpartyExport`.
fn is_export_bound(record: &CanonicalRecord) -> bool {
    is_export(record) || counterparty_missing(record)
}

/// IGST present and not zero. Unparseable text counts as non-zero.
fn has_igst(record: &CanonicalRecord) -> bool {
    let igst = record.get(CanonicalField::IgstAmount);
    if igst.is_missing() {
        return false;
    }
    igst.to_decimal().map_or(true, |d| d != Decimal::ZERO)
}

/// First two characters, the jurisdiction (state) code of a GSTIN.
fn jurisdiction_code(record: &CanonicalRecord, field: CanonicalField) -> Option<String> {
    record
        .text(field)
        .map(|text| text.chars().take(2).collect())
}

// ============================================================================
// RULES
// ============================================================================

/// 1. Values every row gets regardless of content.
pub struct StaticDefaults;

impl FieldRule for StaticDefaults {
    fn id(&self) -> &'static str {
        "static_defaults"
    }

    fn matches(&self, _record: &CanonicalRecord, _ctx: &RuleContext<'_>) -> bool {
        true
    }

    fn apply(&self, record: &mut CanonicalRecord, ctx: &RuleContext<'_>) {
        record.set(CanonicalField::ReturnPeriod, Cell::text(ctx.return_period.as_str()));
        record.set(CanonicalField::ReverseCharge, Cell::text(DEFAULT_REVERSE_CHARGE));
        record.set(CanonicalField::DocumentCategory, Cell::text(DEFAULT_DOCUMENT_CATEGORY));
        record.set(CanonicalField::DocumentNumber, Cell::Integer(DEFAULT_DOCUMENT_NUMBER));
    }
}

/// 2. SAC codes start with "99": the line is a service.
pub struct ServiceIdentifier;

impl FieldRule for ServiceIdentifier {
    fn id(&self) -> &'static str {
        "service_identifier"
    }

    fn matches(&self, record: &CanonicalRecord, _ctx: &RuleContext<'_>) -> bool {
        record
            .text(CanonicalField::HsnSac)
            .is_some_and(|hsn| hsn.starts_with(SERVICES_HSN_PREFIX))
    }

    fn apply(&self, record: &mut CanonicalRecord, _ctx: &RuleContext<'_>) {
        record.set(CanonicalField::GoodsServicesIdentifier, Cell::text(IDENTIFIER_SERVICES));
    }
}

/// 3. Exported services carry no quantity or unit: clear both to blank.
///
/// "Exported" means export-bound: `Invoice Type` is already "EXP" (passed
/// through from input), or the counterparty GSTIN is missing so that
/// `NoCounterpartyExport` turns the record into EXP right after this rule.
/// An input "EXP" that `RegisteredInterState` later overrides to B2B still
/// loses its quantity and unit here.
pub struct ExportServiceQuantity;

impl FieldRule for ExportServiceQuantity {
    fn id(&self) -> &'static str {
        "export_service_quantity"
    }

    fn matches(&self, record: &CanonicalRecord, _ctx: &RuleContext<'_>) -> bool {
        record.text_eq(CanonicalField::GoodsServicesIdentifier, IDENTIFIER_SERVICES)
            && is_export_bound(record)
    }

    fn apply(&self, record: &mut CanonicalRecord, _ctx: &RuleContext<'_>) {
        record.set(CanonicalField::Quantity, Cell::Blank);
        record.set(CanonicalField::Unit, Cell::Blank);
    }
}

/// 4. No counterparty GSTIN: export without payment of tax.
pub struct NoCounterpartyExport;

impl FieldRule for NoCounterpartyExport {
    fn id(&self) -> &'static str {
        "no_counterparty_export"
    }

    fn matches(&self, record: &CanonicalRecord, _ctx: &RuleContext<'_>) -> bool {
        counterparty_missing(record)
    }

    fn apply(&self, record: &mut CanonicalRecord, _ctx: &RuleContext<'_>) {
        record.set(CanonicalField::InvoiceType, Cell::text(INVOICE_TYPE_EXPORT));
        record.set(CanonicalField::InvoiceSubType, Cell::text(SUB_TYPE_WITHOUT_PAYMENT));
        record.set(CanonicalField::NatureOfSupply, Cell::text(SUPPLY_INTER));
    }
}

/// 5. Registered counterparty charged IGST: regular B2B.
pub struct RegisteredInterState;

impl FieldRule for RegisteredInterState {
    fn id(&self) -> &'static str {
        "registered_inter_state"
    }

    fn matches(&self, record: &CanonicalRecord, _ctx: &RuleContext<'_>) -> bool {
        !counterparty_missing(record) && has_igst(record)
    }

    fn apply(&self, record: &mut CanonicalRecord, _ctx: &RuleContext<'_>) {
        record.set(CanonicalField::InvoiceType, Cell::text(INVOICE_TYPE_B2B));
        record.set(CanonicalField::InvoiceSubType, Cell::text(SUB_TYPE_REGULAR));
    }
}

/// 6. Same state code on both GSTINs → Intra, otherwise Inter.
pub struct SupplyNature;

impl FieldRule for SupplyNature {
    fn id(&self) -> &'static str {
        "supply_nature"
    }

    fn matches(&self, record: &CanonicalRecord, _ctx: &RuleContext<'_>) -> bool {
        !counterparty_missing(record)
    }

    fn apply(&self, record: &mut CanonicalRecord, _ctx: &RuleContext<'_>) {
        let own = jurisdiction_code(record, CanonicalField::TaxPayerGstin).unwrap_or_default();
        let other = jurisdiction_code(record, CanonicalField::CounterPartyGstin).unwrap_or_default();
        let nature = if own == other { SUPPLY_INTRA } else { SUPPLY_INTER };
        record.set(CanonicalField::NatureOfSupply, Cell::text(nature));
    }
}

/// 7. Domestic supplies: place of supply is the counterparty's state code.
pub struct PlaceOfSupply;

impl FieldRule for PlaceOfSupply {
    fn id(&self) -> &'static str {
        "place_of_supply"
    }

    fn matches(&self, record: &CanonicalRecord, _ctx: &RuleContext<'_>) -> bool {
        !is_export(record)
    }

    fn apply(&self, record: &mut CanonicalRecord, _ctx: &RuleContext<'_>) {
        let code = jurisdiction_code(record, CanonicalField::CounterPartyGstin)
            .map(Cell::Text)
            .unwrap_or(Cell::Null);
        record.set(CanonicalField::PlaceOfSupply, code);
    }
}

/// 8. Domestic supplies default to the 18% slab.
pub struct DefaultTaxRate;

impl FieldRule for DefaultTaxRate {
    fn id(&self) -> &'static str {
        "default_tax_rate"
    }

    fn matches(&self, record: &CanonicalRecord, _ctx: &RuleContext<'_>) -> bool {
        !is_export(record)
    }

    fn apply(&self, record: &mut CanonicalRecord, _ctx: &RuleContext<'_>) {
        record.set(CanonicalField::TaxRate, Cell::Integer(DEFAULT_TAX_RATE));
    }
}

// ============================================================================
// CLASSIFICATION SUMMARY
// ============================================================================

/// How many records each rule fired on, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationSummary {
    pub hits: IndexMap<&'static str, usize>,
}

impl ClassificationSummary {
    pub fn hits_for(&self, rule_id: &str) -> usize {
        self.hits.get(rule_id).copied().unwrap_or(0)
    }
}

// ============================================================================
// RULE ENGINE
// ============================================================================

pub struct RuleEngine {
    rules: Vec<Box<dyn FieldRule>>,
}

impl RuleEngine {
    /// Create a new empty rule engine
    pub fn new() -> Self {
        RuleEngine { rules: Vec::new() }
    }

    /// The GSTR-1 rule set, in precedence order.
    pub fn standard() -> Self {
        let rules: Vec<Box<dyn FieldRule>> = vec![
            Box::new(StaticDefaults),
            Box::new(ServiceIdentifier),
            Box::new(ExportServiceQuantity),
            Box::new(NoCounterpartyExport),
            Box::new(RegisteredInterState),
            Box::new(SupplyNature),
            Box::new(PlaceOfSupply),
            Box::new(DefaultTaxRate),
        ];
        RuleEngine::from_rules(rules)
    }

    /// Create engine from a list of rules (kept in the given order)
    pub fn from_rules(rules: Vec<Box<dyn FieldRule>>) -> Self {
        RuleEngine { rules }
    }

    /// Append a rule; it runs after every rule already present
    pub fn add_rule(&mut self, rule: Box<dyn FieldRule>) {
        self.rules.push(rule);
    }

    /// Run every rule, in order, over the whole batch.
    pub fn classify(
        &self,
        records: &mut [CanonicalRecord],
        ctx: &RuleContext<'_>,
    ) -> ClassificationSummary {
        let mut summary = ClassificationSummary::default();

        for rule in &self.rules {
            let mut hits = 0;
            for record in records.iter_mut() {
                if rule.matches(record, ctx) {
                    rule.apply(record, ctx);
                    hits += 1;
                }
            }
            tracing::debug!(rule = rule.id(), hits, "rule applied");
            *summary.hits.entry(rule.id()).or_insert(0) += hits;
        }

        summary
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// TESTS
// ============================================================================
