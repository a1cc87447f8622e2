// 🏛️ Canonical Attributes - the GSTR-1 template columns
// Every output record carries exactly these 44 fields, in exactly this order.

use serde::{Deserialize, Serialize};

// ============================================================================
// ATTRIBUTE TYPES
// ============================================================================

/// How the finalizer treats a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    /// Free text or category code, passed through untouched
    Text,
    /// Monetary amount, rounded to 2 decimal places
    Money,
    /// Quantity of goods
    Quantity,
    /// Percentage (tax rate, diff percent)
    Rate,
    /// Whole number (document number, line item number)
    Integer,
}

impl AttributeType {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, AttributeType::Text)
    }
}

// ============================================================================
// CANONICAL FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    TaxPayerGstin,
    ReturnPeriod,
    GrossTurnover,
    GrossTurnoverAprJun2017,
    DocumentCategory,
    DocumentNumber,
    InvoiceType,
    InvoiceSubType,
    NatureOfSupply,
    ReverseCharge,
    ReasonCode,
    PreGstRegimeNote,
    Gstr2FilingStatus,
    CounterPartyGstin,
    EcomOperatorGstin,
    CounterPartyName,
    InvoiceNumber,
    InvoiceDate,
    LineItemNumber,
    GoodsServicesIdentifier,
    HsnSac,
    ItemDescription,
    Quantity,
    Unit,
    InvoiceValue,
    TaxableValue,
    TaxRate,
    IgstAmount,
    CgstAmount,
    SgstAmount,
    CessAmount,
    PlaceOfSupply,
    PortCode,
    ShippingBillNumber,
    ShippingBillDate,
    OriginalInvoiceNumber,
    OriginalInvoiceDate,
    AdvanceAmount,
    AdvanceReferenceNumber,
    ShipToCountry,
    PlantCode,
    GlCode,
    AdvanceAdjustment,
    DiffPercent,
}

pub const FIELD_COUNT: usize = 44;

/// AttributeDefinition - one template column
///
/// `name` is what input headers are matched against (trailing `*` stripped),
/// `header` is what the output file shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub field: CanonicalField,
    pub name: &'static str,
    pub header: &'static str,
    pub type_: AttributeType,
}

const fn def(
    field: CanonicalField,
    name: &'static str,
    header: &'static str,
    type_: AttributeType,
) -> AttributeDefinition {
    AttributeDefinition { field, name, header, type_ }
}

use AttributeType::{Integer, Money, Quantity as Qty, Rate, Text};
use CanonicalField as F;

/// Template columns in output order. Indexed by `CanonicalField as usize`.
pub const DEFINITIONS: [AttributeDefinition; FIELD_COUNT] = [
    def(F::TaxPayerGstin, "GSTIN of the Tax Payer", "GSTIN of the Tax Payer*", Text),
    def(F::ReturnPeriod, "Return Period", "Return Period*", Text),
    def(F::GrossTurnover, "Gross Turnover", "Gross Turnover", Money),
    def(
        F::GrossTurnoverAprJun2017,
        "Gross Turnover - April to June, 2017",
        "Gross Turnover - April to June, 2017",
        Money,
    ),
    def(F::DocumentCategory, "Document Category", "Document Category", Text),
    def(F::DocumentNumber, "Document Number", "Document Number*", Integer),
    def(F::InvoiceType, "Invoice Type", "Invoice Type*", Text),
    def(F::InvoiceSubType, "Invoice Sub_Type", "Invoice Sub_Type*", Text),
    def(F::NatureOfSupply, "Nature of Supply", "Nature of Supply*", Text),
    def(F::ReverseCharge, "Reverse Charge", "Reverse Charge*", Text),
    def(
        F::ReasonCode,
        "Reason Code for issuing Debit/Credit Note",
        "Reason Code for issuing Debit/Credit Note",
        Text,
    ),
    def(
        F::PreGstRegimeNote,
        "Pre GST Regime Dr./ Cr. Notes",
        "Pre GST Regime Dr./ Cr. Notes*",
        Text,
    ),
    def(
        F::Gstr2FilingStatus,
        "GSTR2 filing status of counter party",
        "GSTR2 filing status of counter party",
        Text,
    ),
    def(F::CounterPartyGstin, "Counter Party GSTIN/UID", "Counter Party GSTIN/UID*", Text),
    def(F::EcomOperatorGstin, "GSTIN Ecom Operator", "GSTIN Ecom Operator*", Text),
    def(F::CounterPartyName, "Counter Party Name", "Counter Party Name", Text),
    def(F::InvoiceNumber, "Invoice Number", "Invoice Number*", Text),
    def(F::InvoiceDate, "Invoice Date", "Invoice Date*", Text),
    def(F::LineItemNumber, "Line item Number", "Line item Number*", Integer),
    def(
        F::GoodsServicesIdentifier,
        "Identifier of Goods or Services",
        "Identifier of Goods or Services*",
        Text,
    ),
    def(
        F::HsnSac,
        "HSN or SAC of Goods or Services",
        "HSN or SAC of Goods or Services*",
        Text,
    ),
    def(F::ItemDescription, "Description of Item", "Description of Item", Text),
    def(F::Quantity, "Quantity of goods sold", "Quantity of goods sold*", Qty),
    def(
        F::Unit,
        "UQC (Unit of Measure) of goods sold",
        "UQC (Unit of Measure) of goods sold*",
        Text,
    ),
    def(F::InvoiceValue, "Invoice Value", "Invoice Value*", Money),
    def(
        F::TaxableValue,
        "Taxable value of Goods or Services",
        "Taxable value of Goods or Services*",
        Money,
    ),
    def(F::TaxRate, "Tax Rate", "Tax Rate*", Rate),
    def(F::IgstAmount, "IGST Amount", "IGST Amount*", Money),
    def(F::CgstAmount, "CGST Amount", "CGST Amount*", Money),
    def(F::SgstAmount, "SGST Amount", "SGST Amount*", Money),
    def(F::CessAmount, "CESS Amount", "CESS Amount*", Money),
    def(F::PlaceOfSupply, "Place of Supply", "Place of Supply*", Text),
    def(F::PortCode, "Port Code", "Port Code*", Text),
    def(
        F::ShippingBillNumber,
        "Shipping Bill or Bill of Export Number",
        "Shipping Bill or Bill of Export Number*",
        Text,
    ),
    def(
        F::ShippingBillDate,
        "Shipping Bill or Bill of Export Date",
        "Shipping Bill or Bill of Export Date*",
        Text,
    ),
    def(F::OriginalInvoiceNumber, "Original Invoice Number", "Original Invoice Number*", Text),
    def(F::OriginalInvoiceDate, "Original Invoice Date", "Original Invoice Date*", Text),
    def(
        F::AdvanceAmount,
        "Advance Amount Received /Adjusted",
        "Advance Amount Received /Adjusted*",
        Money,
    ),
    def(F::AdvanceReferenceNumber, "Advance Reference Number", "Advance Reference Number", Text),
    def(F::ShipToCountry, "Ship to Country", "Ship to Country", Text),
    def(F::PlantCode, "Plant code/BU code", "Plant code/BU code", Text),
    def(F::GlCode, "GL code", "GL code", Text),
    def(
        F::AdvanceAdjustment,
        "Adjustment of any Advance against this Invoice on which you have paid tax",
        "Adjustment of any Advance against this Invoice on which you have paid tax",
        Text,
    ),
    def(F::DiffPercent, "Diff Percent", "Diff Percent*", Rate),
];

impl CanonicalField {
    /// All fields in output order
    pub fn all() -> impl Iterator<Item = CanonicalField> {
        DEFINITIONS.iter().map(|d| d.field)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static AttributeDefinition {
        &DEFINITIONS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn header(self) -> &'static str {
        self.definition().header
    }

    pub fn attribute_type(self) -> AttributeType {
        self.definition().type_
    }

    /// Look up a field by its name or its output header (exact match).
    pub fn lookup(name_or_header: &str) -> Option<CanonicalField> {
        DEFINITIONS
            .iter()
            .find(|d| d.name == name_or_header || d.header == name_or_header)
            .map(|d| d.field)
    }
}

/// Output headers in canonical order
pub fn headers() -> Vec<&'static str> {
    DEFINITIONS.iter().map(|d| d.header).collect()
}

// ============================================================================
// TESTS
// ============================================================================
