//! Invoice draft validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use faktura_shared::validation::{ValidationErrors, invalid_date, min_zero, required};

use crate::dates::parse_date;
use crate::items::{LineItem, LineItemInput, validate_items};

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    /// Canonical string as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }

    /// Parses the canonical string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// How an invoice-level discount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    Flat,
    Percentage,
}

impl DiscountType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Percentage => "percentage",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "flat" => Some(Self::Flat),
            "percentage" => Some(Self::Percentage),
            _ => None,
        }
    }
}

/// Raw invoice payload as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoicePayload {
    pub customer_id: Option<i64>,
    pub payment_term_id: Option<i64>,
    pub invoice_no: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub discount_type: Option<String>,
    pub discount_amount: Option<Decimal>,
    pub discount_rate: Option<Decimal>,
    pub tax_total: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub status: Option<String>,
    pub bill_to: Option<String>,
    pub bill_from: Option<String>,
    pub ship_to: Option<String>,
    pub terms: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// A fully validated invoice ready for persistence.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub customer_id: i64,
    pub payment_term_id: Option<i64>,
    pub invoice_no: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub discount_type: Option<DiscountType>,
    pub discount_amount: Option<Decimal>,
    pub discount_rate: Option<Decimal>,
    pub tax_total: Option<Decimal>,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub bill_to: Option<String>,
    pub bill_from: Option<String>,
    pub ship_to: Option<String>,
    pub terms: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<LineItem>,
}

impl InvoicePayload {
    /// Validates the payload into a draft, reporting every failing field.
    ///
    /// Cross-organization checks on `customer_id`, `payment_term_id` and
    /// item products are database lookups and happen separately.
    ///
    /// # Errors
    ///
    /// Returns the accumulated per-field error map when any rule fails.
    pub fn validate(self) -> Result<InvoiceDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let customer_id = match self.customer_id {
            Some(id) => Some(id),
            None => {
                errors.add("customer_id", required("customer"));
                None
            }
        };

        let issue_date = checked_date(self.issue_date.as_deref(), "issue_date", "issue date", &mut errors);
        let due_date = checked_date(self.due_date.as_deref(), "due_date", "due date", &mut errors);
        if let (Some(issue), Some(due)) = (issue_date, due_date)
            && due < issue
        {
            errors.add(
                "due_date",
                "The due date must be a date after or equal to issue date.",
            );
        }

        let total_amount = match self.total_amount {
            None => {
                errors.add("total_amount", required("total amount"));
                None
            }
            Some(v) if v < Decimal::ZERO => {
                errors.add("total_amount", min_zero("total amount"));
                None
            }
            Some(v) => Some(v),
        };

        for (field, attribute, value) in [
            ("discount_amount", "discount amount", self.discount_amount),
            ("discount_rate", "discount rate", self.discount_rate),
            ("tax_total", "tax total", self.tax_total),
        ] {
            if let Some(v) = value
                && v < Decimal::ZERO
            {
                errors.add(field, min_zero(attribute));
            }
        }

        let discount_type = match self.discount_type.as_deref() {
            None => None,
            Some(raw) => match DiscountType::parse(raw) {
                Some(t) => Some(t),
                None => {
                    errors.add("discount_type", "The selected discount type is invalid.");
                    None
                }
            },
        };

        let status = match self.status.as_deref() {
            None => Some(InvoiceStatus::default()),
            Some(raw) => match InvoiceStatus::parse(raw) {
                Some(s) => Some(s),
                None => {
                    errors.add("status", "The selected status is invalid.");
                    None
                }
            },
        };

        let items = validate_items("items", &self.items, &mut errors);

        errors.into_result()?;

        // Every field that records an error above also leaves its slot None,
        // so these are present whenever the map is empty.
        match (customer_id, issue_date, due_date, total_amount, status) {
            (Some(customer_id), Some(issue_date), Some(due_date), Some(total_amount), Some(status)) => {
                Ok(InvoiceDraft {
                    customer_id,
                    payment_term_id: self.payment_term_id,
                    invoice_no: self.invoice_no,
                    issue_date,
                    due_date,
                    discount_type,
                    discount_amount: self.discount_amount,
                    discount_rate: self.discount_rate,
                    tax_total: self.tax_total,
                    total_amount,
                    status,
                    bill_to: self.bill_to,
                    bill_from: self.bill_from,
                    ship_to: self.ship_to,
                    terms: self.terms,
                    notes: self.notes,
                    items,
                })
            }
            _ => Err(ValidationErrors::new()),
        }
    }
}

/// Parses a required date field, recording missing or unparseable input.
fn checked_date(
    value: Option<&str>,
    field: &str,
    attribute: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    match value {
        None => {
            errors.add(field, required(attribute));
            None
        }
        Some(raw) => match parse_date(raw) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add(field, invalid_date(attribute));
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payload() -> InvoicePayload {
        InvoicePayload {
            customer_id: Some(7),
            issue_date: Some("2024-03-01".into()),
            due_date: Some("2024-03-15".into()),
            total_amount: Some(dec!(150.00)),
            items: vec![LineItemInput {
                product_id: Some(3),
                quantity: Some(dec!(2)),
                unit_price: Some(dec!(75)),
                line_total: Some(dec!(150)),
            }],
            ..InvoicePayload::default()
        }
    }

    #[test]
    fn test_valid_payload_produces_draft() {
        let draft = payload().validate().unwrap();
        assert_eq!(draft.customer_id, 7);
        assert_eq!(draft.status, InvoiceStatus::Draft);
        assert_eq!(draft.items.len(), 1);
    }

    #[test]
    fn test_due_date_before_issue_date_rejected() {
        let mut p = payload();
        p.due_date = Some("2024-02-01".into());
        let errors = p.validate().unwrap_err();
        assert_eq!(
            errors.get("due_date").unwrap()[0],
            "The due date must be a date after or equal to issue date."
        );
    }

    #[test]
    fn test_due_date_equal_to_issue_date_allowed() {
        let mut p = payload();
        p.due_date = Some("2024-03-01".into());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_dates_accept_flexible_formats() {
        let mut p = payload();
        p.issue_date = Some("01/03/2024".into());
        p.due_date = Some("March 15, 2024".into());
        let draft = p.validate().unwrap();
        assert_eq!(draft.issue_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_all_failures_reported_together() {
        let p = InvoicePayload {
            total_amount: Some(dec!(-1)),
            status: Some("void".into()),
            ..InvoicePayload::default()
        };
        let errors = p.validate().unwrap_err();
        assert!(errors.get("customer_id").is_some());
        assert!(errors.get("issue_date").is_some());
        assert!(errors.get("due_date").is_some());
        assert!(errors.get("total_amount").is_some());
        assert!(errors.get("status").is_some());
    }

    #[test]
    fn test_unparseable_date_reported_on_field() {
        let mut p = payload();
        p.issue_date = Some("someday".into());
        let errors = p.validate().unwrap_err();
        assert_eq!(errors.get("issue_date").unwrap()[0], "The issue date is not a valid date.");
    }

    #[test]
    fn test_status_round_trips() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Sent,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_empty_items_allowed() {
        let mut p = payload();
        p.items.clear();
        let draft = p.validate().unwrap();
        assert!(draft.items.is_empty());
    }
}
