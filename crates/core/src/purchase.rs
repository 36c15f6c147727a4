//! Purchase draft validation.
//!
//! Purchases mirror invoices on the supplier side: a header plus line
//! items, with a simpler two-state lifecycle.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use faktura_shared::validation::{ValidationErrors, invalid_date, min_zero, required};

use crate::dates::parse_date;
use crate::items::{LineItem, LineItemInput, validate_items};

/// Lifecycle status of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurchaseStatus {
    #[default]
    Draft,
    Finalized,
}

impl PurchaseStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "finalized" => Some(Self::Finalized),
            _ => None,
        }
    }
}

/// Raw purchase payload as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchasePayload {
    pub supplier_id: Option<i64>,
    pub payment_term_id: Option<i64>,
    pub purchase_no: Option<String>,
    pub purchase_date: Option<String>,
    pub total_amount: Option<Decimal>,
    pub status: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// A fully validated purchase ready for persistence.
#[derive(Debug, Clone)]
pub struct PurchaseDraft {
    pub supplier_id: i64,
    pub payment_term_id: Option<i64>,
    pub purchase_no: Option<String>,
    pub purchase_date: NaiveDate,
    pub total_amount: Decimal,
    pub status: PurchaseStatus,
    pub notes: Option<String>,
    pub items: Vec<LineItem>,
}

impl PurchasePayload {
    /// Validates the payload into a draft, reporting every failing field.
    ///
    /// # Errors
    ///
    /// Returns the accumulated per-field error map when any rule fails.
    pub fn validate(self) -> Result<PurchaseDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let supplier_id = match self.supplier_id {
            Some(id) => Some(id),
            None => {
                errors.add("supplier_id", required("supplier"));
                None
            }
        };

        let purchase_date = match self.purchase_date.as_deref() {
            None => {
                errors.add("purchase_date", required("purchase date"));
                None
            }
            Some(raw) => match parse_date(raw) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("purchase_date", invalid_date("purchase date"));
                    None
                }
            },
        };

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

        let status = match self.status.as_deref() {
            None => Some(PurchaseStatus::default()),
            Some(raw) => match PurchaseStatus::parse(raw) {
                Some(s) => Some(s),
                None => {
                    errors.add("status", "The selected status is invalid.");
                    None
                }
            },
        };

        let items = validate_items("items", &self.items, &mut errors);

        errors.into_result()?;

        match (supplier_id, purchase_date, total_amount, status) {
            (Some(supplier_id), Some(purchase_date), Some(total_amount), Some(status)) => {
                Ok(PurchaseDraft {
                    supplier_id,
                    payment_term_id: self.payment_term_id,
                    purchase_no: self.purchase_no,
                    purchase_date,
                    total_amount,
                    status,
                    notes: self.notes,
                    items,
                })
            }
            _ => Err(ValidationErrors::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payload() -> PurchasePayload {
        PurchasePayload {
            supplier_id: Some(4),
            purchase_date: Some("2024-06-10".into()),
            total_amount: Some(dec!(99.90)),
            items: vec![LineItemInput {
                product_id: Some(11),
                quantity: Some(dec!(3)),
                unit_price: Some(dec!(33.30)),
                line_total: Some(dec!(99.90)),
            }],
            ..PurchasePayload::default()
        }
    }

    #[test]
    fn test_valid_payload_produces_draft() {
        let draft = payload().validate().unwrap();
        assert_eq!(draft.supplier_id, 4);
        assert_eq!(draft.status, PurchaseStatus::Draft);
        assert_eq!(draft.items.len(), 1);
    }

    #[test]
    fn test_missing_header_fields_reported() {
        let errors = PurchasePayload::default().validate().unwrap_err();
        assert!(errors.get("supplier_id").is_some());
        assert!(errors.get("purchase_date").is_some());
        assert!(errors.get("total_amount").is_some());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut p = payload();
        p.status = Some("pending".into());
        let errors = p.validate().unwrap_err();
        assert_eq!(errors.get("status").unwrap()[0], "The selected status is invalid.");
    }

    #[test]
    fn test_finalized_status_accepted() {
        let mut p = payload();
        p.status = Some("finalized".into());
        assert_eq!(p.validate().unwrap().status, PurchaseStatus::Finalized);
    }

    #[test]
    fn test_item_errors_use_purchase_prefix() {
        let mut p = payload();
        p.items[0].quantity = Some(dec!(-2));
        let errors = p.validate().unwrap_err();
        assert!(errors.get("items.0.quantity").is_some());
    }
}
