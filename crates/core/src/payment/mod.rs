//! Payment draft validation and allocation settlement.

pub mod settlement;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use faktura_shared::validation::{ValidationErrors, invalid_date, min_zero, required};

use crate::dates::parse_date;
use settlement::AllocationRow;

/// How a payment was made. The method determines which reference fields
/// are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    Cash,
    Bank,
    EWallet,
}

impl PaymentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::EWallet => "e-wallet",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(Self::Cash),
            "bank" => Some(Self::Bank),
            "e-wallet" => Some(Self::EWallet),
            _ => None,
        }
    }
}

/// One submitted invoice allocation.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationInput {
    pub invoice_id: Option<i64>,
    pub line_total: Option<Decimal>,
    pub notes: Option<String>,
}

/// Raw payment payload as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentPayload {
    pub customer_id: Option<i64>,
    pub bank_id: Option<i64>,
    pub e_wallet_id: Option<i64>,
    pub payment_no: Option<String>,
    pub payment_type: Option<String>,
    pub payment_type_reference_no: Option<String>,
    pub payment_type_reference_date: Option<String>,
    pub payment_date: Option<String>,
    pub total_amount: Option<Decimal>,
    pub notes: Option<String>,
    #[serde(default)]
    pub invoices: Vec<AllocationInput>,
}

/// A fully validated payment ready for persistence.
///
/// The method id that does not match `payment_type` is dropped, so at most
/// one of `bank_id` / `e_wallet_id` is set and only for the matching type.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub customer_id: i64,
    pub payment_no: Option<String>,
    pub payment_date: NaiveDate,
    pub payment_type: PaymentType,
    pub bank_id: Option<i64>,
    pub e_wallet_id: Option<i64>,
    pub reference_no: Option<String>,
    pub reference_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub allocations: Vec<AllocationRow>,
}

impl PaymentPayload {
    /// Validates the payload into a draft, reporting every failing field.
    ///
    /// Cross-organization checks on the customer, method, and allocated
    /// invoices are database lookups and happen separately.
    ///
    /// # Errors
    ///
    /// Returns the accumulated per-field error map when any rule fails.
    pub fn validate(self) -> Result<PaymentDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let customer_id = match self.customer_id {
            Some(id) => Some(id),
            None => {
                errors.add("customer_id", required("customer"));
                None
            }
        };

        let payment_type = match self.payment_type.as_deref() {
            None => {
                errors.add("payment_type", required("payment type"));
                None
            }
            Some(raw) => match PaymentType::parse(raw) {
                Some(t) => Some(t),
                None => {
                    errors.add("payment_type", "The selected payment type is invalid.");
                    None
                }
            },
        };

        let mut bank_id = None;
        let mut e_wallet_id = None;
        let mut reference_no = None;
        let mut reference_date = None;
        match payment_type {
            Some(PaymentType::Bank) => {
                bank_id = self.bank_id;
                if bank_id.is_none() {
                    errors.add("bank_id", "The bank field is required when payment type is bank.");
                }
            }
            Some(PaymentType::EWallet) => {
                e_wallet_id = self.e_wallet_id;
                if e_wallet_id.is_none() {
                    errors.add(
                        "e_wallet_id",
                        "The e-wallet field is required when payment type is e-wallet.",
                    );
                }
            }
            Some(PaymentType::Cash) | None => {}
        }

        if matches!(payment_type, Some(PaymentType::Bank | PaymentType::EWallet)) {
            reference_no = self.payment_type_reference_no.clone();
            if reference_no.is_none() {
                errors.add(
                    "payment_type_reference_no",
                    "The payment type reference no field is required when payment type is not cash.",
                );
            }
            match self.payment_type_reference_date.as_deref() {
                None => {
                    errors.add(
                        "payment_type_reference_date",
                        "The payment type reference date field is required when payment type is not cash.",
                    );
                }
                Some(raw) => match parse_date(raw) {
                    Ok(date) => reference_date = Some(date),
                    Err(_) => {
                        errors.add(
                            "payment_type_reference_date",
                            invalid_date("payment type reference date"),
                        );
                    }
                },
            }
        }

        let payment_date = match self.payment_date.as_deref() {
            None => {
                errors.add("payment_date", required("payment date"));
                None
            }
            Some(raw) => match parse_date(raw) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("payment_date", invalid_date("payment date"));
                    None
                }
            },
        };

        if let Some(total) = self.total_amount
            && total < Decimal::ZERO
        {
            errors.add("total_amount", min_zero("total amount"));
        }

        let mut allocations = Vec::with_capacity(self.invoices.len());
        for (index, allocation) in self.invoices.iter().enumerate() {
            let invoice_id = match allocation.invoice_id {
                Some(id) => Some(id),
                None => {
                    errors.add_indexed("invoices", index, "invoice_id", required("invoice id"));
                    None
                }
            };
            let line_total = match allocation.line_total {
                None => {
                    errors.add_indexed("invoices", index, "line_total", required("line total paid"));
                    None
                }
                Some(v) if v < Decimal::ZERO => {
                    errors.add_indexed("invoices", index, "line_total", min_zero("line total paid"));
                    None
                }
                Some(v) => Some(v),
            };
            if let (Some(invoice_id), Some(line_total)) = (invoice_id, line_total) {
                allocations.push(AllocationRow {
                    invoice_id,
                    line_total,
                    notes: allocation.notes.clone(),
                });
            }
        }

        errors.into_result()?;

        match (customer_id, payment_type, payment_date) {
            (Some(customer_id), Some(payment_type), Some(payment_date)) => Ok(PaymentDraft {
                customer_id,
                payment_no: self.payment_no,
                payment_date,
                payment_type,
                bank_id,
                e_wallet_id,
                reference_no,
                reference_date,
                total_amount: self.total_amount,
                notes: self.notes,
                allocations,
            }),
            _ => Err(ValidationErrors::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cash_payload() -> PaymentPayload {
        PaymentPayload {
            customer_id: Some(2),
            payment_type: Some("cash".into()),
            payment_date: Some("2024-05-20".into()),
            total_amount: Some(dec!(100)),
            invoices: vec![AllocationInput {
                invoice_id: Some(9),
                line_total: Some(dec!(100)),
                notes: None,
            }],
            ..PaymentPayload::default()
        }
    }

    #[test]
    fn test_cash_payment_needs_no_reference() {
        let draft = cash_payload().validate().unwrap();
        assert_eq!(draft.payment_type, PaymentType::Cash);
        assert!(draft.bank_id.is_none());
        assert!(draft.reference_no.is_none());
        assert_eq!(draft.allocations.len(), 1);
    }

    #[test]
    fn test_bank_payment_requires_bank_and_reference() {
        let mut p = cash_payload();
        p.payment_type = Some("bank".into());
        let errors = p.validate().unwrap_err();
        assert!(errors.get("bank_id").is_some());
        assert!(errors.get("payment_type_reference_no").is_some());
        assert!(errors.get("payment_type_reference_date").is_some());
    }

    #[test]
    fn test_bank_payment_complete_passes() {
        let mut p = cash_payload();
        p.payment_type = Some("bank".into());
        p.bank_id = Some(5);
        p.payment_type_reference_no = Some("TRX-991".into());
        p.payment_type_reference_date = Some("20/05/2024".into());
        let draft = p.validate().unwrap();
        assert_eq!(draft.bank_id, Some(5));
        assert_eq!(
            draft.reference_date,
            Some(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
        );
    }

    #[test]
    fn test_e_wallet_payment_requires_wallet() {
        let mut p = cash_payload();
        p.payment_type = Some("e-wallet".into());
        p.payment_type_reference_no = Some("EW-1".into());
        p.payment_type_reference_date = Some("2024-05-20".into());
        let errors = p.validate().unwrap_err();
        assert!(errors.get("e_wallet_id").is_some());
    }

    #[test]
    fn test_mismatched_method_id_dropped() {
        let mut p = cash_payload();
        p.bank_id = Some(5);
        p.e_wallet_id = Some(6);
        let draft = p.validate().unwrap();
        assert!(draft.bank_id.is_none());
        assert!(draft.e_wallet_id.is_none());
    }

    #[test]
    fn test_unknown_payment_type_rejected() {
        let mut p = cash_payload();
        p.payment_type = Some("cheque".into());
        let errors = p.validate().unwrap_err();
        assert_eq!(
            errors.get("payment_type").unwrap()[0],
            "The selected payment type is invalid."
        );
    }

    #[test]
    fn test_negative_allocation_rejected() {
        let mut p = cash_payload();
        p.invoices[0].line_total = Some(dec!(-50));
        let errors = p.validate().unwrap_err();
        assert!(errors.get("invoices.0.line_total").is_some());
    }

    #[test]
    fn test_empty_allocations_allowed() {
        let mut p = cash_payload();
        p.invoices.clear();
        assert!(p.validate().unwrap().allocations.is_empty());
    }
}
