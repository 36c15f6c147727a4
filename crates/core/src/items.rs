//! Line-item rules shared by invoices and purchases.

use rust_decimal::Decimal;
use serde::Deserialize;

use faktura_shared::validation::{ValidationErrors, min_zero, required};

/// A submitted line item, before validation.
///
/// All fields are optional at the wire level so missing and invalid values
/// can be reported per field instead of failing deserialization wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemInput {
    /// Referenced product (internal id).
    pub product_id: Option<i64>,
    /// Quantity, must be >= 0.
    pub quantity: Option<Decimal>,
    /// Unit price, must be >= 0.
    pub unit_price: Option<Decimal>,
    /// Line total, must be >= 0.
    pub line_total: Option<Decimal>,
}

/// A validated line item ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Referenced product (internal id).
    pub product_id: i64,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Line total.
    pub line_total: Decimal,
}

/// Validates submitted line items, accumulating errors under
/// `{prefix}.{index}.{field}` keys.
///
/// Cross-organization product checks are composed separately by the caller;
/// this covers presence and non-negativity only.
pub fn validate_items(
    prefix: &str,
    items: &[LineItemInput],
    errors: &mut ValidationErrors,
) -> Vec<LineItem> {
    let mut validated = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let product_id = match item.product_id {
            Some(id) => Some(id),
            None => {
                errors.add_indexed(prefix, index, "product_id", required("product id"));
                None
            }
        };
        let quantity = check_amount(item.quantity, prefix, index, "quantity", "product quantity", errors);
        let unit_price = check_amount(
            item.unit_price,
            prefix,
            index,
            "unit_price",
            "product unit price",
            errors,
        );
        let line_total = check_amount(
            item.line_total,
            prefix,
            index,
            "line_total",
            "product total price",
            errors,
        );

        if let (Some(product_id), Some(quantity), Some(unit_price), Some(line_total)) =
            (product_id, quantity, unit_price, line_total)
        {
            validated.push(LineItem {
                product_id,
                quantity,
                unit_price,
                line_total,
            });
        }
    }

    validated
}

/// Checks a required non-negative amount field on one item.
fn check_amount(
    value: Option<Decimal>,
    prefix: &str,
    index: usize,
    field: &str,
    attribute: &str,
    errors: &mut ValidationErrors,
) -> Option<Decimal> {
    match value {
        None => {
            errors.add_indexed(prefix, index, field, required(attribute));
            None
        }
        Some(v) if v < Decimal::ZERO => {
            errors.add_indexed(prefix, index, field, min_zero(attribute));
            None
        }
        Some(v) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal, line_total: Decimal) -> LineItemInput {
        LineItemInput {
            product_id: Some(1),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
            line_total: Some(line_total),
        }
    }

    #[test]
    fn test_valid_items_pass() {
        let mut errors = ValidationErrors::new();
        let items = vec![item(dec!(2), dec!(10.50), dec!(21.00))];
        let validated = validate_items("items", &items, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].line_total, dec!(21.00));
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut errors = ValidationErrors::new();
        let items = vec![item(dec!(-1), dec!(10), dec!(-10))];
        let validated = validate_items("items", &items, &mut errors);

        assert!(validated.is_empty());
        assert!(errors.get("items.0.quantity").is_some());
        assert!(errors.get("items.0.line_total").is_some());
        assert!(errors.get("items.0.unit_price").is_none());
    }

    #[test]
    fn test_missing_fields_reported_per_index() {
        let mut errors = ValidationErrors::new();
        let items = vec![
            item(dec!(1), dec!(1), dec!(1)),
            LineItemInput {
                product_id: None,
                quantity: None,
                unit_price: Some(dec!(5)),
                line_total: Some(dec!(5)),
            },
        ];
        let validated = validate_items("items", &items, &mut errors);

        assert_eq!(validated.len(), 1);
        assert!(errors.get("items.1.product_id").is_some());
        assert!(errors.get("items.1.quantity").is_some());
        assert!(errors.get("items.0.product_id").is_none());
    }

    #[test]
    fn test_zero_amounts_allowed() {
        let mut errors = ValidationErrors::new();
        let items = vec![item(dec!(0), dec!(0), dec!(0))];
        let validated = validate_items("items", &items, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(validated.len(), 1);
    }
}
