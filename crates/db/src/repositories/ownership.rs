//! Cross-organization reference checks.
//!
//! Payloads reference related records by internal id (customer on an
//! invoice, products on items, the method on a payment). Every such
//! reference must resolve to a live row owned by the route's
//! organization; any miss collapses into one validation message so
//! callers cannot probe other tenants' ids.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{
    banks, categories, customers, e_wallets, invoices, payment_terms, products, suppliers, units,
};

/// A reference kind a payload can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefEntity {
    Customer,
    Supplier,
    Product,
    Bank,
    EWallet,
    Invoice,
    PaymentTerm,
    Unit,
    Category,
}

impl RefEntity {
    /// Label used in validation messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::Product => "product",
            Self::Bank => "bank",
            Self::EWallet => "e-wallet",
            Self::Invoice => "invoice",
            Self::PaymentTerm => "payment term",
            Self::Unit => "unit",
            Self::Category => "category",
        }
    }
}

/// Checks payload-supplied ids against the owning organization.
#[derive(Debug, Clone)]
pub struct OwnershipChecker {
    db: DatabaseConnection,
}

impl OwnershipChecker {
    /// Creates a new ownership checker.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether the referenced row exists, is not soft-deleted, and is
    /// owned by the given organization. Missing, deleted, and
    /// foreign-owned rows are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn belongs_to_organization(
        &self,
        entity: RefEntity,
        id: i64,
        organization_id: i64,
    ) -> Result<bool, DbErr> {
        let count = match entity {
            RefEntity::Customer => {
                customers::Entity::find()
                    .filter(customers::Column::Id.eq(id))
                    .filter(customers::Column::OrganizationId.eq(organization_id))
                    .filter(customers::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
            RefEntity::Supplier => {
                suppliers::Entity::find()
                    .filter(suppliers::Column::Id.eq(id))
                    .filter(suppliers::Column::OrganizationId.eq(organization_id))
                    .filter(suppliers::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
            RefEntity::Product => {
                products::Entity::find()
                    .filter(products::Column::Id.eq(id))
                    .filter(products::Column::OrganizationId.eq(organization_id))
                    .filter(products::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
            RefEntity::Bank => {
                banks::Entity::find()
                    .filter(banks::Column::Id.eq(id))
                    .filter(banks::Column::OrganizationId.eq(organization_id))
                    .filter(banks::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
            RefEntity::EWallet => {
                e_wallets::Entity::find()
                    .filter(e_wallets::Column::Id.eq(id))
                    .filter(e_wallets::Column::OrganizationId.eq(organization_id))
                    .filter(e_wallets::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
            RefEntity::Invoice => {
                invoices::Entity::find()
                    .filter(invoices::Column::Id.eq(id))
                    .filter(invoices::Column::OrganizationId.eq(organization_id))
                    .filter(invoices::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
            RefEntity::PaymentTerm => {
                payment_terms::Entity::find()
                    .filter(payment_terms::Column::Id.eq(id))
                    .filter(payment_terms::Column::OrganizationId.eq(organization_id))
                    .filter(payment_terms::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
            RefEntity::Unit => {
                units::Entity::find()
                    .filter(units::Column::Id.eq(id))
                    .filter(units::Column::OrganizationId.eq(organization_id))
                    .filter(units::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
            RefEntity::Category => {
                categories::Entity::find()
                    .filter(categories::Column::Id.eq(id))
                    .filter(categories::Column::OrganizationId.eq(organization_id))
                    .filter(categories::Column::DeletedAt.is_null())
                    .count(&self.db)
                    .await?
            }
        };

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_validation_messages() {
        assert_eq!(RefEntity::PaymentTerm.label(), "payment term");
        assert_eq!(RefEntity::EWallet.label(), "e-wallet");
        assert_eq!(
            faktura_shared::validation::not_in_organization(RefEntity::Customer.label()),
            "The customer does not belong to the organization."
        );
    }
}
