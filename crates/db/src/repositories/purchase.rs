//! Purchase repository for database operations.
//!
//! Same aggregate shape as invoices: header plus items created in one
//! transaction, header-only updates, soft-deleted headers.

use chrono::Utc;
use faktura_core::purchase::PurchaseDraft;
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{purchase_items, purchases};

/// Purchase repository for aggregate operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live purchases of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<purchases::Model>, u64), DbErr> {
        let paginator = purchases::Entity::find()
            .filter(purchases::Column::OrganizationId.eq(organization_id))
            .filter(purchases::Column::DeletedAt.is_null())
            .order_by_asc(purchases::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live purchase by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<purchases::Model>, DbErr> {
        purchases::Entity::find()
            .filter(purchases::Column::Uuid.eq(uuid))
            .filter(purchases::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Loads a purchase's items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn items(&self, purchase_id: i64) -> Result<Vec<purchase_items::Model>, DbErr> {
        purchase_items::Entity::find()
            .filter(purchase_items::Column::PurchaseId.eq(purchase_id))
            .order_by_asc(purchase_items::Column::Id)
            .all(&self.db)
            .await
    }

    /// Creates a purchase with all its items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is persisted then.
    pub async fn create(
        &self,
        organization_id: i64,
        draft: PurchaseDraft,
        actor: i64,
    ) -> Result<purchases::Model, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let purchase = purchases::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            supplier_id: Set(draft.supplier_id),
            payment_term_id: Set(draft.payment_term_id),
            purchase_no: Set(draft.purchase_no),
            purchase_date: Set(draft.purchase_date),
            total_amount: Set(draft.total_amount),
            status: Set(draft.status.as_str().to_string()),
            notes: Set(draft.notes),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let purchase = purchase.insert(&txn).await?;

        for item in draft.items {
            let item = purchase_items::ActiveModel {
                purchase_id: Set(purchase.id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                line_total: Set(item.line_total),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            item.insert(&txn).await?;
        }

        txn.commit().await?;

        Ok(purchase)
    }

    /// Updates a purchase's header fields only; draft items are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_header(
        &self,
        purchase: purchases::Model,
        draft: PurchaseDraft,
        actor: i64,
    ) -> Result<purchases::Model, DbErr> {
        let mut active: purchases::ActiveModel = purchase.into();
        active.supplier_id = Set(draft.supplier_id);
        active.payment_term_id = Set(draft.payment_term_id);
        active.purchase_no = Set(draft.purchase_no);
        active.purchase_date = Set(draft.purchase_date);
        active.total_amount = Set(draft.total_amount);
        active.status = Set(draft.status.as_str().to_string());
        active.notes = Set(draft.notes);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Soft-deletes a purchase header; items stay attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, purchase: purchases::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: purchases::ActiveModel = purchase.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
