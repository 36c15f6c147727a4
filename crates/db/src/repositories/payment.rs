//! Payment repository for database operations.
//!
//! Writes persist the header and full-sync the invoice allocations in the
//! same transaction; the row-level plan comes from
//! [`faktura_core::payment::settlement::plan_sync`].

use chrono::Utc;
use faktura_core::payment::PaymentDraft;
use faktura_core::payment::settlement::{AllocationRow, plan_sync};
use faktura_shared::pagination::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{payment_invoices, payments};

/// Payment repository for aggregate operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live payments of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<payments::Model>, u64), DbErr> {
        let paginator = payments::Entity::find()
            .filter(payments::Column::OrganizationId.eq(organization_id))
            .filter(payments::Column::DeletedAt.is_null())
            .order_by_asc(payments::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live payment by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<payments::Model>, DbErr> {
        payments::Entity::find()
            .filter(payments::Column::Uuid.eq(uuid))
            .filter(payments::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Loads a payment's invoice allocations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn allocations(
        &self,
        payment_id: i64,
    ) -> Result<Vec<payment_invoices::Model>, DbErr> {
        payment_invoices::Entity::find()
            .filter(payment_invoices::Column::PaymentId.eq(payment_id))
            .order_by_asc(payment_invoices::Column::Id)
            .all(&self.db)
            .await
    }

    /// Creates a payment with its allocations in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is persisted then.
    pub async fn create(
        &self,
        organization_id: i64,
        draft: PaymentDraft,
        actor: i64,
    ) -> Result<payments::Model, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let payment = payments::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            customer_id: Set(draft.customer_id),
            bank_id: Set(draft.bank_id),
            e_wallet_id: Set(draft.e_wallet_id),
            payment_no: Set(draft.payment_no),
            payment_date: Set(draft.payment_date),
            payment_type: Set(draft.payment_type.as_str().to_string()),
            payment_type_reference_no: Set(draft.reference_no),
            payment_type_reference_date: Set(draft.reference_date),
            total_amount: Set(draft.total_amount),
            notes: Set(draft.notes),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let payment = payment.insert(&txn).await?;

        Self::apply_sync(&txn, payment.id, &[], &draft.allocations).await?;

        txn.commit().await?;

        Ok(payment)
    }

    /// Updates a payment's header and full-syncs its allocations against
    /// the submitted list, all in one transaction. Resubmitting the
    /// current allocations is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is persisted then.
    pub async fn update(
        &self,
        payment: payments::Model,
        draft: PaymentDraft,
        actor: i64,
    ) -> Result<payments::Model, DbErr> {
        let txn = self.db.begin().await?;
        let payment_id = payment.id;

        let existing: Vec<AllocationRow> = payment_invoices::Entity::find()
            .filter(payment_invoices::Column::PaymentId.eq(payment_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|row| AllocationRow {
                invoice_id: row.invoice_id,
                line_total: row.line_total,
                notes: row.notes,
            })
            .collect();

        let mut active: payments::ActiveModel = payment.into();
        active.customer_id = Set(draft.customer_id);
        active.bank_id = Set(draft.bank_id);
        active.e_wallet_id = Set(draft.e_wallet_id);
        active.payment_no = Set(draft.payment_no);
        active.payment_date = Set(draft.payment_date);
        active.payment_type = Set(draft.payment_type.as_str().to_string());
        active.payment_type_reference_no = Set(draft.reference_no);
        active.payment_type_reference_date = Set(draft.reference_date);
        active.total_amount = Set(draft.total_amount);
        active.notes = Set(draft.notes);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        let payment = active.update(&txn).await?;

        Self::apply_sync(&txn, payment_id, &existing, &draft.allocations).await?;

        txn.commit().await?;

        Ok(payment)
    }

    /// Soft-deletes a payment. Allocation rows stay, but `total_paid`
    /// reads skip them once the parent is deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, payment: payments::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: payments::ActiveModel = payment.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }

    /// Applies a settlement plan inside the caller's transaction.
    async fn apply_sync<C: ConnectionTrait>(
        conn: &C,
        payment_id: i64,
        existing: &[AllocationRow],
        submitted: &[AllocationRow],
    ) -> Result<(), DbErr> {
        let plan = plan_sync(existing, submitted);
        let now = Utc::now().into();

        if !plan.remove.is_empty() {
            payment_invoices::Entity::delete_many()
                .filter(payment_invoices::Column::PaymentId.eq(payment_id))
                .filter(payment_invoices::Column::InvoiceId.is_in(plan.remove))
                .exec(conn)
                .await?;
        }

        for row in plan.update {
            let stored = payment_invoices::Entity::find()
                .filter(payment_invoices::Column::PaymentId.eq(payment_id))
                .filter(payment_invoices::Column::InvoiceId.eq(row.invoice_id))
                .one(conn)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound("payment allocation".to_string()))?;

            let mut active: payment_invoices::ActiveModel = stored.into();
            active.line_total = Set(row.line_total);
            active.notes = Set(row.notes);
            active.updated_at = Set(now);
            active.update(conn).await?;
        }

        for row in plan.insert {
            let allocation = payment_invoices::ActiveModel {
                payment_id: Set(payment_id),
                invoice_id: Set(row.invoice_id),
                line_total: Set(row.line_total),
                notes: Set(row.notes),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            allocation.insert(conn).await?;
        }

        Ok(())
    }
}
