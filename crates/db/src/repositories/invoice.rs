//! Invoice repository for database operations.
//!
//! Creation persists the header and its items in one transaction; updates
//! touch the header only, leaving items as created. `total_paid` is never
//! stored: it is recomputed on read from allocations whose parent payment
//! is still live.

use std::collections::BTreeMap;

use chrono::Utc;
use faktura_core::invoice::InvoiceDraft;
use faktura_core::payment::settlement;
use faktura_shared::pagination::PageRequest;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{invoice_items, invoice_settings, invoices, payment_invoices, payments};

/// Invoice setting fields, upserted as one row per invoice.
#[derive(Debug, Clone)]
pub struct InvoiceSettingInput {
    pub due_reminder: String,
    pub late_fee_type: String,
    pub late_fee_rate: Option<Decimal>,
    pub late_fee: Option<Decimal>,
    pub is_gst_enabled: bool,
    pub is_unit_enabled: bool,
    pub is_recurring: bool,
    pub custom_fields_enabled: bool,
}

/// Invoice repository for aggregate operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live invoices of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<invoices::Model>, u64), DbErr> {
        let paginator = invoices::Entity::find()
            .filter(invoices::Column::OrganizationId.eq(organization_id))
            .filter(invoices::Column::DeletedAt.is_null())
            .order_by_asc(invoices::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live invoice by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<invoices::Model>, DbErr> {
        invoices::Entity::find()
            .filter(invoices::Column::Uuid.eq(uuid))
            .filter(invoices::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Loads an invoice's items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn items(&self, invoice_id: i64) -> Result<Vec<invoice_items::Model>, DbErr> {
        invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(invoice_items::Column::Id)
            .all(&self.db)
            .await
    }

    /// Loads an invoice's settings row, if one was ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn setting(&self, invoice_id: i64) -> Result<Option<invoice_settings::Model>, DbErr> {
        invoice_settings::Entity::find()
            .filter(invoice_settings::Column::InvoiceId.eq(invoice_id))
            .one(&self.db)
            .await
    }

    /// Creates an invoice with all its items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is persisted then.
    pub async fn create(
        &self,
        organization_id: i64,
        draft: InvoiceDraft,
        actor: i64,
    ) -> Result<invoices::Model, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let invoice = invoices::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            customer_id: Set(draft.customer_id),
            payment_term_id: Set(draft.payment_term_id),
            invoice_no: Set(draft.invoice_no),
            issue_date: Set(draft.issue_date),
            due_date: Set(draft.due_date),
            discount_type: Set(draft.discount_type.map(|t| t.as_str().to_string())),
            discount_amount: Set(draft.discount_amount),
            discount_rate: Set(draft.discount_rate),
            tax_total: Set(draft.tax_total),
            total_amount: Set(draft.total_amount),
            status: Set(draft.status.as_str().to_string()),
            bill_to: Set(draft.bill_to),
            bill_from: Set(draft.bill_from),
            ship_to: Set(draft.ship_to),
            terms: Set(draft.terms),
            notes: Set(draft.notes),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let invoice = invoice.insert(&txn).await?;

        for item in draft.items {
            let item = invoice_items::ActiveModel {
                invoice_id: Set(invoice.id),
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

        Ok(invoice)
    }

    /// Updates an invoice's header fields only. Items are immutable after
    /// creation; any items in the draft are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_header(
        &self,
        invoice: invoices::Model,
        draft: InvoiceDraft,
        actor: i64,
    ) -> Result<invoices::Model, DbErr> {
        let mut active: invoices::ActiveModel = invoice.into();
        active.customer_id = Set(draft.customer_id);
        active.payment_term_id = Set(draft.payment_term_id);
        active.invoice_no = Set(draft.invoice_no);
        active.issue_date = Set(draft.issue_date);
        active.due_date = Set(draft.due_date);
        active.discount_type = Set(draft.discount_type.map(|t| t.as_str().to_string()));
        active.discount_amount = Set(draft.discount_amount);
        active.discount_rate = Set(draft.discount_rate);
        active.tax_total = Set(draft.tax_total);
        active.total_amount = Set(draft.total_amount);
        active.status = Set(draft.status.as_str().to_string());
        active.bill_to = Set(draft.bill_to);
        active.bill_from = Set(draft.bill_from);
        active.ship_to = Set(draft.ship_to);
        active.terms = Set(draft.terms);
        active.notes = Set(draft.notes);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Upserts the one settings row of an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn upsert_setting(
        &self,
        invoice_id: i64,
        input: InvoiceSettingInput,
    ) -> Result<invoice_settings::Model, DbErr> {
        let now = Utc::now().into();

        match self.setting(invoice_id).await? {
            Some(existing) => {
                let mut active: invoice_settings::ActiveModel = existing.into();
                active.due_reminder = Set(input.due_reminder);
                active.late_fee_type = Set(input.late_fee_type);
                active.late_fee_rate = Set(input.late_fee_rate);
                active.late_fee = Set(input.late_fee);
                active.is_gst_enabled = Set(input.is_gst_enabled);
                active.is_unit_enabled = Set(input.is_unit_enabled);
                active.is_recurring = Set(input.is_recurring);
                active.custom_fields_enabled = Set(input.custom_fields_enabled);
                active.updated_at = Set(now);
                active.update(&self.db).await
            }
            None => {
                let setting = invoice_settings::ActiveModel {
                    invoice_id: Set(invoice_id),
                    due_reminder: Set(input.due_reminder),
                    late_fee_type: Set(input.late_fee_type),
                    late_fee_rate: Set(input.late_fee_rate),
                    late_fee: Set(input.late_fee),
                    is_gst_enabled: Set(input.is_gst_enabled),
                    is_unit_enabled: Set(input.is_unit_enabled),
                    is_recurring: Set(input.is_recurring),
                    custom_fields_enabled: Set(input.custom_fields_enabled),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                setting.insert(&self.db).await
            }
        }
    }

    /// Soft-deletes an invoice header. Items and allocations stay in
    /// place; the hidden header removes them from every read path.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, invoice: invoices::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: invoices::ActiveModel = invoice.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }

    /// Sums the amounts allocated to an invoice by payments that are not
    /// soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn total_paid(&self, invoice_id: i64) -> Result<Decimal, DbErr> {
        let rows = self.live_allocations(&[invoice_id]).await?;
        Ok(settlement::total_paid(rows.into_iter().map(|r| r.line_total)))
    }

    /// Computes `total_paid` for a batch of invoices in one query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn total_paid_map(&self, invoice_ids: &[i64]) -> Result<BTreeMap<i64, Decimal>, DbErr> {
        let mut totals: BTreeMap<i64, Decimal> =
            invoice_ids.iter().map(|id| (*id, Decimal::ZERO)).collect();

        for row in self.live_allocations(invoice_ids).await? {
            if let Some(total) = totals.get_mut(&row.invoice_id) {
                *total += row.line_total;
            }
        }

        Ok(totals)
    }

    /// Allocations for the given invoices whose parent payment is live.
    async fn live_allocations(
        &self,
        invoice_ids: &[i64],
    ) -> Result<Vec<payment_invoices::Model>, DbErr> {
        payment_invoices::Entity::find()
            .join(JoinType::InnerJoin, payment_invoices::Relation::Payments.def())
            .filter(payment_invoices::Column::InvoiceId.is_in(invoice_ids.iter().copied()))
            .filter(payments::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
    }
}
