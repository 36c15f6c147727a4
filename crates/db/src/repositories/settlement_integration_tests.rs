//! Integration tests for payment settlement against Postgres.
//!
//! Runs against a disposable container: allocation full-sync must leave
//! the stored rows matching the submitted list, and `total_paid` must
//! skip allocations whose parent payment is soft-deleted.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
    use testcontainers::{ContainerAsync, runners::AsyncRunner};
    use testcontainers_modules::postgres::Postgres;

    use crate::entities::payment_invoices;
    use crate::migration::Migrator;
    use crate::repositories::{
        CustomerInput, CustomerRepository, InvoiceRepository, NewRegistration, PaymentRepository,
        UserRepository,
    };
    use faktura_core::invoice::{InvoiceDraft, InvoiceStatus};
    use faktura_core::payment::settlement::AllocationRow;
    use faktura_core::payment::{PaymentDraft, PaymentType};
    use sea_orm_migration::MigratorTrait;

    struct Fixture {
        _node: ContainerAsync<Postgres>,
        db: DatabaseConnection,
        organization_id: i64,
        customer_id: i64,
        actor: i64,
    }

    async fn fixture() -> Fixture {
        let node = Postgres::default().start().await.unwrap();
        let host = node.get_host().await.unwrap();
        let port = node.get_host_port_ipv4(5432).await.unwrap();
        let db = crate::connect(&format!("postgres://postgres:postgres@{host}:{port}/postgres"))
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();

        let (user, organization) = UserRepository::new(db.clone())
            .register(NewRegistration {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "$argon2id$fake-hash".to_string(),
                user_type: "tenant".to_string(),
                organization_name: "Ada Works".to_string(),
            })
            .await
            .unwrap();

        let customer = CustomerRepository::new(db.clone())
            .create(
                organization.id,
                CustomerInput {
                    name: "Globex".to_string(),
                    email: None,
                    phone: None,
                    address: None,
                },
                user.id,
            )
            .await
            .unwrap();

        Fixture {
            _node: node,
            db,
            organization_id: organization.id,
            customer_id: customer.id,
            actor: user.id,
        }
    }

    fn invoice_draft(customer_id: i64, total_amount: Decimal) -> InvoiceDraft {
        InvoiceDraft {
            customer_id,
            payment_term_id: None,
            invoice_no: None,
            issue_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            discount_type: None,
            discount_amount: None,
            discount_rate: None,
            tax_total: None,
            total_amount,
            status: InvoiceStatus::Sent,
            bill_to: None,
            bill_from: None,
            ship_to: None,
            terms: None,
            notes: None,
            items: vec![],
        }
    }

    fn cash_draft(customer_id: i64, allocations: Vec<AllocationRow>) -> PaymentDraft {
        PaymentDraft {
            customer_id,
            payment_no: None,
            payment_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            payment_type: PaymentType::Cash,
            bank_id: None,
            e_wallet_id: None,
            reference_no: None,
            reference_date: None,
            total_amount: None,
            notes: None,
            allocations,
        }
    }

    fn allocation(invoice_id: i64, line_total: Decimal) -> AllocationRow {
        AllocationRow { invoice_id, line_total, notes: None }
    }

    async fn stored_allocations(
        db: &DatabaseConnection,
        payment_id: i64,
    ) -> Vec<payment_invoices::Model> {
        payment_invoices::Entity::find()
            .filter(payment_invoices::Column::PaymentId.eq(payment_id))
            .all(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_total_paid_skips_soft_deleted_payments() {
        let f = fixture().await;
        let invoices = InvoiceRepository::new(f.db.clone());
        let payments = PaymentRepository::new(f.db.clone());

        let invoice = invoices
            .create(f.organization_id, invoice_draft(f.customer_id, dec!(100)), f.actor)
            .await
            .unwrap();
        let payment = payments
            .create(
                f.organization_id,
                cash_draft(f.customer_id, vec![allocation(invoice.id, dec!(60))]),
                f.actor,
            )
            .await
            .unwrap();

        assert_eq!(invoices.total_paid(invoice.id).await.unwrap(), dec!(60));

        payments.soft_delete(payment.clone(), f.actor).await.unwrap();

        // The allocation row survives; only the sum drops.
        assert_eq!(invoices.total_paid(invoice.id).await.unwrap(), Decimal::ZERO);
        assert_eq!(stored_allocations(&f.db, payment.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_full_syncs_stored_allocation_rows() {
        let f = fixture().await;
        let invoices = InvoiceRepository::new(f.db.clone());
        let payments = PaymentRepository::new(f.db.clone());

        let a = invoices
            .create(f.organization_id, invoice_draft(f.customer_id, dec!(100)), f.actor)
            .await
            .unwrap();
        let b = invoices
            .create(f.organization_id, invoice_draft(f.customer_id, dec!(100)), f.actor)
            .await
            .unwrap();
        let c = invoices
            .create(f.organization_id, invoice_draft(f.customer_id, dec!(100)), f.actor)
            .await
            .unwrap();

        let payment = payments
            .create(
                f.organization_id,
                cash_draft(
                    f.customer_id,
                    vec![allocation(a.id, dec!(60)), allocation(b.id, dec!(40))],
                ),
                f.actor,
            )
            .await
            .unwrap();

        // Keep a (new amount), drop b, add c.
        let payment = payments
            .update(
                payment,
                cash_draft(
                    f.customer_id,
                    vec![allocation(a.id, dec!(70)), allocation(c.id, dec!(30))],
                ),
                f.actor,
            )
            .await
            .unwrap();

        let rows = stored_allocations(&f.db, payment.id).await;
        assert_eq!(rows.len(), 2);
        let amount_for = |invoice_id: i64| {
            rows.iter().find(|r| r.invoice_id == invoice_id).map(|r| r.line_total)
        };
        assert_eq!(amount_for(a.id), Some(dec!(70)));
        assert_eq!(amount_for(b.id), None);
        assert_eq!(amount_for(c.id), Some(dec!(30)));

        assert_eq!(invoices.total_paid(a.id).await.unwrap(), dec!(70));
        assert_eq!(invoices.total_paid(b.id).await.unwrap(), Decimal::ZERO);
        assert_eq!(invoices.total_paid(c.id).await.unwrap(), dec!(30));
    }

    #[tokio::test]
    async fn test_resubmitting_allocations_keeps_existing_rows() {
        let f = fixture().await;
        let invoices = InvoiceRepository::new(f.db.clone());
        let payments = PaymentRepository::new(f.db.clone());

        let invoice = invoices
            .create(f.organization_id, invoice_draft(f.customer_id, dec!(100)), f.actor)
            .await
            .unwrap();
        let payment = payments
            .create(
                f.organization_id,
                cash_draft(f.customer_id, vec![allocation(invoice.id, dec!(50))]),
                f.actor,
            )
            .await
            .unwrap();

        let before = stored_allocations(&f.db, payment.id).await;
        let payment = payments
            .update(
                payment,
                cash_draft(f.customer_id, vec![allocation(invoice.id, dec!(50))]),
                f.actor,
            )
            .await
            .unwrap();
        let after = stored_allocations(&f.db, payment.id).await;

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 1);
        // Unchanged submissions leave the stored row in place.
        assert_eq!(before[0].id, after[0].id);
        assert_eq!(before[0].line_total, after[0].line_total);
    }
}
