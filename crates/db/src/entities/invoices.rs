//! `SeaORM` Entity for invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: Uuid,
    pub organization_id: i64,
    pub customer_id: i64,
    pub payment_term_id: Option<i64>,
    pub invoice_no: Option<String>,
    pub issue_date: Date,
    pub due_date: Date,
    pub discount_type: Option<String>,
    pub discount_amount: Option<Decimal>,
    pub discount_rate: Option<Decimal>,
    pub tax_total: Option<Decimal>,
    pub total_amount: Decimal,
    /// draft | sent | paid | overdue
    pub status: String,
    pub bill_to: Option<String>,
    pub bill_from: Option<String>,
    pub ship_to: Option<String>,
    pub terms: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub deleted_by: Option<i64>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::payment_terms::Entity",
        from = "Column::PaymentTermId",
        to = "super::payment_terms::Column::Id"
    )]
    PaymentTerms,
    #[sea_orm(has_many = "super::invoice_items::Entity")]
    InvoiceItems,
    #[sea_orm(has_one = "super::invoice_settings::Entity")]
    InvoiceSettings,
    #[sea_orm(has_many = "super::payment_invoices::Entity")]
    PaymentInvoices,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::payment_terms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentTerms.def()
    }
}

impl Related<super::invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl Related<super::invoice_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceSettings.def()
    }
}

impl Related<super::payment_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
