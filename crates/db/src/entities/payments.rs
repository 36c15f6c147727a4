//! `SeaORM` Entity for payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: Uuid,
    pub organization_id: i64,
    pub customer_id: i64,
    /// Set only when payment_type is "bank".
    pub bank_id: Option<i64>,
    /// Set only when payment_type is "e-wallet".
    pub e_wallet_id: Option<i64>,
    pub payment_no: Option<String>,
    pub payment_date: Date,
    /// cash | bank | e-wallet
    pub payment_type: String,
    pub payment_type_reference_no: Option<String>,
    pub payment_type_reference_date: Option<Date>,
    pub total_amount: Option<Decimal>,
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
        belongs_to = "super::banks::Entity",
        from = "Column::BankId",
        to = "super::banks::Column::Id"
    )]
    Banks,
    #[sea_orm(
        belongs_to = "super::e_wallets::Entity",
        from = "Column::EWalletId",
        to = "super::e_wallets::Column::Id"
    )]
    EWallets,
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

impl Related<super::payment_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
