//! `SeaORM` Entity for invoice_settings table.
//!
//! One row per invoice, upserted through the update-setting endpoint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub invoice_id: i64,
    /// on_due_date | before_7_days | before_15_days
    pub due_reminder: String,
    /// flat | percentage
    pub late_fee_type: String,
    pub late_fee_rate: Option<Decimal>,
    pub late_fee: Option<Decimal>,
    pub is_gst_enabled: bool,
    pub is_unit_enabled: bool,
    pub is_recurring: bool,
    pub custom_fields_enabled: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
