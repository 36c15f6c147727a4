//! Product repository for database operations.
//!
//! Products carry an optional list of per-product taxes, replaced
//! wholesale on update.

use chrono::Utc;
use faktura_shared::pagination::PageRequest;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{product_taxes, products};

/// One tax attached to a product.
#[derive(Debug, Clone)]
pub struct ProductTaxInput {
    pub name: String,
    pub rate: Decimal,
}

/// Product fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub unit_id: Option<i64>,
    pub category_id: Option<i64>,
    pub taxes: Vec<ProductTaxInput>,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists live products of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<products::Model>, u64), DbErr> {
        let paginator = products::Entity::find()
            .filter(products::Column::OrganizationId.eq(organization_id))
            .filter(products::Column::DeletedAt.is_null())
            .order_by_asc(products::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page.saturating_sub(1))).await?;

        Ok((items, total))
    }

    /// Finds a live product by its exposed uuid.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::Uuid.eq(uuid))
            .filter(products::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Loads the taxes attached to a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn taxes(&self, product_id: i64) -> Result<Vec<product_taxes::Model>, DbErr> {
        product_taxes::Entity::find()
            .filter(product_taxes::Column::ProductId.eq(product_id))
            .order_by_asc(product_taxes::Column::Id)
            .all(&self.db)
            .await
    }

    /// Creates a product with its taxes in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is persisted then.
    pub async fn create(
        &self,
        organization_id: i64,
        input: ProductInput,
        actor: i64,
    ) -> Result<products::Model, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let product = products::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            unit_id: Set(input.unit_id),
            category_id: Set(input.category_id),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            created_by: Set(Some(actor)),
            updated_by: Set(Some(actor)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let product = product.insert(&txn).await?;

        for tax in input.taxes {
            let tax = product_taxes::ActiveModel {
                product_id: Set(product.id),
                name: Set(tax.name),
                rate: Set(tax.rate),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            tax.insert(&txn).await?;
        }

        txn.commit().await?;

        Ok(product)
    }

    /// Replaces a product's fields and its tax list in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is persisted then.
    pub async fn update(
        &self,
        product: products::Model,
        input: ProductInput,
        actor: i64,
    ) -> Result<products::Model, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let product_id = product.id;

        let mut active: products::ActiveModel = product.into();
        active.unit_id = Set(input.unit_id);
        active.category_id = Set(input.category_id);
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(now);
        let product = active.update(&txn).await?;

        product_taxes::Entity::delete_many()
            .filter(product_taxes::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await?;

        for tax in input.taxes {
            let tax = product_taxes::ActiveModel {
                product_id: Set(product_id),
                name: Set(tax.name),
                rate: Set(tax.rate),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            tax.insert(&txn).await?;
        }

        txn.commit().await?;

        Ok(product)
    }

    /// Soft-deletes a product. Taxes stay attached to the hidden row.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn soft_delete(&self, product: products::Model, actor: i64) -> Result<(), DbErr> {
        let mut active: products::ActiveModel = product.into();
        active.deleted_by = Set(Some(actor));
        active.deleted_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;
        Ok(())
    }
}
