use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait, sea_query::Expr,
};

use crate::{
    db::OrmConn,
    entity::{
        categories::{self, ActiveModel as CategoryActive, Entity as Categories},
        product_category::{self, Entity as ProductCategory},
    },
    error::{StoreError, StoreResult},
    models::Category,
    stores::{CategoryReader, CategoryWriter},
};

/// Postgres-backed category store.
#[derive(Clone)]
pub struct CategoryStore {
    orm: OrmConn,
}

impl CategoryStore {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl CategoryWriter for CategoryStore {
    #[tracing::instrument(skip(self), fields(op = "store.add_category"))]
    async fn add_category(&self, name: &str) -> StoreResult<i64> {
        tracing::info!("saving category");

        let category = CategoryActive {
            id: NotSet,
            name: Set(name.to_owned()),
        }
        .insert(&self.orm)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                tracing::warn!("category already exists");
                StoreError::CategoryExists
            } else {
                tracing::error!(error = %err, "error inserting category");
                StoreError::CategorySaveFailed(err)
            }
        })?;

        tracing::info!(id = category.id, "category saved");
        Ok(category.id)
    }

    #[tracing::instrument(skip(self), fields(op = "store.delete_category"))]
    async fn delete_category(&self, id: i64) -> StoreResult<()> {
        tracing::info!("removing category");

        let txn = self.orm.begin().await.map_err(|err| {
            tracing::error!(error = %err, "error starting transaction");
            StoreError::StartTransaction(err)
        })?;

        let deleted = Categories::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error deleting category");
                StoreError::CategoryDeleteFailed(err)
            })?;

        if deleted.rows_affected == 0 {
            tracing::warn!("no category with this id");
            return Err(StoreError::CategoryNotFound(id.to_string()));
        }

        let unlinked = ProductCategory::delete_many()
            .filter(product_category::Column::CategoryId.eq(id))
            .exec(&txn)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error deleting product-category links");
                StoreError::ProductCategoryDeleteFailed(err)
            })?;

        txn.commit().await.map_err(|err| {
            tracing::error!(error = %err, "error committing transaction");
            StoreError::EndTransaction(err)
        })?;

        tracing::info!(links = unlinked.rows_affected, "category removed");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(op = "store.update_category_name"))]
    async fn update_category_name(&self, id: i64, name: &str) -> StoreResult<i64> {
        tracing::info!("renaming category");

        let result = Categories::update_many()
            .col_expr(categories::Column::Name, Expr::value(name))
            .filter(categories::Column::Id.eq(id))
            .exec(&self.orm)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    tracing::warn!("category name already taken");
                    StoreError::CategoryExists
                } else {
                    tracing::error!(error = %err, "error updating category name");
                    StoreError::CategoryUpdateFailed(err)
                }
            })?;

        if result.rows_affected == 0 {
            tracing::warn!("no category with this id");
            return Err(StoreError::CategoryNotFound(id.to_string()));
        }

        tracing::info!("category renamed");
        Ok(id)
    }
}

#[async_trait]
impl CategoryReader for CategoryStore {
    #[tracing::instrument(skip(self), fields(op = "store.get_all_categories"))]
    async fn get_all_categories(&self) -> StoreResult<Vec<Category>> {
        let categories = Categories::find()
            .order_by_asc(categories::Column::Id)
            .all(&self.orm)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error listing categories");
                StoreError::CategoryListFailed(err)
            })?
            .into_iter()
            .map(category_from_entity)
            .collect::<Vec<_>>();

        tracing::debug!(count = categories.len(), "categories loaded");
        Ok(categories)
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub(crate) fn category_from_entity(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
    }
}
