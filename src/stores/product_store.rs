use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::{Expr, LockType},
};

use crate::{
    db::OrmConn,
    entity::{
        categories::{self, Entity as Categories, Model as CategoryModel},
        product_category::{self, ActiveModel as LinkActive, Entity as ProductCategory},
        products::{self, ActiveModel as ProductActive, Entity as Products, Model as ProductModel},
    },
    error::{StoreError, StoreResult},
    models::{Category, NewProduct, Product},
    stores::{
        ProductReader, ProductWriter, category_store::category_from_entity,
        dedup_preserving_order,
    },
};

/// Postgres-backed product store. Every write that touches `product_category`
/// runs inside one transaction together with the owning product row.
#[derive(Clone)]
pub struct ProductStore {
    orm: OrmConn,
}

impl ProductStore {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }

    async fn begin(&self) -> StoreResult<DatabaseTransaction> {
        self.orm.begin().await.map_err(|err| {
            tracing::error!(error = %err, "error starting transaction");
            StoreError::StartTransaction(err)
        })
    }

    async fn load_with_categories(&self, ids: Option<Vec<i64>>) -> StoreResult<Vec<Product>> {
        let mut finder = Products::find();
        if let Some(ids) = ids {
            finder = finder.filter(products::Column::Id.is_in(ids));
        }

        let rows = finder
            .order_by_asc(products::Column::Id)
            .find_with_related(Categories)
            .all(&self.orm)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error loading products");
                StoreError::ProductQueryFailed(err)
            })?;

        Ok(rows
            .into_iter()
            .map(|(product, categories)| product_from_entity(product, categories))
            .collect())
    }
}

async fn commit(txn: DatabaseTransaction) -> StoreResult<()> {
    txn.commit().await.map_err(|err| {
        tracing::error!(error = %err, "error committing transaction");
        StoreError::EndTransaction(err)
    })
}

/// Looks up each category name inside `txn`. The first unknown name aborts.
async fn resolve_category_ids(txn: &DatabaseTransaction, names: &[String]) -> StoreResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(names.len());
    for name in dedup_preserving_order(names) {
        let found = Categories::find()
            .filter(categories::Column::Name.eq(name.as_str()))
            .one(txn)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, category = %name, "error checking category");
                StoreError::CategoryLookupFailed(err)
            })?;

        match found {
            Some(category) => ids.push(category.id),
            None => {
                tracing::warn!(category = %name, "category does not exist");
                return Err(StoreError::CategoryNotFound(name));
            }
        }
    }
    Ok(ids)
}

async fn link_categories(
    txn: &DatabaseTransaction,
    product_id: i64,
    category_ids: &[i64],
) -> StoreResult<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let links = category_ids.iter().map(|&category_id| LinkActive {
        product_id: Set(product_id),
        category_id: Set(category_id),
    });

    ProductCategory::insert_many(links)
        .exec_without_returning(txn)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, product_id, "error inserting product-category links");
            StoreError::ProductCategorySaveFailed(err)
        })?;
    Ok(())
}

/// Resolve, insert, link. Callers own the transaction and decide when to commit.
async fn insert_product(
    txn: &DatabaseTransaction,
    name: &str,
    categories: &[String],
) -> StoreResult<i64> {
    let category_ids = resolve_category_ids(txn, categories).await?;

    let product = ProductActive {
        id: NotSet,
        name: Set(name.to_owned()),
    }
    .insert(txn)
    .await
    .map_err(|err| {
        tracing::error!(error = %err, "error inserting product");
        StoreError::ProductSaveFailed(err)
    })?;

    link_categories(txn, product.id, &category_ids).await?;
    Ok(product.id)
}

#[async_trait]
impl ProductWriter for ProductStore {
    #[tracing::instrument(skip(self), fields(op = "store.add_product"))]
    async fn add_product(&self, name: &str, categories: &[String]) -> StoreResult<i64> {
        tracing::info!("saving product");

        let txn = self.begin().await?;
        let id = insert_product(&txn, name, categories).await?;
        commit(txn).await?;

        tracing::info!(id, "product saved");
        Ok(id)
    }

    #[tracing::instrument(skip_all, fields(op = "store.add_products", count = products.len()))]
    async fn add_products(&self, products: &[NewProduct]) -> StoreResult<()> {
        tracing::info!("saving product batch");

        let txn = self.begin().await?;
        for (index, product) in products.iter().enumerate() {
            if let Err(err) = insert_product(&txn, &product.name, &product.categories).await {
                tracing::error!(
                    index,
                    product = %product.name,
                    error = %err,
                    "batch item failed, discarding batch"
                );
                return Err(err);
            }
        }
        commit(txn).await?;

        tracing::info!("product batch saved");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(op = "store.delete_product"))]
    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        tracing::info!("removing product");

        let txn = self.begin().await?;

        let deleted = Products::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error deleting product");
                StoreError::ProductDeleteFailed(err)
            })?;

        if deleted.rows_affected == 0 {
            tracing::warn!("no product with this id");
            return Err(StoreError::ProductNotFound);
        }

        ProductCategory::delete_many()
            .filter(product_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error deleting product-category links");
                StoreError::ProductCategoryDeleteFailed(err)
            })?;

        commit(txn).await?;

        tracing::info!("product removed");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(op = "store.update_product_name"))]
    async fn update_product_name(&self, id: i64, name: &str) -> StoreResult<i64> {
        tracing::info!("renaming product");

        let result = Products::update_many()
            .col_expr(products::Column::Name, Expr::value(name))
            .filter(products::Column::Id.eq(id))
            .exec(&self.orm)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error updating product name");
                StoreError::ProductUpdateFailed(err)
            })?;

        if result.rows_affected == 0 {
            tracing::warn!("no product with this id");
            return Err(StoreError::ProductNotFound);
        }

        tracing::info!("product renamed");
        Ok(id)
    }

    #[tracing::instrument(skip(self, wanted), fields(op = "store.update_product_categories"))]
    async fn update_product_categories(&self, id: i64, wanted: &[Category]) -> StoreResult<i64> {
        tracing::info!(count = wanted.len(), "relinking product categories");

        let txn = self.begin().await?;

        // Row lock keeps a concurrent delete from orphaning the new links.
        let product = Products::find_by_id(id)
            .lock(LockType::Update)
            .one(&txn)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error loading product");
                StoreError::ProductQueryFailed(err)
            })?;
        if product.is_none() {
            tracing::warn!("no product with this id");
            return Err(StoreError::ProductNotFound);
        }

        let mut category_ids = Vec::with_capacity(wanted.len());
        for category in dedup_preserving_order(wanted) {
            // Links are keyed by id; a missing id falls back to the name.
            let finder = if category.id > 0 {
                Categories::find_by_id(category.id)
            } else {
                Categories::find().filter(categories::Column::Name.eq(category.name.as_str()))
            };

            let found = finder.one(&txn).await.map_err(|err| {
                tracing::error!(error = %err, "error checking category");
                StoreError::CategoryLookupFailed(err)
            })?;

            match found {
                Some(model) if !category_ids.contains(&model.id) => category_ids.push(model.id),
                Some(_) => {}
                None => {
                    let key = if category.id > 0 {
                        category.id.to_string()
                    } else {
                        category.name.clone()
                    };
                    tracing::warn!(category = %key, "category does not exist");
                    return Err(StoreError::CategoryNotFound(key));
                }
            }
        }

        ProductCategory::delete_many()
            .filter(product_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error deleting product-category links");
                StoreError::ProductCategoryDeleteFailed(err)
            })?;

        link_categories(&txn, id, &category_ids).await?;
        commit(txn).await?;

        tracing::info!("product categories updated");
        Ok(id)
    }
}

#[async_trait]
impl ProductReader for ProductStore {
    #[tracing::instrument(skip(self), fields(op = "store.get_all_products"))]
    async fn get_all_products(&self) -> StoreResult<Vec<Product>> {
        let products = self.load_with_categories(None).await?;
        tracing::debug!(count = products.len(), "products loaded");
        Ok(products)
    }

    #[tracing::instrument(skip(self), fields(op = "store.get_category_products"))]
    async fn get_category_products(&self, category: &str) -> StoreResult<Vec<Product>> {
        let ids: Vec<i64> = Products::find()
            .select_only()
            .column(products::Column::Id)
            .inner_join(Categories)
            .filter(categories::Column::Name.eq(category))
            .into_tuple()
            .all(&self.orm)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "error querying products by category");
                StoreError::ProductQueryFailed(err)
            })?;

        if ids.is_empty() {
            tracing::debug!("no products in category");
            return Ok(Vec::new());
        }

        let products = self.load_with_categories(Some(ids)).await?;
        tracing::debug!(count = products.len(), "products loaded");
        Ok(products)
    }
}

fn product_from_entity(model: ProductModel, categories: Vec<CategoryModel>) -> Product {
    let mut categories: Vec<Category> = categories.into_iter().map(category_from_entity).collect();
    categories.sort_by_key(|category| category.id);
    Product {
        id: model.id,
        name: model.name,
        categories,
    }
}
