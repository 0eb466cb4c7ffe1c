use catalog_api::{
    db::{DbPool, create_pool, orm_from_pool, run_migrations},
    error::StoreError,
    models::{Category, NewProduct},
    stores::{
        CategoryReader, CategoryStore, CategoryWriter, ProductReader, ProductStore, ProductWriter,
        UserReader, UserStore, UserWriter,
    },
};

async fn link_rows(pool: &DbPool) -> anyhow::Result<Vec<(i64, i64)>> {
    let rows = sqlx::query_as(
        "SELECT product_id, category_id FROM product_category ORDER BY product_id, category_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// Runs the store operations against a real Postgres in one test so the
// truncation below cannot race with another test.
#[tokio::test]
async fn postgres_catalog_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run catalog flow tests."
            );
            return Ok(());
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;
    sqlx::query("TRUNCATE product_category, products, categories, users RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await?;

    let orm = orm_from_pool(&pool);
    let categories = CategoryStore::new(orm.clone());
    let products = ProductStore::new(orm);
    let users = UserStore::new(pool.clone());

    // Electronics / Laptop
    assert_eq!(categories.add_category("Electronics").await?, 1);
    assert_eq!(products.add_product("Laptop", &["Electronics".into()]).await?, 1);
    assert_eq!(link_rows(&pool).await?, vec![(1, 1)]);

    categories.delete_category(1).await?;
    let all = products.get_all_products().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Laptop");
    assert!(all[0].categories.is_empty());
    assert!(link_rows(&pool).await?.is_empty());
    assert!(categories.get_all_categories().await?.is_empty());

    // Unique names and missing rows.
    let books = categories.add_category("Books").await?;
    assert!(matches!(
        categories.add_category("Books").await,
        Err(StoreError::CategoryExists)
    ));
    assert!(matches!(
        categories.update_category_name(999, "Comics").await,
        Err(StoreError::CategoryNotFound(_))
    ));
    assert!(matches!(
        products.update_product_name(999, "Ghost").await,
        Err(StoreError::ProductNotFound)
    ));
    assert_eq!(products.get_all_products().await?.len(), 1);

    // A failed insert leaves no product behind.
    assert!(matches!(
        products
            .add_product("Atlas", &["Books".into(), "Maps".into()])
            .await,
        Err(StoreError::CategoryNotFound(name)) if name == "Maps"
    ));
    assert_eq!(products.get_all_products().await?.len(), 1);

    // Batch writes are all or nothing.
    let batch = vec![
        NewProduct::new("Novel", vec!["Books".into()]),
        NewProduct::new("Poster", vec![]),
        NewProduct::new("Globe", vec!["Maps".into()]),
        NewProduct::new("Essay", vec!["Books".into()]),
        NewProduct::new("Pen", vec![]),
    ];
    assert!(products.add_products(&batch).await.is_err());
    assert_eq!(products.get_all_products().await?.len(), 1);

    let good: Vec<NewProduct> = batch.into_iter().filter(|p| p.name != "Globe").collect();
    products.add_products(&good).await?;
    let in_books = products.get_category_products("Books").await?;
    let names: Vec<_> = in_books.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Novel", "Essay"]);
    assert!(in_books.iter().all(|p| p.categories[0].id == books));
    let novel = in_books[0].id;
    let essay = in_books[1].id;

    // A relink naming an unknown category rolls back and keeps the old links.
    let before = link_rows(&pool).await?;
    assert!(matches!(
        products
            .update_product_categories(
                novel,
                &[
                    Category { id: books, name: "Books".into() },
                    Category { id: 9999, name: String::new() },
                ],
            )
            .await,
        Err(StoreError::CategoryNotFound(key)) if key == "9999"
    ));
    assert_eq!(link_rows(&pool).await?, before);
    assert!(matches!(
        products
            .update_product_categories(9999, &[Category { id: books, name: "Books".into() }])
            .await,
        Err(StoreError::ProductNotFound)
    ));

    // A successful relink replaces the whole set.
    let fiction = categories.add_category("Fiction").await?;
    products
        .update_product_categories(novel, &[Category { id: 0, name: "Fiction".into() }])
        .await?;
    let novel_links: Vec<_> = link_rows(&pool)
        .await?
        .into_iter()
        .filter(|(product_id, _)| *product_id == novel)
        .collect();
    assert_eq!(novel_links, vec![(novel, fiction)]);

    // Deleting a product removes its links; a second delete finds nothing.
    products.delete_product(novel).await?;
    let links = link_rows(&pool).await?;
    assert!(links.iter().all(|(product_id, _)| *product_id != novel));
    assert_eq!(links, vec![(essay, books)]);
    assert!(matches!(
        products.delete_product(novel).await,
        Err(StoreError::ProductNotFound)
    ));
    assert!(
        products
            .get_all_products()
            .await?
            .iter()
            .all(|p| p.id != novel)
    );

    // Users
    let user_id = users.save_user("ana@example.com", "hash").await?;
    assert_eq!(users.user_by_email("ana@example.com").await?.id, user_id);
    assert!(matches!(
        users.save_user("ana@example.com", "hash").await,
        Err(StoreError::UserExists)
    ));
    assert!(matches!(
        users.user_by_email("bob@example.com").await,
        Err(StoreError::UserNotFound)
    ));

    pool.close().await;
    Ok(())
}
