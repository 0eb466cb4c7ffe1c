pub mod categories;
pub mod product_category;
pub mod products;

pub use categories::Entity as Categories;
pub use product_category::Entity as ProductCategory;
pub use products::Entity as Products;
