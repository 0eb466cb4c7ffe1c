use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{SignInRequest, SignInResponse, SignUpRequest, SignUpResponse},
        categories::{
            AddCategoryRequest, CategoryIdResponse, CategoryList, DeleteCategoryRequest,
            EditCategoryRequest,
        },
        products::{
            AddProductRequest, CategoryProductsRequest, DeleteProductRequest,
            EditProductCategoriesRequest, EditProductNameRequest, ProductIdResponse, ProductList,
        },
        tag::TagRequest,
    },
    models::{Category, Product},
    response::EmptyData,
    routes::{auth, categories, health, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::sign_up,
        auth::sign_in,
        products::add_product,
        products::delete_product,
        products::edit_product_name,
        products::edit_product_categories,
        products::get_all_products,
        products::get_category_products,
        categories::add_category,
        categories::delete_category,
        categories::edit_category,
        categories::get_all_categories
    ),
    components(
        schemas(
            Product,
            Category,
            EmptyData,
            SignUpRequest,
            SignUpResponse,
            SignInRequest,
            SignInResponse,
            AddProductRequest,
            DeleteProductRequest,
            EditProductNameRequest,
            EditProductCategoriesRequest,
            CategoryProductsRequest,
            ProductIdResponse,
            ProductList,
            AddCategoryRequest,
            DeleteCategoryRequest,
            EditCategoryRequest,
            CategoryIdResponse,
            CategoryList,
            TagRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Sign-up and sign-in"),
        (name = "Products", description = "Product endpoints"),
        (name = "Categories", description = "Category endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
