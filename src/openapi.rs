use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        version = "0.1.0",
        description = r#"
# Stockroom API

Inventory management backend: products, categories, suppliers and an
append-only stock-movement ledger, plus a dashboard statistics endpoint.

## Error Handling

Failed requests carry a consistent JSON body:

```json
{
  "error": "Bad Request",
  "message": "A product with SKU 'T-1' already exists",
  "timestamp": "2025-11-03T10:30:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product catalog and stock levels"),
        (name = "Categories", description = "Product categories"),
        (name = "Suppliers", description = "Suppliers"),
        (name = "Stock movements", description = "Append-only stock ledger"),
        (name = "Stats", description = "Dashboard aggregation"),
        (name = "Health", description = "Service health")
    ),
    paths(
        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::get_product_movements,
        // Categories
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::create_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        // Suppliers
        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::get_supplier,
        crate::handlers::suppliers::create_supplier,
        crate::handlers::suppliers::update_supplier,
        crate::handlers::suppliers::delete_supplier,
        // Ledger + dashboard
        crate::handlers::movements::list_movements,
        crate::handlers::stats::get_stats,
        crate::handlers::health::health_check,
    ),
    components(schemas(
        crate::entities::category::Model,
        crate::entities::supplier::Model,
        crate::entities::product::Model,
        crate::entities::stock_movement::Model,
        crate::entities::stock_movement::MovementType,
        crate::handlers::categories::CategoryRequest,
        crate::handlers::suppliers::SupplierRequest,
        crate::handlers::products::ProductRequest,
        crate::services::categories::CategoryWithCount,
        crate::services::suppliers::SupplierWithCount,
        crate::services::products::ProductWithRefs,
        crate::services::movements::MovementWithProduct,
        crate::services::stats::DashboardStats,
        crate::services::stats::CategorySlice,
        crate::services::stats::StockTrendPoint,
        crate::errors::ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(
            utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_includes_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/products"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/categories"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/suppliers"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/stock-movements"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/stats"));
    }
}
