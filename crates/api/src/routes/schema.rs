use axum::Json;
use schemars::schema::RootSchema;
use types::Catalog;

#[utoipa::path(
    get,
    path = "/v1/schema/catalog",
    responses((status = 200, description = "JSON Schema of the catalog document"))
)]
pub async fn catalog_schema() -> Json<RootSchema> {
    Json(schemars::schema_for!(Catalog))
}
