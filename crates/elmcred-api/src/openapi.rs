//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ELM Credentials API",
        version = "0.4.0",
        description = "Generates European Learning Model v3 credentials for course certificates, one learner at a time or as a course-wide ZIP archive.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(crate::routes::credentials::build_credentials),
    components(schemas(crate::error::ErrorBody, crate::error::FieldErrorsBody)),
    tags(
        (name = "credentials", description = "ELMv3 credential generation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
