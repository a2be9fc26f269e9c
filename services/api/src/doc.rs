//! OpenAPI document for the marketplace API
//!
//! Served as JSON at `/api-docs/openapi.json` and browsable through Swagger
//! UI at `/swagger`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use auth::models::LoginCredentials;

use crate::{
    error::ErrorResponse,
    models::{
        LoginResponse, RegisterResponse,
        ad::{Ad, AdSummary, CreateAdRequest},
    },
};

/// Register both ways a client can present its token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "auth_token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Auth-Token",
                "Access token as returned by POST /login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace API",
        description = "Accounts, token login and classified ads."
    ),
    security(("bearer" = []), ("auth_token" = [])),
    paths(
        crate::routes::register,
        crate::routes::login,
        crate::routes::create_ad,
        crate::routes::list_ads,
        crate::routes::get_ad,
        crate::routes::health_check,
    ),
    components(schemas(
        LoginCredentials,
        RegisterResponse,
        LoginResponse,
        CreateAdRequest,
        Ad,
        AdSummary,
        ErrorResponse,
    )),
    tags(
        (name = "accounts", description = "Registration and login"),
        (name = "ads", description = "Creating, listing and fetching ads"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
