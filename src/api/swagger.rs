use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recipe Service API",
        version = "1.0.0",
        description = "REST API for the Recipe Finder application. \n\n**Authentication:** Per-user endpoints (favorites, search history, viewed recipes, user profile) require an Auth0-issued JWT Bearer token.\n\n**Features:**\n- Recipe search, random picks, details and autocomplete proxied to the upstream provider\n- Static fixture fallback when the provider is unreachable\n- Per-user favorites, search history and viewed-recipe tracking",
    ),
    paths(
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::recipes::BulkDetailsRequest,
            crate::models::AutocompleteSuggestion,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint for monitoring service status."),
        (name = "Recipes", description = "Recipe search and detail endpoints proxied to the upstream provider."),
        (name = "Users", description = "Per-user profile, favorites, search history and viewed recipes. Requires Bearer authentication."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your Auth0 JWT token"))
                        .build(),
                ),
            );
        }
    }
}
