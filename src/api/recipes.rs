use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::Config;
use crate::models::SearchParams;
use crate::services::fixture_service::FixtureStore;
use crate::services::spoonacular_service;
use crate::utils::is_blank;

const DEFAULT_RANDOM_NUMBER: u32 = 5;
const DEFAULT_AUTOCOMPLETE_NUMBER: u32 = 10;

#[derive(Deserialize)]
pub struct RandomQuery {
    pub number: Option<u32>,
}

#[derive(Deserialize)]
pub struct AutocompleteQuery {
    pub query: Option<String>,
    pub number: Option<u32>,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDetailsRequest {
    #[serde(default)]
    pub recipes_ids: Vec<i64>,
}

/// GET /api/recipes/search?query=...&filters
pub async fn search_recipes(
    config: web::Data<Config>,
    fixtures: web::Data<FixtureStore>,
    params: web::Query<SearchParams>,
) -> HttpResponse {
    if is_blank(Some(&params.query)) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing required query parameter"
        }));
    }

    log::info!("🔍 GET /recipes/search?query={}", params.query);

    if config.use_mock_data {
        if let Some(fixture) = fixtures.search_fallback() {
            return HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "recipes": fixture,
                "usingMockData": true
            }));
        }
    }

    match spoonacular_service::search_recipes(&config, &params).await {
        Ok(recipes) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "recipes": recipes
        })),
        Err(e) => {
            log::warn!("⚠️  Search failed, trying fixture fallback: {}", e);
            match fixtures.search_fallback() {
                Some(fixture) => HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "recipes": fixture,
                    "usingMockData": true
                })),
                None => HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": e.to_string()
                })),
            }
        }
    }
}

/// GET /api/recipes/random?number=5
pub async fn random_recipes(
    config: web::Data<Config>,
    fixtures: web::Data<FixtureStore>,
    query: web::Query<RandomQuery>,
) -> HttpResponse {
    let number = query.number.unwrap_or(DEFAULT_RANDOM_NUMBER);

    log::info!("🎲 GET /recipes/random?number={}", number);

    if config.use_mock_data {
        if let Some(fixture) = fixtures.random_fallback(number) {
            return HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "recipes": fixture,
                "usingMockData": true
            }));
        }
    }

    match spoonacular_service::random_recipes(&config, number).await {
        Ok(recipes) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "recipes": recipes
        })),
        Err(e) => {
            log::warn!("⚠️  Random fetch failed, trying fixture fallback: {}", e);
            match fixtures.random_fallback(number) {
                Some(fixture) => HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "recipes": fixture,
                    "usingMockData": true
                })),
                None => HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": e.to_string()
                })),
            }
        }
    }
}

/// GET /api/recipes/autocomplete?query=...&number=10
pub async fn autocomplete_search(
    config: web::Data<Config>,
    fixtures: web::Data<FixtureStore>,
    query: web::Query<AutocompleteQuery>,
) -> HttpResponse {
    let text = query.query.clone().unwrap_or_default();
    if is_blank(Some(&text)) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing required query parameter"
        }));
    }

    let number = query.number.unwrap_or(DEFAULT_AUTOCOMPLETE_NUMBER);

    if config.use_mock_data {
        return HttpResponse::Ok().json(fixtures.autocomplete_fallback(&text, number));
    }

    match spoonacular_service::autocomplete(&config, &text, number).await {
        Ok(suggestions) => HttpResponse::Ok().json(suggestions),
        Err(e) => {
            log::warn!("⚠️  Autocomplete failed, serving fixture titles: {}", e);
            HttpResponse::Ok().json(fixtures.autocomplete_fallback(&text, number))
        }
    }
}

/// GET /api/recipes/{recipe_id} — registered after the literal routes so it
/// cannot shadow them.
pub async fn recipe_details(
    config: web::Data<Config>,
    fixtures: web::Data<FixtureStore>,
    path: web::Path<i64>,
) -> HttpResponse {
    let recipe_id = path.into_inner();

    log::info!("📖 GET /recipes/{}", recipe_id);

    if config.use_mock_data {
        if let Some(recipe) = fixtures.details_fallback(recipe_id) {
            return HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "recipe": recipe,
                "usingMockData": true
            }));
        }
    }

    match spoonacular_service::recipe_details(&config, recipe_id).await {
        Ok(recipe) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "recipe": recipe
        })),
        Err(e) => {
            log::warn!("⚠️  Details fetch failed, trying fixture fallback: {}", e);
            match fixtures.details_fallback(recipe_id) {
                Some(recipe) => HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "recipe": recipe,
                    "usingMockData": true
                })),
                None => HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("Recipe {} not found", recipe_id)
                })),
            }
        }
    }
}

/// POST /api/recipes/bulk-details
pub async fn bulk_details(
    config: web::Data<Config>,
    fixtures: web::Data<FixtureStore>,
    body: web::Json<BulkDetailsRequest>,
) -> HttpResponse {
    let recipe_ids = body.into_inner().recipes_ids;

    if recipe_ids.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "recipesIds must be a non-empty array"
        }));
    }

    log::info!("📚 POST /recipes/bulk-details ({} ids)", recipe_ids.len());

    if config.use_mock_data {
        return HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "recipes": fixtures.bulk_fallback(&recipe_ids),
            "usingMockData": true
        }));
    }

    match spoonacular_service::bulk_recipe_details(&config, &recipe_ids).await {
        Ok(recipes) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "recipes": recipes
        })),
        Err(e) => {
            log::warn!("⚠️  Bulk details failed, serving fixtures: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "recipes": fixtures.bulk_fallback(&recipe_ids),
                "usingMockData": true
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeSummary;
    use crate::services::spoonacular_service::SearchResponse;
    use actix_web::{http::StatusCode, test, App};

    fn mock_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: "0".to_string(),
            mongodb_uri: "mongodb://localhost:27017/recipe-finder-test".to_string(),
            spoonacular_base_url: "https://api.example.invalid".to_string(),
            spoonacular_api_key: "test-key".to_string(),
            auth0_domain: "example.auth0.com".to_string(),
            auth0_issuer: "https://example.auth0.com/".to_string(),
            auth0_audience: "recipe-api".to_string(),
            use_mock_data: true,
            mock_data_path: "mock/recipes.json".to_string(),
            mock_recipe_details_path: "mock/recipes-details.json".to_string(),
        }
    }

    fn fixtures() -> FixtureStore {
        let raw = serde_json::json!({
            "results": [
                { "id": 101, "title": "Pasta Carbonara", "imageType": "jpg" },
                { "id": 102, "title": "Beef Stew" }
            ],
            "offset": 0,
            "number": 10,
            "totalResults": 2
        });
        let search: SearchResponse = serde_json::from_value(raw).unwrap();
        let details: Vec<RecipeSummary> = search.results.clone();
        FixtureStore::from_parts(Some(search), details)
    }

    fn app_data() -> (web::Data<Config>, web::Data<FixtureStore>) {
        (web::Data::new(mock_config()), web::Data::new(fixtures()))
    }

    #[actix_web::test]
    async fn test_search_without_query_is_bad_request() {
        let (config, store) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(store)
                .route("/api/recipes/search", web::get().to(search_recipes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/recipes/search")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_search_mock_mode_tags_response() {
        let (config, store) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(store)
                .route("/api/recipes/search", web::get().to(search_recipes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/recipes/search?query=pasta")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["usingMockData"], true);
        assert_eq!(body["recipes"]["results"][0]["id"], 101);
    }

    #[actix_web::test]
    async fn test_details_mock_mode_restamps_id() {
        let (config, store) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(store)
                .route("/api/recipes/{recipe_id}", web::get().to(recipe_details)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/recipes/999").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["recipe"]["id"], 999);
        assert_eq!(body["usingMockData"], true);
    }

    #[actix_web::test]
    async fn test_bulk_details_requires_ids() {
        let (config, store) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(config)
                .app_data(store)
                .route("/api/recipes/bulk-details", web::post().to(bulk_details)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/recipes/bulk-details")
            .set_json(serde_json::json!({ "recipesIds": [] }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
