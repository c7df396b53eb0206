use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::{AutocompleteSuggestion, RecipeSummary, SearchParams};
use crate::utils::AppError;

pub const RECIPE_IMAGE_BASE: &str = "https://img.spoonacular.com/recipes/";

const DEFAULT_SEARCH_NUMBER: u32 = 10;
const UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Paged search response, the canonical shape every recipe-list endpoint
/// returns (random results are normalized into it).
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<RecipeSummary>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub total_results: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RandomResponse {
    #[serde(default)]
    recipes: Vec<RecipeSummary>,
}

fn append_filter(url: &mut String, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.trim().is_empty() {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }
    }
}

/// Builds the provider search URL. Every provided filter lands in the query
/// string; omitted filters are left out entirely.
fn search_url(base_url: &str, api_key: &str, params: &SearchParams) -> String {
    let mut url = format!(
        "{}/recipes/complexSearch?query={}&number={}&offset={}&addRecipeInformation=true&apiKey={}",
        base_url,
        urlencoding::encode(&params.query),
        params.number.unwrap_or(DEFAULT_SEARCH_NUMBER),
        params.offset.unwrap_or(0),
        api_key
    );

    append_filter(&mut url, "type", &params.dish_type);
    append_filter(&mut url, "cuisine", &params.cuisine);
    append_filter(&mut url, "diet", &params.diet);
    append_filter(&mut url, "intolerances", &params.intolerances);
    append_filter(&mut url, "includeIngredients", &params.include_ingredients);
    append_filter(&mut url, "excludeIngredients", &params.exclude_ingredients);

    if let Some(max_ready_time) = params.max_ready_time {
        url.push_str(&format!("&maxReadyTime={}", max_ready_time));
    }

    url
}

/// Single upstream call, no retry. Any transport failure or non-2xx status
/// becomes `AppError::Upstream` so callers can fall back to fixtures.
async fn get_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, AppError> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .timeout(std::time::Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to reach recipe provider: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "Recipe provider error: {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to parse provider response: {}", e)))
}

pub async fn search_recipes(
    config: &Config,
    params: &SearchParams,
) -> Result<SearchResponse, AppError> {
    log::info!("🔍 Searching recipes upstream: \"{}\"", params.query);

    let url = search_url(
        &config.spoonacular_base_url,
        &config.spoonacular_api_key,
        params,
    );
    let result: SearchResponse = get_json(&url).await?;

    log::info!(
        "✅ Search returned {} of {} results",
        result.results.len(),
        result.total_results
    );

    Ok(result)
}

/// The provider's random endpoint returns `{ recipes: [...] }`; the result
/// is normalized to the search shape so clients render both the same way.
pub fn normalize_random(recipes: Vec<RecipeSummary>, number: u32) -> SearchResponse {
    SearchResponse {
        offset: 0,
        number,
        total_results: recipes.len() as i64,
        base_uri: Some(RECIPE_IMAGE_BASE.to_string()),
        results: recipes,
    }
}

pub async fn random_recipes(config: &Config, number: u32) -> Result<SearchResponse, AppError> {
    log::info!("🎲 Fetching {} random recipes upstream", number);

    let url = format!(
        "{}/recipes/random?number={}&addRecipeInformation=true&apiKey={}",
        config.spoonacular_base_url, number, config.spoonacular_api_key
    );
    let result: RandomResponse = get_json(&url).await?;

    Ok(normalize_random(result.recipes, number))
}

pub async fn recipe_details(config: &Config, recipe_id: i64) -> Result<RecipeSummary, AppError> {
    log::info!("📖 Fetching details for recipe {}", recipe_id);

    let url = format!(
        "{}/recipes/{}/information?includeNutrition=true&apiKey={}",
        config.spoonacular_base_url, recipe_id, config.spoonacular_api_key
    );

    get_json(&url).await
}

pub async fn bulk_recipe_details(
    config: &Config,
    recipe_ids: &[i64],
) -> Result<Vec<RecipeSummary>, AppError> {
    log::info!("📚 Fetching bulk details for {} recipes", recipe_ids.len());

    let ids = recipe_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let url = format!(
        "{}/recipes/informationBulk?ids={}&apiKey={}",
        config.spoonacular_base_url, ids, config.spoonacular_api_key
    );

    get_json(&url).await
}

pub async fn autocomplete(
    config: &Config,
    query: &str,
    number: u32,
) -> Result<Vec<AutocompleteSuggestion>, AppError> {
    let url = format!(
        "{}/recipes/autocomplete?query={}&number={}&apiKey={}",
        config.spoonacular_base_url,
        urlencoding::encode(query),
        number,
        config.spoonacular_api_key
    );

    get_json(&url).await
}
