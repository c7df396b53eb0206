use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Snapshot of an upstream recipe, as returned by the provider and as cached
/// inside the favorites/viewed documents. Only `id` and `title` are
/// guaranteed; any provider field not modeled here is preserved in `extra`
/// so snapshots round-trip without loss.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gluten_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dairy_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub very_healthy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub very_popular: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_serving: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Search parameters accepted by the search endpoint and recorded in a
/// user's search history. Mirrors the upstream provider's filter set.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dish_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intolerances: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ready_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_ingredients: Option<String>,
}

/// Suggestion entry returned by the autocomplete endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteSuggestion {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
}
