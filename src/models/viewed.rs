use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::RecipeSummary;

/// A viewed-recipe snapshot with the server-assigned view timestamp.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ViewedRecipe {
    pub viewed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub recipe: RecipeSummary,
}

/// One document per user, newest view first, deduplicated by recipe id.
/// Unbounded: unlike search history there is no cap on this list.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ViewedRecipesDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub auth0_id: String,
    #[serde(default)]
    pub recipes: Vec<ViewedRecipe>,
}
