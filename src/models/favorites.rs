use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::RecipeSummary;

/// One document per user. `recipes` holds full snapshots, ordered
/// newest-insertion-first, never two entries with the same recipe id.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecipesDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub auth0_id: String,
    #[serde(default)]
    pub recipes: Vec<RecipeSummary>,
}
