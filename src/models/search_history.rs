use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::SearchParams;

/// A past search: the client's parameters plus a server-assigned id and
/// timestamp. The id is what the removal endpoint is keyed on.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub params: SearchParams,
}

/// One document per user, `search_queries` capped at 50, newest first.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub auth0_id: String,
    #[serde(default)]
    pub search_queries: Vec<SearchHistoryEntry>,
}
