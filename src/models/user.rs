use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Profile synced from the identity provider after login.
/// `auth0_id` is the primary identifier (unique index).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub auth0_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
