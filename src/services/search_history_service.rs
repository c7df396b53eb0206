use chrono::Utc;
use mongodb::bson::{doc, to_bson, Document};
use uuid::Uuid;

use crate::database::{MongoDB, SEARCH_HISTORY_COLLECTION};
use crate::models::{SearchHistoryDoc, SearchHistoryEntry, SearchParams};
use crate::utils::AppError;

/// Hard cap on stored searches per user; the oldest entries fall off.
pub const SEARCH_HISTORY_LIMIT: i32 = 50;

/// `$position: 0` keeps the list newest-first, `$slice` enforces the cap
/// server-side in the same atomic update.
fn push_entry_update(entry: &SearchHistoryEntry) -> Result<Document, AppError> {
    let entry_bson = to_bson(entry).map_err(|e| AppError::Database(e.to_string()))?;

    Ok(doc! {
        "$push": {
            "searchQueries": {
                "$each": [entry_bson],
                "$position": 0,
                "$slice": SEARCH_HISTORY_LIMIT,
            }
        }
    })
}

pub async fn add_search(
    db: &MongoDB,
    auth0_id: &str,
    params: SearchParams,
) -> Result<SearchHistoryEntry, AppError> {
    let entry = SearchHistoryEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        params,
    };

    log::info!(
        "🕘 Recording search \"{}\" for user {}",
        entry.params.query,
        auth0_id
    );

    let collection = db.collection::<SearchHistoryDoc>(SEARCH_HISTORY_COLLECTION);

    collection
        .update_one(doc! { "auth0Id": auth0_id }, push_entry_update(&entry)?)
        .upsert(true)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(entry)
}

/// Removes one entry by its server-assigned id; absent ids are not errors.
pub async fn remove_search(db: &MongoDB, auth0_id: &str, entry_id: &str) -> Result<(), AppError> {
    log::info!("🗑️  Removing search {} for user {}", entry_id, auth0_id);

    let collection = db.collection::<SearchHistoryDoc>(SEARCH_HISTORY_COLLECTION);

    collection
        .update_one(
            doc! { "auth0Id": auth0_id },
            doc! { "$pull": { "searchQueries": { "id": entry_id } } },
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(())
}

pub async fn get_search_history(
    db: &MongoDB,
    auth0_id: &str,
) -> Result<Vec<SearchHistoryEntry>, AppError> {
    let collection = db.collection::<SearchHistoryDoc>(SEARCH_HISTORY_COLLECTION);

    let document = collection
        .find_one(doc! { "auth0Id": auth0_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(document.map(|d| d.search_queries).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(query: &str) -> SearchHistoryEntry {
        SearchHistoryEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            params: SearchParams {
                query: query.to_string(),
                cuisine: Some("italian".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_push_update_caps_at_limit() {
        let update = push_entry_update(&entry("pasta")).unwrap();
        let push = update.get_document("$push").unwrap();
        let queries = push.get_document("searchQueries").unwrap();

        assert_eq!(queries.get_i32("$position").unwrap(), 0);
        assert_eq!(queries.get_i32("$slice").unwrap(), 50);
        assert_eq!(queries.get_array("$each").unwrap().len(), 1);
    }

    #[test]
    fn test_push_update_flattens_params() {
        let update = push_entry_update(&entry("pasta")).unwrap();
        let pushed = update
            .get_document("$push")
            .unwrap()
            .get_document("searchQueries")
            .unwrap()
            .get_array("$each")
            .unwrap()[0]
            .as_document()
            .unwrap()
            .clone();

        // Server-assigned fields sit next to the flattened client params.
        assert!(pushed.get_str("id").is_ok());
        assert!(pushed.get("timestamp").is_some());
        assert_eq!(pushed.get_str("query").unwrap(), "pasta");
        assert_eq!(pushed.get_str("cuisine").unwrap(), "italian");
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_history_never_exceeds_cap() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/recipe-finder-test".to_string());
        let db = MongoDB::connect(&uri).await.expect("connection failed");
        let user = "auth0|search-history-service-test";

        for i in 0..60 {
            add_search(
                &db,
                user,
                SearchParams {
                    query: format!("query-{}", i),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        let history = get_search_history(&db, user).await.unwrap();
        assert_eq!(history.len(), 50);
        // Newest first; the earliest ten queries fell off.
        assert_eq!(history[0].params.query, "query-59");
        assert_eq!(history[49].params.query, "query-10");
    }
}
