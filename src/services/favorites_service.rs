use mongodb::bson::{doc, to_bson};
use std::collections::HashSet;

use crate::database::{MongoDB, FAVORITES_COLLECTION};
use crate::models::{FavoriteRecipesDoc, RecipeSummary};
use crate::utils::AppError;

/// Merges an incoming favorites list into the stored one. Any stored entry
/// sharing an id with an incoming entry is replaced (incoming wins); the
/// result is ordered incoming-first, then the surviving stored entries.
pub fn merge_favorites(
    incoming: Vec<RecipeSummary>,
    existing: Vec<RecipeSummary>,
) -> Vec<RecipeSummary> {
    let incoming_ids: HashSet<i64> = incoming.iter().map(|r| r.id).collect();

    let mut merged = incoming;
    merged.extend(
        existing
            .into_iter()
            .filter(|recipe| !incoming_ids.contains(&recipe.id)),
    );
    merged
}

pub async fn get_favorites(db: &MongoDB, auth0_id: &str) -> Result<Vec<RecipeSummary>, AppError> {
    let collection = db.collection::<FavoriteRecipesDoc>(FAVORITES_COLLECTION);

    let document = collection
        .find_one(doc! { "auth0Id": auth0_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(document.map(|d| d.recipes).unwrap_or_default())
}

pub async fn set_favorites(
    db: &MongoDB,
    auth0_id: &str,
    recipes: Vec<RecipeSummary>,
) -> Result<Vec<RecipeSummary>, AppError> {
    log::info!("📌 Setting {} favorites for user {}", recipes.len(), auth0_id);

    let existing = get_favorites(db, auth0_id).await?;
    let merged = merge_favorites(recipes, existing);

    let collection = db.collection::<FavoriteRecipesDoc>(FAVORITES_COLLECTION);
    let recipes_bson = to_bson(&merged).map_err(|e| AppError::Database(e.to_string()))?;

    collection
        .update_one(
            doc! { "auth0Id": auth0_id },
            doc! { "$set": { "recipes": recipes_bson } },
        )
        .upsert(true)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    log::info!("✅ Favorites saved. Total: {}", merged.len());

    Ok(merged)
}

/// Removes favorites by id set. Absent ids, or a user with no favorites
/// document at all, are not errors.
pub async fn remove_favorites(db: &MongoDB, auth0_id: &str, ids: &[i64]) -> Result<(), AppError> {
    log::info!("🗑️  Removing favorites {:?} for user {}", ids, auth0_id);

    let collection = db.collection::<FavoriteRecipesDoc>(FAVORITES_COLLECTION);

    collection
        .update_one(
            doc! { "auth0Id": auth0_id },
            doc! { "$pull": { "recipes": { "id": { "$in": ids.to_vec() } } } },
        )
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i64, title: &str) -> RecipeSummary {
        RecipeSummary {
            id,
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_replaces_matching_id() {
        let existing = vec![recipe(1, "Old Lasagna"), recipe(2, "Ramen")];
        let incoming = vec![recipe(1, "New Lasagna")];

        let merged = merge_favorites(incoming, existing);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "New Lasagna");
        assert_eq!(merged[1].id, 2);
        assert_eq!(merged.iter().filter(|r| r.id == 1).count(), 1);
    }

    #[test]
    fn test_merge_orders_incoming_first() {
        let existing = vec![recipe(10, "Stored A"), recipe(11, "Stored B")];
        let incoming = vec![recipe(20, "Fresh A"), recipe(21, "Fresh B")];

        let merged = merge_favorites(incoming, existing);

        let ids: Vec<i64> = merged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![20, 21, 10, 11]);
    }

    #[test]
    fn test_merge_into_empty() {
        let merged = merge_favorites(vec![recipe(5, "Solo")], Vec::new());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, 5);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_set_and_remove_roundtrip() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/recipe-finder-test".to_string());
        let db = MongoDB::connect(&uri).await.expect("connection failed");
        let user = "auth0|favorites-service-test";

        set_favorites(&db, user, vec![recipe(1, "A"), recipe(2, "B")])
            .await
            .unwrap();
        set_favorites(&db, user, vec![recipe(1, "A2")]).await.unwrap();

        let favorites = get_favorites(&db, user).await.unwrap();
        assert_eq!(favorites.iter().filter(|r| r.id == 1).count(), 1);
        assert_eq!(favorites[0].title, "A2");

        // Absent ids must not error
        remove_favorites(&db, user, &[1, 2, 999]).await.unwrap();
        assert!(get_favorites(&db, user).await.unwrap().is_empty());
    }
}
