use chrono::Utc;
use mongodb::bson::{doc, to_bson, Document};

use crate::database::{MongoDB, VIEWED_COLLECTION};
use crate::models::{RecipeSummary, ViewedRecipe, ViewedRecipesDoc};
use crate::utils::AppError;

fn pull_recipe_update(recipe_id: i64) -> Document {
    doc! { "$pull": { "recipes": { "id": recipe_id } } }
}

fn push_front_update(entry: &ViewedRecipe) -> Result<Document, AppError> {
    let entry_bson = to_bson(entry).map_err(|e| AppError::Database(e.to_string()))?;

    Ok(doc! {
        "$push": {
            "recipes": {
                "$each": [entry_bson],
                "$position": 0,
            }
        }
    })
}

/// Pull-then-push: any stale copy of the recipe is removed before the fresh
/// snapshot lands at the head of the list, so the list holds at most one
/// entry per recipe id and stays most-recent-first. No length cap.
pub async fn mark_viewed(
    db: &MongoDB,
    auth0_id: &str,
    recipe: RecipeSummary,
) -> Result<ViewedRecipe, AppError> {
    log::info!("👁️  Marking recipe {} viewed for user {}", recipe.id, auth0_id);

    let collection = db.collection::<ViewedRecipesDoc>(VIEWED_COLLECTION);

    collection
        .update_one(doc! { "auth0Id": auth0_id }, pull_recipe_update(recipe.id))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let entry = ViewedRecipe {
        viewed_at: Utc::now(),
        recipe,
    };

    collection
        .update_one(doc! { "auth0Id": auth0_id }, push_front_update(&entry)?)
        .upsert(true)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(entry)
}

pub async fn get_viewed(db: &MongoDB, auth0_id: &str) -> Result<Vec<ViewedRecipe>, AppError> {
    let collection = db.collection::<ViewedRecipesDoc>(VIEWED_COLLECTION);

    let document = collection
        .find_one(doc! { "auth0Id": auth0_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(document.map(|d| d.recipes).unwrap_or_default())
}

pub async fn viewed_count(db: &MongoDB, auth0_id: &str) -> Result<usize, AppError> {
    Ok(get_viewed(db, auth0_id).await?.len())
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
    fn test_pull_update_targets_recipe_id() {
        let update = pull_recipe_update(42);
        let pulled = update
            .get_document("$pull")
            .unwrap()
            .get_document("recipes")
            .unwrap();
        assert_eq!(pulled.get_i64("id").unwrap(), 42);
    }

    #[test]
    fn test_push_update_inserts_at_head() {
        let entry = ViewedRecipe {
            viewed_at: Utc::now(),
            recipe: recipe(42, "Goulash"),
        };

        let update = push_front_update(&entry).unwrap();
        let pushed = update
            .get_document("$push")
            .unwrap()
            .get_document("recipes")
            .unwrap();

        assert_eq!(pushed.get_i32("$position").unwrap(), 0);
        let snapshot = pushed.get_array("$each").unwrap()[0].as_document().unwrap();
        assert_eq!(snapshot.get_i64("id").unwrap(), 42);
        assert!(snapshot.get("viewedAt").is_some());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_repeat_views_never_duplicate() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/recipe-finder-test".to_string());
        let db = MongoDB::connect(&uri).await.expect("connection failed");
        let user = "auth0|viewed-service-test";

        mark_viewed(&db, user, recipe(1, "First")).await.unwrap();
        mark_viewed(&db, user, recipe(2, "Second")).await.unwrap();
        mark_viewed(&db, user, recipe(1, "First again")).await.unwrap();

        let viewed = get_viewed(&db, user).await.unwrap();
        assert_eq!(viewed.len(), 2);
        assert_eq!(viewed[0].recipe.id, 1);
        assert_eq!(viewed[1].recipe.id, 2);
        assert_eq!(viewed_count(&db, user).await.unwrap(), 2);
    }
}
