use mongodb::bson::{doc, to_bson};
use mongodb::options::ReturnDocument;

use crate::database::{MongoDB, USERS_COLLECTION};
use crate::models::User;
use crate::utils::AppError;

/// Explicit upsert-on-login: one atomic operation keyed on the token
/// subject, so concurrent first logins cannot race a check-then-write.
pub async fn upsert_user(
    db: &MongoDB,
    auth0_id: &str,
    email: &str,
    name: Option<&str>,
) -> Result<User, AppError> {
    log::info!("👤 Syncing user {}", auth0_id);

    let collection = db.collection::<User>(USERS_COLLECTION);
    let name_bson = to_bson(&name).map_err(|e| AppError::Database(e.to_string()))?;

    let user = collection
        .find_one_and_update(
            doc! { "auth0Id": auth0_id },
            doc! { "$set": { "email": email, "name": name_bson } },
        )
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::Database("User upsert returned no document".to_string()))?;

    Ok(user)
}

pub async fn get_user(db: &MongoDB, auth0_id: &str) -> Result<Option<User>, AppError> {
    let collection = db.collection::<User>(USERS_COLLECTION);

    collection
        .find_one(doc! { "auth0Id": auth0_id })
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_upsert_then_update() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/recipe-finder-test".to_string());
        let db = MongoDB::connect(&uri).await.expect("connection failed");
        let auth0_id = "auth0|user-service-test";

        let created = upsert_user(&db, auth0_id, "first@example.com", Some("First"))
            .await
            .unwrap();
        assert_eq!(created.email, "first@example.com");

        let updated = upsert_user(&db, auth0_id, "second@example.com", None)
            .await
            .unwrap();
        assert_eq!(updated.auth0_id, auth0_id);
        assert_eq!(updated.email, "second@example.com");

        let fetched = get_user(&db, auth0_id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "second@example.com");
    }
}
