use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::RecipeSummary;
use crate::services::favorites_service;

#[derive(Deserialize)]
pub struct FavoritesRequest {
    #[serde(default)]
    pub recipes: Vec<RecipeSummary>,
}

/// GET /api/recipes/favorites
pub async fn get_favorites(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match favorites_service::get_favorites(&db, &user.sub).await {
        Ok(recipes) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "recipes": recipes
        })),
        Err(e) => {
            log::error!("❌ Error fetching favorites: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

/// POST /api/recipes/favorites
///
/// Soft write: a database failure is reported as a 200 with `offline: true`
/// so the client keeps its local state instead of surfacing an error.
pub async fn set_favorites(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<FavoritesRequest>,
) -> HttpResponse {
    let recipes = body.into_inner().recipes;

    if recipes.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "recipes must be a non-empty array"
        }));
    }

    let recipe_ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();

    match favorites_service::set_favorites(&db, &user.sub, recipes).await {
        Ok(merged) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!(
                "Recipes {:?} set as favorite for user {}",
                recipe_ids, user.sub
            ),
            "recipes": merged
        })),
        Err(e) => {
            log::error!("❌ Error saving favorites: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Favorites recorded (database offline)",
                "offline": true
            }))
        }
    }
}

/// DELETE /api/recipes/favorites — ids are derived from the posted recipe
/// snapshots; absent ids never error.
pub async fn remove_favorites(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<FavoritesRequest>,
) -> HttpResponse {
    let recipes = body.into_inner().recipes;

    if recipes.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "recipes must be a non-empty array"
        }));
    }

    let recipe_ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();

    match favorites_service::remove_favorites(&db, &user.sub, &recipe_ids).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!(
                "Recipes {:?} removed from favorites for user {}",
                recipe_ids, user.sub
            ),
            "recipeIds": recipe_ids
        })),
        Err(e) => {
            log::error!("❌ Error removing favorites: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Favorites recorded (database offline)",
                "offline": true
            }))
        }
    }
}
