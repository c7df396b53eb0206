use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::RecipeSummary;
use crate::services::viewed_service;

#[derive(Deserialize)]
pub struct MarkViewedRequest {
    pub recipe: RecipeSummary,
}

/// GET /api/recipes/viewed
pub async fn get_viewed(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match viewed_service::get_viewed(&db, &user.sub).await {
        Ok(recipes) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "recipes": recipes
        })),
        Err(e) => {
            log::error!("❌ Error fetching viewed recipes: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

/// POST /api/recipes/viewed
pub async fn mark_viewed(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<MarkViewedRequest>,
) -> HttpResponse {
    let recipe = body.into_inner().recipe;

    match viewed_service::mark_viewed(&db, &user.sub, recipe).await {
        Ok(entry) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "recipe": entry
        })),
        Err(e) => {
            log::error!("❌ Error marking recipe viewed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

/// GET /api/recipes/viewed/count
pub async fn viewed_count(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match viewed_service::viewed_count(&db, &user.sub).await {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "count": count
        })),
        Err(e) => {
            log::error!("❌ Error counting viewed recipes: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}
