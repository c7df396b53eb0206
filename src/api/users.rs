use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::user_service;
use crate::utils::is_blank;

#[derive(Deserialize)]
pub struct SyncUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// POST /api/users — called by the client right after login.
pub async fn sync_user(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<SyncUserRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    if is_blank(request.email.as_deref()) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Missing required user data"
        }));
    }

    let email = request.email.unwrap_or_default();

    match user_service::upsert_user(&db, &user.sub, &email, request.name.as_deref()).await {
        Ok(synced) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": synced
        })),
        Err(e) => {
            log::error!("❌ Error syncing user: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

/// GET /api/users/me
pub async fn get_me(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match user_service::get_user(&db, &user.sub).await {
        Ok(Some(found)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": found
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "User not found"
        })),
        Err(e) => {
            log::error!("❌ Error fetching user: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}
