use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::SearchParams;
use crate::services::search_history_service;
use crate::utils::is_blank;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSearchHistoryRequest {
    pub search_query: SearchParams,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSearchHistoryRequest {
    pub search_query_id: String,
}

/// GET /api/recipes/search-history
pub async fn get_search_history(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    match search_history_service::get_search_history(&db, &user.sub).await {
        Ok(entries) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "searchHistory": entries
        })),
        Err(e) => {
            log::error!("❌ Error fetching search history: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

/// POST /api/recipes/search-history — soft write, `offline: true` on
/// database failure.
pub async fn add_search_history(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<AddSearchHistoryRequest>,
) -> HttpResponse {
    let params = body.into_inner().search_query;

    if is_blank(Some(&params.query)) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "searchQuery.query must not be empty"
        }));
    }

    match search_history_service::add_search(&db, &user.sub, params).await {
        Ok(entry) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "searchQuery": entry
        })),
        Err(e) => {
            log::error!("❌ Error saving search history: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Search history recorded (database offline)",
                "offline": true
            }))
        }
    }
}

/// DELETE /api/recipes/search-history — soft write as well.
pub async fn remove_search_history(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    body: web::Json<RemoveSearchHistoryRequest>,
) -> HttpResponse {
    let entry_id = body.into_inner().search_query_id;

    if is_blank(Some(&entry_id)) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "searchQueryId must not be empty"
        }));
    }

    match search_history_service::remove_search(&db, &user.sub, &entry_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "searchQueryId": entry_id
        })),
        Err(e) => {
            log::error!("❌ Error removing search history: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Search history removal recorded (database offline)",
                "offline": true
            }))
        }
    }
}
