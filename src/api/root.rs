use actix_web::{web, HttpResponse, Responder};

use crate::config::APP_NAME;
use crate::middleware::auth::Claims;

pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome to {}", APP_NAME)
    }))
}

/// Sanity probe for the auth gate; reaching it at all means the bearer
/// token passed verification.
pub async fn protected_probe(user: web::ReqData<Claims>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("You have accessed a protected route in {}", APP_NAME),
        "sub": user.sub,
    }))
}
