use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorInternalServerError, ErrorUnauthorized},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Mutex;

use crate::config::Config;

/// Verified claims of the bearer token. `sub` is the Auth0 subject and the
/// key every per-user collection is partitioned by.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Debug, Deserialize, Clone)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

lazy_static! {
    // kid -> key, filled on first use. Signing keys rotate rarely; an
    // unknown kid triggers a refetch of the whole set.
    static ref JWKS_CACHE: Mutex<HashMap<String, Jwk>> = Mutex::new(HashMap::new());
}

pub(crate) fn extract_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn fetch_jwks(domain: &str) -> Result<Vec<Jwk>, String> {
    let url = format!("https://{}/.well-known/jwks.json", domain);

    let response = reqwest::Client::new()
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("Failed to fetch JWKS: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("JWKS endpoint error: {}", response.status()));
    }

    let set: JwkSet = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse JWKS: {}", e))?;

    Ok(set.keys)
}

async fn resolve_jwk(domain: &str, kid: &str) -> Result<Jwk, String> {
    if let Some(jwk) = JWKS_CACHE.lock().unwrap().get(kid).cloned() {
        return Ok(jwk);
    }

    let keys = fetch_jwks(domain).await?;
    let mut cache = JWKS_CACHE.lock().unwrap();
    for key in keys {
        cache.insert(key.kid.clone(), key);
    }

    cache
        .get(kid)
        .cloned()
        .ok_or_else(|| format!("No JWKS key matches kid {}", kid))
}

/// Full RS256 verification: signature against the issuer's JWKS, plus
/// issuer, audience and expiry checks.
pub async fn verify_token(config: &Config, token: &str) -> Result<Claims, String> {
    let header = decode_header(token).map_err(|e| format!("Invalid token header: {}", e))?;
    let kid = header.kid.ok_or("Token header missing kid")?;

    let jwk = resolve_jwk(&config.auth0_domain, &kid).await?;
    let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
        .map_err(|e| format!("Invalid JWKS key material: {}", e))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[&config.auth0_issuer]);
    validation.set_audience(&[&config.auth0_audience]);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Token validation failed: {}", e))
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(extract_bearer)
                .map(str::to_owned);

            let token = match token {
                Some(token) => token,
                None => return Err(ErrorUnauthorized("Missing authorization token")),
            };

            let config = req
                .app_data::<web::Data<Config>>()
                .cloned()
                .ok_or_else(|| ErrorInternalServerError("Configuration not available"))?;

            match verify_token(&config, &token).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await
                }
                Err(e) => {
                    log::warn!("🔒 Rejected bearer token: {}", e);
                    Err(ErrorUnauthorized("Invalid or expired token"))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App, HttpResponse};

    #[::core::prelude::v1::test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Basic abc"), None);
        assert_eq!(extract_bearer("abc.def.ghi"), None);
    }

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: "0".to_string(),
            mongodb_uri: "mongodb://localhost:27017/recipe-finder-test".to_string(),
            spoonacular_base_url: "https://api.example.com".to_string(),
            spoonacular_api_key: "test-key".to_string(),
            auth0_domain: "example.auth0.com".to_string(),
            auth0_issuer: "https://example.auth0.com/".to_string(),
            auth0_audience: "recipe-api".to_string(),
            use_mock_data: false,
            mock_data_path: "mock/recipes.json".to_string(),
            mock_recipe_details_path: "mock/recipes-details.json".to_string(),
        }
    }

    async fn probe() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .service(
                    web::resource("/guarded")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(probe)),
                ),
        )
        .await;

        let req = test::TestRequest::get().uri("/guarded").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_malformed_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .service(
                    web::resource("/guarded")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(probe)),
                ),
        )
        .await;

        // Not a JWT at all: rejected while parsing the header, before any
        // JWKS lookup happens.
        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}
