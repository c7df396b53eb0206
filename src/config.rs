use std::env;

pub const APP_NAME: &str = "Recipe Finder";

/// Runtime configuration, loaded once at startup and shared via `web::Data`.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: String,
    pub mongodb_uri: String,
    pub spoonacular_base_url: String,
    pub spoonacular_api_key: String,
    pub auth0_domain: String,
    pub auth0_issuer: String,
    pub auth0_audience: String,
    pub use_mock_data: bool,
    pub mock_data_path: String,
    pub mock_recipe_details_path: String,
}

const REQUIRED_ENV_VARS: &[&str] = &[
    "API_RECIPE_KEY",
    "SPOONACULAR_BASE_URL",
    "AUTH0_AUDIENCE",
    "AUTH0_DOMAIN",
    "AUTH0_ISSUER",
    "USE_MOCK_DATA",
    "MOCK_DATA_PATH",
];

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Loads configuration from the environment. Returns the full list of
    /// missing required variables so startup can report them all at once.
    pub fn from_env() -> Result<Self, String> {
        let missing: Vec<&str> = REQUIRED_ENV_VARS
            .iter()
            .filter(|key| env::var(key).map(|v| v.trim().is_empty()).unwrap_or(true))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        let mock_data_path = get_env("MOCK_DATA_PATH", "mock/recipes.json");

        Ok(Self {
            host: get_env("HOST", "0.0.0.0"),
            port: get_env("PORT", "3000"),
            mongodb_uri: get_env("MONGODB_URI", "mongodb://localhost:27017/recipe-finder-db"),
            spoonacular_base_url: get_env("SPOONACULAR_BASE_URL", "https://api.spoonacular.com"),
            spoonacular_api_key: get_env("API_RECIPE_KEY", ""),
            auth0_domain: get_env("AUTH0_DOMAIN", ""),
            auth0_issuer: get_env("AUTH0_ISSUER", ""),
            auth0_audience: get_env("AUTH0_AUDIENCE", ""),
            use_mock_data: get_env("USE_MOCK_DATA", "false") == "true",
            mock_recipe_details_path: get_env(
                "MOCK_RECIPE_DETAILS_PATH",
                "mock/recipes-details.json",
            ),
            mock_data_path,
        })
    }
}
