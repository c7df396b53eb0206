use serde::Deserialize;
use std::fs;

use crate::config::Config;
use crate::models::{AutocompleteSuggestion, RecipeSummary};
use crate::services::spoonacular_service::{normalize_random, SearchResponse};

#[derive(Debug, Deserialize, Default)]
struct DetailsFixture {
    #[serde(default)]
    recipes: Vec<RecipeSummary>,
}

/// Static fallback data served when the upstream provider fails or mock
/// mode is forced. Loaded once at boot and shared via `web::Data`.
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    search: Option<SearchResponse>,
    details: Vec<RecipeSummary>,
}

impl FixtureStore {
    /// Best-effort load; a missing file is only fatal when mock mode is on,
    /// which `main` checks via `has_search_data`.
    pub fn load(config: &Config) -> Self {
        let search = match fs::read_to_string(&config.mock_data_path) {
            Ok(raw) => match serde_json::from_str::<SearchResponse>(&raw) {
                Ok(data) => {
                    log::info!("Mock data loaded from {}", config.mock_data_path);
                    Some(data)
                }
                Err(e) => {
                    log::warn!("Failed to parse mock data {}: {}", config.mock_data_path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to load mock data {}: {}", config.mock_data_path, e);
                None
            }
        };

        let details = match fs::read_to_string(&config.mock_recipe_details_path) {
            Ok(raw) => match serde_json::from_str::<DetailsFixture>(&raw) {
                Ok(data) => {
                    log::info!(
                        "Mock recipe details loaded from {}",
                        config.mock_recipe_details_path
                    );
                    data.recipes
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse mock recipe details {}: {}",
                        config.mock_recipe_details_path,
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) => {
                log::warn!(
                    "Failed to load mock recipe details {}: {}",
                    config.mock_recipe_details_path,
                    e
                );
                Vec::new()
            }
        };

        Self { search, details }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(search: Option<SearchResponse>, details: Vec<RecipeSummary>) -> Self {
        Self { search, details }
    }

    pub fn has_search_data(&self) -> bool {
        self.search.is_some()
    }

    pub fn search_fallback(&self) -> Option<SearchResponse> {
        self.search.clone()
    }

    pub fn random_fallback(&self, number: u32) -> Option<SearchResponse> {
        self.search.as_ref().map(|fixture| {
            let picked: Vec<RecipeSummary> = fixture
                .results
                .iter()
                .take(number as usize)
                .cloned()
                .collect();
            normalize_random(picked, number)
        })
    }

    /// Fixture recipe with the matching id, else the first fixture recipe
    /// re-stamped with the requested id so the client still gets a details
    /// payload for whatever it asked about.
    pub fn details_fallback(&self, recipe_id: i64) -> Option<RecipeSummary> {
        self.details
            .iter()
            .find(|r| r.id == recipe_id)
            .cloned()
            .or_else(|| {
                self.details.first().cloned().map(|mut recipe| {
                    recipe.id = recipe_id;
                    recipe
                })
            })
    }

    pub fn bulk_fallback(&self, recipe_ids: &[i64]) -> Vec<RecipeSummary> {
        self.details
            .iter()
            .filter(|r| recipe_ids.contains(&r.id))
            .cloned()
            .collect()
    }

    /// Suggestions synthesized from the search fixture by title substring.
    pub fn autocomplete_fallback(&self, query: &str, number: u32) -> Vec<AutocompleteSuggestion> {
        let needle = query.to_lowercase();
        self.search
            .as_ref()
            .map(|fixture| {
                fixture
                    .results
                    .iter()
                    .filter(|r| r.title.to_lowercase().contains(&needle))
                    .take(number as usize)
                    .map(|r| AutocompleteSuggestion {
                        id: r.id,
                        title: r.title.clone(),
                        image_type: r.image_type.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
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

    fn store() -> FixtureStore {
        FixtureStore {
            search: Some(SearchResponse {
                results: vec![
                    recipe(101, "Pasta Carbonara"),
                    recipe(102, "Pasta Primavera"),
                    recipe(103, "Beef Stew"),
                ],
                offset: 0,
                number: 10,
                total_results: 3,
                base_uri: None,
            }),
            details: vec![recipe(101, "Pasta Carbonara"), recipe(103, "Beef Stew")],
        }
    }

    #[test]
    fn test_details_fallback_matches_by_id() {
        let found = store().details_fallback(103).unwrap();
        assert_eq!(found.id, 103);
        assert_eq!(found.title, "Beef Stew");
    }

    #[test]
    fn test_details_fallback_restamps_unknown_id() {
        let found = store().details_fallback(999).unwrap();
        assert_eq!(found.id, 999);
        assert_eq!(found.title, "Pasta Carbonara");
    }

    #[test]
    fn test_details_fallback_empty_store() {
        let empty = FixtureStore::default();
        assert!(empty.details_fallback(1).is_none());
    }

    #[test]
    fn test_bulk_fallback_filters_by_id_set() {
        let found = store().bulk_fallback(&[103, 999]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 103);
    }

    #[test]
    fn test_random_fallback_caps_at_number() {
        let response = store().random_fallback(2).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.number, 2);
    }

    #[test]
    fn test_autocomplete_fallback_title_match() {
        let suggestions = store().autocomplete_fallback("pasta", 10);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|s| s.title.contains("Pasta")));

        let none = store().autocomplete_fallback("sushi", 10);
        assert!(none.is_empty());
    }
}
