pub mod favorites_service;
pub mod fixture_service;
pub mod search_history_service;
pub mod spoonacular_service;
pub mod user_service;
pub mod viewed_service;

pub use favorites_service::*;
pub use fixture_service::*;
pub use search_history_service::*;
pub use spoonacular_service::*;
pub use user_service::*;
pub use viewed_service::*;
