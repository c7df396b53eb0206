pub mod favorites;
pub mod health;
pub mod recipes;
pub mod root;
pub mod search_history;
pub mod swagger;
pub mod users;
pub mod viewed;
