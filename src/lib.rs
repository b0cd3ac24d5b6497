pub mod comparison;
pub mod config;
pub mod http_cache;
pub mod http_client;
pub mod league_changes;
pub mod season;
pub mod season_fetch;
pub mod state;
pub mod table;
