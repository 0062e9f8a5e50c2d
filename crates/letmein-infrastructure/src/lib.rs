pub mod config_service;
pub mod http_game_api;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::http_game_api::HttpGameApi;
pub use crate::paths::LetmeinPaths;
pub use crate::storage::FileKeyValueStore;
