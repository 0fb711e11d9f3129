pub mod config;
pub mod error;
pub mod media_models;
pub mod recording_result;
pub mod state;
