pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod extraction;
pub mod llm;
pub mod models;
