pub mod ai_provider;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod generator;
pub mod interactive;
pub mod render;
pub mod search;
