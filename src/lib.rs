pub mod browser;
pub mod config;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod overlap;
pub mod parser;
pub mod selectors;
pub mod utils;
pub mod verychic;
pub mod voyageprive;
