pub mod config;
pub mod series;
