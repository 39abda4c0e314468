pub mod charts;
pub mod clean;
pub mod config;
pub mod eda;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod render;
pub mod tables;
