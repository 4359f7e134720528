pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod field;
pub mod matcher;
pub mod merger;
pub mod module;
pub mod name;
pub mod types;
