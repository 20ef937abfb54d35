//! Catalog of standard physical dimensions built on `measure-model`.

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;

pub use crate::catalog::{
    AVAILABLE_LOCALES, CATALOG_NAME, build, declaration, declaration_from_toml_str, isq,
    load_framework,
};
pub use crate::config::CatalogConfig;
pub use crate::error::{Result, StandardsError};
