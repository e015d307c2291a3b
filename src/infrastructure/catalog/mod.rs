//! Device catalog adapters

pub mod cpal_catalog;

pub use cpal_catalog::CpalCatalog;
