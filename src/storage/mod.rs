//! Storage module for lifesupport.
//!
//! Persists the activated players and excluded zones as one JSON data file.

pub mod models;
pub mod store;

pub use models::PluginData;
pub use store::DataStore;
