//! # Wetmap Common Library
//!
//! Shared code for the wetland classification workflow:
//! - Error types
//! - The fixed wetland class table
//! - Event types (WetmapEvent enum) and EventBus
//! - Configuration loading

pub mod classes;
pub mod config;
pub mod error;
pub mod events;

pub use classes::{class_by_id, WetlandClass, WETLAND_CLASSES};
pub use error::{Error, Result};
