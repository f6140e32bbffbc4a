//! Validation layer for lander.
//!
//! Every function here is pure: it reads its inputs and returns a
//! [`FieldErrors`] map. Nothing is mutated, and callers decide whether a
//! non-empty map blocks the operation or only warns.
//!
//! - [`validate_section`]: fields, cross-record uniqueness and config rules
//! - [`validate_section_fields`]: the same without config minimums
//! - [`validate_config`] / [`validate_config_items`]: payload rules
//! - [`validate_item`] / [`validate_items`]: embedded item rules

mod config;
mod item;
mod section;

pub use config::{validate_config, validate_config_items};
pub use item::{ValidateItem, validate_item, validate_items};
pub use lander_types::{ErrorCode, FieldErrors};
pub use section::{validate_section, validate_section_fields};

use serde::{Deserialize, Serialize};

/// Tunable limits applied by the validators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_product_count: u32,
    pub max_product_count: u32,
    pub min_autoplay_delay_ms: u32,
    pub min_hero_slides: usize,
    pub min_faq_items: usize,
    pub min_testimonials: usize,
    pub min_rating: u8,
    pub max_rating: u8,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_product_count: 1,
            max_product_count: 50,
            min_autoplay_delay_ms: 1000,
            min_hero_slides: 1,
            min_faq_items: 1,
            min_testimonials: 0,
            min_rating: 1,
            max_rating: 5,
        }
    }
}

/// Field names used as error-map keys.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DISPLAY_ORDER: &str = "displayOrder";
    pub const PRODUCT_COUNT: &str = "productCount";
    pub const SOURCE_VALUE: &str = "sourceValue";
    pub const CONFIG: &str = "config";
    pub const AUTOPLAY_DELAY: &str = "autoplayDelayMs";
    pub const ORDER: &str = "order";
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
