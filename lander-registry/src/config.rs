use lander_types::SectionType;
use lander_validation::ValidationConfig;
use serde::{Deserialize, Serialize};

/// Which sections a registry loads and manages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryScope {
    /// The whole landing page.
    #[default]
    All,
    /// A single type, e.g. an editor page for product grids. Cross-record
    /// checks then only see sections of that type.
    Only(SectionType),
}

impl RegistryScope {
    /// Type filter passed to the store when listing.
    pub fn filter(&self) -> Option<SectionType> {
        match self {
            Self::All => None,
            Self::Only(t) => Some(*t),
        }
    }

    pub fn includes(&self, section_type: SectionType) -> bool {
        self.filter().is_none_or(|t| t == section_type)
    }
}

/// Registry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub scope: RegistryScope,
    /// Fixed display order of hero sections.
    pub hero_order: u32,
    pub faq_title: String,
    pub testimonials_title: String,
    pub validation: ValidationConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            scope: RegistryScope::All,
            hero_order: 1,
            faq_title: "FAQ".to_string(),
            testimonials_title: "Testimonials".to_string(),
            validation: ValidationConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Title assigned by the system for singleton types.
    pub fn system_title(&self, section_type: SectionType) -> Option<&str> {
        match section_type {
            SectionType::Faq => Some(&self.faq_title),
            SectionType::Testimonials => Some(&self.testimonials_title),
            _ => None,
        }
    }
}
