use crate::codec::{self, CodecError, CodecResult};
use crate::config::SectionConfig;
use chrono::{DateTime, Utc};
use lander_ordering::Ordered;
use lander_types::{SectionId, SectionPayload, SectionRecord, SectionStatus, SectionType};

/// A section with its config decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub section_type: SectionType,
    pub title: String,
    pub description: String,
    pub display_order: u32,
    pub is_active: bool,
    pub status: SectionStatus,
    pub source_type: Option<String>,
    pub source_value: Option<String>,
    pub product_count: Option<u32>,
    pub config: SectionConfig,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Section {
    /// Decodes a store record.
    pub fn from_record(record: SectionRecord) -> Self {
        let config = codec::decode(record.section_type, &record.config);
        Self {
            id: record.id,
            section_type: record.section_type,
            title: record.title,
            description: record.description,
            display_order: record.display_order,
            is_active: record.is_active,
            status: record.status,
            source_type: record.source_type,
            source_value: record.source_value,
            product_count: record.product_count,
            config,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Builds the body sent to the store, encoding the config.
    pub fn to_payload(&self) -> CodecResult<SectionPayload> {
        if !self.config.fits(self.section_type) {
            return Err(CodecError::Mismatch(self.section_type));
        }
        Ok(SectionPayload {
            section_type: self.section_type,
            title: self.title.clone(),
            description: self.description.clone(),
            display_order: self.display_order,
            is_active: self.is_active,
            status: self.status,
            source_type: self.source_type.clone(),
            source_value: self.source_value.clone(),
            product_count: self.product_count,
            config: codec::encode(&self.config)?,
        })
    }

    pub fn is_published(&self) -> bool {
        self.status.is_published()
    }

    /// Title as compared for uniqueness: trimmed, lowercased.
    pub fn title_key(&self) -> String {
        self.title.trim().to_lowercase()
    }

    /// Trimmed source reference, if any.
    pub fn source_key(&self) -> Option<&str> {
        self.source_value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Ordered for Section {
    type Key = SectionId;

    fn key(&self) -> &SectionId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.display_order
    }

    fn set_order(&mut self, order: u32) {
        self.display_order = order;
    }

    fn is_pinned(&self) -> bool {
        !self.section_type.is_orderable()
    }
}

/// Input for creating a section. Start from [`NewSection::defaults`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSection {
    pub section_type: SectionType,
    pub title: String,
    pub description: String,
    /// `None` lets the registry assign the next free order.
    pub display_order: Option<u32>,
    pub is_active: bool,
    pub source_type: Option<String>,
    pub source_value: Option<String>,
    pub product_count: Option<u32>,
    pub config: SectionConfig,
}

impl NewSection {
    /// Type defaults for a new section.
    pub fn defaults(section_type: SectionType) -> Self {
        let (source_type, product_count) = match section_type {
            SectionType::ProductGrid => (Some("collection".to_string()), Some(8)),
            _ => (None, None),
        };
        Self {
            section_type,
            title: String::new(),
            description: String::new(),
            display_order: None,
            is_active: true,
            source_type,
            source_value: None,
            product_count,
            config: SectionConfig::default_for(section_type),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.display_order = Some(order);
        self
    }

    pub fn with_source(mut self, source_value: impl Into<String>) -> Self {
        self.source_value = Some(source_value.into());
        self
    }

    pub fn with_product_count(mut self, count: u32) -> Self {
        self.product_count = Some(count);
        self
    }

    pub fn with_config(mut self, config: SectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// The section this input would become once the store assigns `id`.
    pub fn into_section(self, id: SectionId, display_order: u32) -> Section {
        Section {
            id,
            section_type: self.section_type,
            title: self.title,
            description: self.description,
            display_order,
            is_active: self.is_active,
            status: SectionStatus::Draft,
            source_type: self.source_type,
            source_value: self.source_value,
            product_count: self.product_count,
            config: self.config,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<u32>,
    pub is_active: Option<bool>,
    pub source_type: Option<String>,
    pub source_value: Option<String>,
    pub product_count: Option<u32>,
    pub config: Option<SectionConfig>,
}

impl SectionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn display_order(mut self, order: u32) -> Self {
        self.display_order = Some(order);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    pub fn source_value(mut self, value: impl Into<String>) -> Self {
        self.source_value = Some(value.into());
        self
    }

    pub fn product_count(mut self, count: u32) -> Self {
        self.product_count = Some(count);
        self
    }

    pub fn config(mut self, config: SectionConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The section as it would look with this patch applied.
    pub fn applied_to(&self, section: &Section) -> Section {
        let mut patched = section.clone();
        if let Some(title) = &self.title {
            patched.title = title.clone();
        }
        if let Some(description) = &self.description {
            patched.description = description.clone();
        }
        if let Some(order) = self.display_order {
            patched.display_order = order;
        }
        if let Some(active) = self.is_active {
            patched.is_active = active;
        }
        if let Some(source_type) = &self.source_type {
            patched.source_type = Some(source_type.clone());
        }
        if let Some(source_value) = &self.source_value {
            patched.source_value = Some(source_value.clone());
        }
        if let Some(count) = self.product_count {
            patched.product_count = Some(count);
        }
        if let Some(config) = &self.config {
            patched.config = config.clone();
        }
        patched
    }
}
