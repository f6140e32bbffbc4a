//! Section types and the wire records exchanged with the remote store.

use crate::ids::SectionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of content block a section renders. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Hero,
    ProductGrid,
    Faq,
    Testimonials,
    EmailSubscribe,
}

impl SectionType {
    /// Every section type, in editor display order.
    pub const ALL: [SectionType; 5] = [
        SectionType::Hero,
        SectionType::ProductGrid,
        SectionType::Faq,
        SectionType::Testimonials,
        SectionType::EmailSubscribe,
    ];

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::ProductGrid => "product_grid",
            SectionType::Faq => "faq",
            SectionType::Testimonials => "testimonials",
            SectionType::EmailSubscribe => "email_subscribe",
        }
    }

    /// Types restricted to exactly one record per deployment.
    pub fn is_singleton(&self) -> bool {
        matches!(self, SectionType::Faq | SectionType::Testimonials)
    }

    /// Whether sections of this type take part in display ordering.
    /// Hero is pinned to the top of the page.
    pub fn is_orderable(&self) -> bool {
        !matches!(self, SectionType::Hero)
    }

    /// Whether the title is assigned by the system rather than the editor.
    pub fn has_system_title(&self) -> bool {
        self.is_singleton()
    }

    /// Whether a section of this type may be deleted outright.
    pub fn is_deletable(&self) -> bool {
        !self.is_singleton()
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::Error::UnknownSectionType(s.to_string()))
    }
}

/// Publication status. Orthogonal to the active/inactive flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    #[default]
    Draft,
    Published,
}

impl SectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionStatus::Draft => "draft",
            SectionStatus::Published => "published",
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, SectionStatus::Published)
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SectionStatus::Draft),
            "published" => Ok(SectionStatus::Published),
            other => Err(crate::Error::UnknownStatus(other.to_string())),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A section as returned by the remote store.
///
/// `config` is left undecoded: the store may hand back either a transport
/// string or an already-structured JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub id: SectionId,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub status: SectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u32>,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The body sent to the store on create and update.
///
/// `config` is always an encoded transport string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPayload {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub description: String,
    pub display_order: u32,
    pub is_active: bool,
    pub status: SectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u32>,
    pub config: String,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub id: SectionId,
    pub display_order: u32,
}

/// An external product collection a `product_grid` section can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products_count: Option<u32>,
}
