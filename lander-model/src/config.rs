//! Per-type config payloads.
//!
//! Each struct fills missing fields from its `Default` and keeps unknown
//! fields in `extra`, so a payload written by a newer editor survives a
//! decode/encode cycle untouched.

use lander_ordering::Ordered;
use lander_types::{ItemId, SectionType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const WHITE: &str = "#FFFFFF";

/// Key older editors stored the slide image under. It stays in `extra` and is
/// written back as it was read.
pub const LEGACY_IMAGE_KEY: &str = "imageUrl";

/// Config payload of a section, selected by the section's type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionConfig {
    Hero(HeroConfig),
    Faq(FaqConfig),
    Testimonials(TestimonialsConfig),
    Generic(GenericConfig),
}

impl SectionConfig {
    /// The empty config a freshly created section of `section_type` starts with.
    pub fn default_for(section_type: SectionType) -> Self {
        match section_type {
            SectionType::Hero => SectionConfig::Hero(HeroConfig::default()),
            SectionType::Faq => SectionConfig::Faq(FaqConfig::default()),
            SectionType::Testimonials => SectionConfig::Testimonials(TestimonialsConfig::default()),
            SectionType::ProductGrid | SectionType::EmailSubscribe => {
                SectionConfig::Generic(GenericConfig::default())
            }
        }
    }

    /// Whether this variant is the one `section_type` uses.
    pub fn fits(&self, section_type: SectionType) -> bool {
        matches!(
            (self, section_type),
            (SectionConfig::Hero(_), SectionType::Hero)
                | (SectionConfig::Faq(_), SectionType::Faq)
                | (SectionConfig::Testimonials(_), SectionType::Testimonials)
                | (
                    SectionConfig::Generic(_),
                    SectionType::ProductGrid | SectionType::EmailSubscribe
                )
        )
    }

    pub fn as_hero(&self) -> Option<&HeroConfig> {
        match self {
            SectionConfig::Hero(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_faq(&self) -> Option<&FaqConfig> {
        match self {
            SectionConfig::Faq(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_testimonials(&self) -> Option<&TestimonialsConfig> {
        match self {
            SectionConfig::Testimonials(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_generic(&self) -> Option<&GenericConfig> {
        match self {
            SectionConfig::Generic(c) => Some(c),
            _ => None,
        }
    }
}

// ── Hero ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroConfig {
    pub slides: Vec<HeroSlide>,
    pub autoplay: bool,
    pub autoplay_delay_ms: u32,
    pub show_navigation: bool,
    pub show_pagination: bool,
    pub background_color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            slides: Vec::new(),
            autoplay: true,
            autoplay_delay_ms: 5000,
            show_navigation: true,
            show_pagination: true,
            background_color: WHITE.to_string(),
            extra: Map::new(),
        }
    }
}

/// One slide of the hero slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSlide {
    #[serde(skip_serializing_if = "ItemId::is_blank")]
    pub id: ItemId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(deserialize_with = "coerce::order")]
    pub order: u32,
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HeroSlide {
    /// Image URL, falling back to the legacy key when `image` is unset.
    pub fn image_src(&self) -> &str {
        if !self.image.trim().is_empty() {
            return &self.image;
        }
        self.extra
            .get(LEGACY_IMAGE_KEY)
            .and_then(Value::as_str)
            .unwrap_or(&self.image)
    }
}

impl Default for HeroSlide {
    fn default() -> Self {
        Self {
            id: ItemId::default(),
            image: String::new(),
            title: String::new(),
            subtitle: String::new(),
            button_text: String::new(),
            button_link: String::new(),
            button_color: None,
            text_color: None,
            order: 0,
            is_active: true,
            extra: Map::new(),
        }
    }
}

// ── FAQ ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqLayout {
    #[default]
    Accordion,
    TwoColumn,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqConfig {
    pub faqs: Vec<FaqItem>,
    pub background_color: String,
    pub layout: FaqLayout,
    pub allow_multiple_open: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            faqs: Vec::new(),
            background_color: WHITE.to_string(),
            layout: FaqLayout::default(),
            allow_multiple_open: false,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqItem {
    #[serde(skip_serializing_if = "ItemId::is_blank")]
    pub id: ItemId,
    pub question: String,
    pub answer: String,
    #[serde(deserialize_with = "coerce::order")]
    pub order: u32,
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FaqItem {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            ..Self::default()
        }
    }
}

impl Default for FaqItem {
    fn default() -> Self {
        Self {
            id: ItemId::default(),
            question: String::new(),
            answer: String::new(),
            order: 0,
            is_active: true,
            extra: Map::new(),
        }
    }
}

// ── Testimonials ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    #[default]
    Carousel,
    Grid,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialsConfig {
    pub testimonials: Vec<TestimonialItem>,
    pub display_style: DisplayStyle,
    pub auto_rotate: bool,
    pub background_color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TestimonialsConfig {
    fn default() -> Self {
        Self {
            testimonials: Vec::new(),
            display_style: DisplayStyle::default(),
            auto_rotate: true,
            background_color: WHITE.to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialItem {
    #[serde(skip_serializing_if = "ItemId::is_blank")]
    pub id: ItemId,
    pub content: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(deserialize_with = "coerce::rating")]
    pub rating: u8,
    #[serde(deserialize_with = "coerce::order")]
    pub order: u32,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestimonialItem {
    pub fn new(content: impl Into<String>, name: impl Into<String>, rating: u8) -> Self {
        Self {
            content: content.into(),
            name: name.into(),
            rating,
            ..Self::default()
        }
    }
}

impl Default for TestimonialItem {
    fn default() -> Self {
        Self {
            id: ItemId::default(),
            content: String::new(),
            name: String::new(),
            role: None,
            rating: 5,
            order: 0,
            is_active: true,
            image: None,
            extra: Map::new(),
        }
    }
}

// ── Generic ──────────────────────────────────────────────────────

/// Free-form config for types without a dedicated shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericConfig(pub Map<String, Value>);

impl GenericConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

// ── Ordered impls ────────────────────────────────────────────────

macro_rules! ordered_item {
    ($ty:ty) => {
        impl Ordered for $ty {
            type Key = ItemId;

            fn key(&self) -> &ItemId {
                &self.id
            }

            fn order(&self) -> u32 {
                self.order
            }

            fn set_order(&mut self, order: u32) {
                self.order = order;
            }
        }
    };
}

ordered_item!(HeroSlide);
ordered_item!(FaqItem);
ordered_item!(TestimonialItem);

/// Item numbers as editors actually send them: numeric strings from form
/// inputs, floats, negatives. Anything unreadable becomes 0, which
/// normalization turns into a fresh order and validation flags as a rating.
mod coerce {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn whole(value: &Value) -> Option<u64> {
        let float = |f: f64| (f.is_finite() && f >= 0.0).then_some(f as u64);
        match value {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(float)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float))
            }
            _ => None,
        }
    }

    pub fn order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(whole(&value).and_then(|n| u32::try_from(n).ok()).unwrap_or(0))
    }

    pub fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(whole(&value).and_then(|n| u8::try_from(n).ok()).unwrap_or(0))
    }
}
