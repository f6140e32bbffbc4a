use crate::config::{FaqItem, HeroSlide, SectionConfig, TestimonialItem};
use lander_ordering::Ordered;
use lander_types::{ItemId, SectionType};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// A sub-record stored inside a section's config.
///
/// Items have no identity on the remote store; their ids are generated
/// locally and only persist as part of the parent section's config.
pub trait EmbeddedItem:
    Ordered<Key = ItemId> + Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// Human-readable name used in log lines and error messages.
    const LABEL: &'static str;

    fn id(&self) -> &ItemId {
        self.key()
    }

    fn set_id(&mut self, id: ItemId);

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);
}

impl EmbeddedItem for FaqItem {
    const LABEL: &'static str = "FAQ item";

    fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl EmbeddedItem for TestimonialItem {
    const LABEL: &'static str = "testimonial";

    fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl EmbeddedItem for HeroSlide {
    const LABEL: &'static str = "hero slide";

    fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

/// Binds an item type to the section type and config field that holds it.
pub trait ItemCollection: Send + Sync + 'static {
    type Item: EmbeddedItem;

    const SECTION_TYPE: SectionType;

    /// Name of the list field inside the config payload.
    const FIELD: &'static str;

    fn items(config: &SectionConfig) -> Option<&Vec<Self::Item>>;

    fn items_mut(config: &mut SectionConfig) -> Option<&mut Vec<Self::Item>>;
}

/// FAQ entries of the FAQ singleton.
pub struct FaqItems;

impl ItemCollection for FaqItems {
    type Item = FaqItem;
    const SECTION_TYPE: SectionType = SectionType::Faq;
    const FIELD: &'static str = "faqs";

    fn items(config: &SectionConfig) -> Option<&Vec<FaqItem>> {
        match config {
            SectionConfig::Faq(c) => Some(&c.faqs),
            _ => None,
        }
    }

    fn items_mut(config: &mut SectionConfig) -> Option<&mut Vec<FaqItem>> {
        match config {
            SectionConfig::Faq(c) => Some(&mut c.faqs),
            _ => None,
        }
    }
}

/// Entries of the testimonials singleton.
pub struct TestimonialEntries;

impl ItemCollection for TestimonialEntries {
    type Item = TestimonialItem;
    const SECTION_TYPE: SectionType = SectionType::Testimonials;
    const FIELD: &'static str = "testimonials";

    fn items(config: &SectionConfig) -> Option<&Vec<TestimonialItem>> {
        match config {
            SectionConfig::Testimonials(c) => Some(&c.testimonials),
            _ => None,
        }
    }

    fn items_mut(config: &mut SectionConfig) -> Option<&mut Vec<TestimonialItem>> {
        match config {
            SectionConfig::Testimonials(c) => Some(&mut c.testimonials),
            _ => None,
        }
    }
}

/// Slides of one hero section.
pub struct HeroSlides;

impl ItemCollection for HeroSlides {
    type Item = HeroSlide;
    const SECTION_TYPE: SectionType = SectionType::Hero;
    const FIELD: &'static str = "slides";

    fn items(config: &SectionConfig) -> Option<&Vec<HeroSlide>> {
        match config {
            SectionConfig::Hero(c) => Some(&c.slides),
            _ => None,
        }
    }

    fn items_mut(config: &mut SectionConfig) -> Option<&mut Vec<HeroSlide>> {
        match config {
            SectionConfig::Hero(c) => Some(&mut c.slides),
            _ => None,
        }
    }
}
