//! Section model for lander.
//!
//! Defines the decoded view of the landing page that every component above
//! the codec works with:
//! - [`SectionConfig`]: closed union of per-type config payloads
//! - [`codec`]: transport string / raw JSON ⇄ [`SectionConfig`]
//! - [`Section`], [`NewSection`], [`SectionPatch`]: decoded section records
//! - [`EmbeddedItem`] / [`ItemCollection`]: item lists living inside a config
//!
//! Nothing downstream of [`codec::decode`] sees a transport string, and
//! nothing upstream of [`codec::encode`] builds one.

pub mod codec;
mod config;
mod item;
mod section;

pub use codec::{CodecError, CodecResult};
pub use config::{
    DisplayStyle, FaqConfig, FaqItem, FaqLayout, GenericConfig, HeroConfig, HeroSlide,
    LEGACY_IMAGE_KEY, SectionConfig, TestimonialItem, TestimonialsConfig,
};
pub use item::{EmbeddedItem, FaqItems, HeroSlides, ItemCollection, TestimonialEntries};
pub use section::{NewSection, Section, SectionPatch};
