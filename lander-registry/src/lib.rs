//! Section registry for lander.
//!
//! ## Components
//!
//! - **Registry**: [`SectionRegistry`] holds the authoritative list of
//!   sections and owns every mutation: create, update, delete, publish,
//!   activation and reordering
//! - **Collections**: [`EmbeddedCollectionManager`] edits the item list
//!   inside one section's config (FAQ items, testimonials, hero slides)
//!
//! Every mutation goes through the same steps: take the action lock, validate
//! the resulting view locally, write it to the store, then apply what the
//! store returned. Reads never take the lock.
//!
//! # Example
//!
//! ```no_run
//! use lander_model::{FaqItem, FaqItems};
//! use lander_registry::{EmbeddedCollectionManager, RegistryConfig, SectionRegistry};
//! use lander_sync::mock::MemorySectionStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> lander_registry::RegistryResult<()> {
//! let registry =
//!     SectionRegistry::load(Arc::new(MemorySectionStore::new()), RegistryConfig::default()).await?;
//! let mut faqs = EmbeddedCollectionManager::<FaqItems>::for_singleton(&registry).await?;
//! faqs.add(FaqItem::new("Do you ship abroad?", "Yes, to most countries.")).await?;
//! # Ok(())
//! # }
//! ```

mod collection;
mod config;
mod error;
mod registry;

pub use collection::EmbeddedCollectionManager;
pub use config::{RegistryConfig, RegistryScope};
pub use error::{RegistryError, RegistryResult};
pub use registry::SectionRegistry;
