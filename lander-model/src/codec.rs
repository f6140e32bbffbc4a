//! Config codec.
//!
//! `decode` never fails: a payload that cannot be read falls back to the
//! type's empty default, and a payload that can only partly be read keeps
//! every field that does parse. `encode` is deterministic, so
//! `encode(decode(encode(c)))` is byte-identical to `encode(c)`.

use crate::config::{
    FaqConfig, FaqItem, GenericConfig, HeroConfig, HeroSlide, SectionConfig, TestimonialItem,
    TestimonialsConfig,
};
use crate::item::{EmbeddedItem, FaqItems, HeroSlides, ItemCollection, TestimonialEntries};
use lander_ordering::{Ordered, next_order};
use lander_types::{ItemId, SectionType};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding a config.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("config variant does not match section type {0}")]
    Mismatch(SectionType),
}

/// Decodes a raw config (transport string or structured JSON) for a section type.
pub fn decode(section_type: SectionType, raw: &Value) -> SectionConfig {
    let Some(obj) = unwrap_object(section_type, raw) else {
        return SectionConfig::default_for(section_type);
    };

    let mut config = match section_type {
        SectionType::Hero => {
            SectionConfig::Hero(lenient::<HeroConfig, HeroSlide>(obj, HeroSlides::FIELD))
        }
        SectionType::Faq => SectionConfig::Faq(lenient::<FaqConfig, FaqItem>(obj, FaqItems::FIELD)),
        SectionType::Testimonials => SectionConfig::Testimonials(
            lenient::<TestimonialsConfig, TestimonialItem>(obj, TestimonialEntries::FIELD),
        ),
        SectionType::ProductGrid | SectionType::EmailSubscribe => {
            SectionConfig::Generic(GenericConfig(obj))
        }
    };
    normalize(&mut config);
    config
}

/// Decodes a transport string.
pub fn decode_str(section_type: SectionType, raw: &str) -> SectionConfig {
    decode(section_type, &Value::String(raw.to_string()))
}

/// Encodes a config into its transport string.
pub fn encode(config: &SectionConfig) -> CodecResult<String> {
    Ok(serde_json::to_string(config)?)
}

/// Fills in item ids and orders that a legacy payload left out.
pub fn normalize(config: &mut SectionConfig) {
    match config {
        SectionConfig::Hero(c) => normalize_items(&mut c.slides),
        SectionConfig::Faq(c) => normalize_items(&mut c.faqs),
        SectionConfig::Testimonials(c) => normalize_items(&mut c.testimonials),
        SectionConfig::Generic(_) => {}
    }
}

/// Assigns a local id to id-less items and `max + 1` orders, in list order,
/// to items whose order is missing.
pub fn normalize_items<I: EmbeddedItem>(items: &mut [I]) {
    let mut next = next_order(items.iter().map(Ordered::order).filter(|o| *o > 0));
    for item in items.iter_mut() {
        if item.id().is_blank() {
            item.set_id(ItemId::generate());
        }
        if item.order() == 0 {
            item.set_order(next);
            next += 1;
        }
    }
}

fn unwrap_object(section_type: SectionType, raw: &Value) -> Option<Map<String, Value>> {
    match raw {
        Value::Object(map) => Some(map.clone()),
        Value::Null => None,
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(map),
            // Double-encoded payloads from older editors.
            Ok(Value::String(inner)) => match serde_json::from_str::<Value>(&inner) {
                Ok(Value::Object(map)) => Some(map),
                _ => {
                    warn!(%section_type, "config string is not an object, using defaults");
                    None
                }
            },
            Ok(_) => {
                warn!(%section_type, "config string is not an object, using defaults");
                None
            }
            Err(err) => {
                warn!(%section_type, %err, "config string is not valid JSON, using defaults");
                None
            }
        },
        _ => {
            warn!(%section_type, "config is neither an object nor a string, using defaults");
            None
        }
    }
}

fn lenient<C, I>(mut obj: Map<String, Value>, list_field: &str) -> C
where
    C: DeserializeOwned + Default,
    I: DeserializeOwned,
{
    let drop_list = match obj.get_mut(list_field) {
        Some(Value::Array(items)) => {
            let before = items.len();
            let kept: Vec<Value> = std::mem::take(items)
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(fields) => Some(Value::Object(salvage::<I>(fields))),
                    _ => None,
                })
                .collect();
            if kept.len() != before {
                warn!(
                    field = list_field,
                    dropped = before - kept.len(),
                    "dropped items that are not objects"
                );
            }
            *items = kept;
            false
        }
        Some(_) => true,
        None => false,
    };
    if drop_list {
        warn!(field = list_field, "item list is not an array, using empty list");
        obj.remove(list_field);
    }

    let fields = salvage::<C>(obj);
    serde_json::from_value(Value::Object(fields)).unwrap_or_default()
}

/// Keeps the fields of `obj` that `T` can read, dropping only the ones that
/// make it fail.
fn salvage<T: DeserializeOwned>(obj: Map<String, Value>) -> Map<String, Value> {
    if serde_json::from_value::<T>(Value::Object(obj.clone())).is_ok() {
        return obj;
    }
    debug!("value did not parse whole, salvaging field by field");
    let mut salvaged = Map::new();
    for (key, value) in obj {
        salvaged.insert(key.clone(), value);
        if serde_json::from_value::<T>(Value::Object(salvaged.clone())).is_err() {
            warn!(field = %key, "discarding malformed field");
            salvaged.remove(&key);
        }
    }
    salvaged
}
