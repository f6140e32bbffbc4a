use crate::item::validate_items;
use crate::{ValidationConfig, fields};
use lander_model::{FaqItems, HeroSlides, ItemCollection, SectionConfig, TestimonialEntries};
use lander_types::{ErrorCode, FieldErrors, SectionType};

/// Payload rules for a section type: minimum item counts, numeric limits and
/// every embedded item.
pub fn validate_config(
    section_type: SectionType,
    config: &SectionConfig,
    limits: &ValidationConfig,
) -> FieldErrors {
    let mut errors = validate_config_items(section_type, config, limits);
    match config {
        SectionConfig::Hero(hero) => {
            require_count(&mut errors, HeroSlides::FIELD, hero.slides.len(), limits.min_hero_slides, "slide");
        }
        SectionConfig::Faq(faq) => {
            require_count(&mut errors, FaqItems::FIELD, faq.faqs.len(), limits.min_faq_items, "FAQ");
        }
        SectionConfig::Testimonials(t) => {
            require_count(
                &mut errors,
                TestimonialEntries::FIELD,
                t.testimonials.len(),
                limits.min_testimonials,
                "testimonial",
            );
        }
        SectionConfig::Generic(_) => {}
    }
    errors
}

/// Payload rules without minimum item counts.
pub fn validate_config_items(
    section_type: SectionType,
    config: &SectionConfig,
    limits: &ValidationConfig,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !config.fits(section_type) {
        errors.add(
            fields::CONFIG,
            ErrorCode::Invalid,
            format!("Config does not match section type {section_type}"),
        );
        return errors;
    }
    match config {
        SectionConfig::Hero(hero) => {
            if hero.autoplay_delay_ms < limits.min_autoplay_delay_ms {
                errors.add(
                    fields::AUTOPLAY_DELAY,
                    ErrorCode::OutOfRange,
                    format!("Autoplay delay must be at least {} ms", limits.min_autoplay_delay_ms),
                );
            }
            errors.merge(validate_items(&hero.slides, HeroSlides::FIELD, limits));
        }
        SectionConfig::Faq(faq) => {
            errors.merge(validate_items(&faq.faqs, FaqItems::FIELD, limits));
        }
        SectionConfig::Testimonials(t) => {
            errors.merge(validate_items(&t.testimonials, TestimonialEntries::FIELD, limits));
        }
        SectionConfig::Generic(_) => {}
    }
    errors
}

fn require_count(errors: &mut FieldErrors, field: &str, len: usize, min: usize, noun: &str) {
    if len < min {
        let plural = if min == 1 { "" } else { "s" };
        errors.add(
            field,
            ErrorCode::Required,
            format!("Add at least {min} {noun}{plural}"),
        );
    }
}
