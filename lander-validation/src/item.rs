use crate::{ValidationConfig, fields, is_blank};
use lander_model::{EmbeddedItem, FaqItem, HeroSlide, TestimonialItem};
use lander_ordering::{duplicate_orders, is_duplicate};
use lander_types::{ErrorCode, FieldErrors};

/// Per-shape field rules for an embedded item.
pub trait ValidateItem: EmbeddedItem {
    /// Adds this item's own field errors (un-prefixed keys).
    fn check_fields(&self, limits: &ValidationConfig, errors: &mut FieldErrors);
}

fn required(errors: &mut FieldErrors, field: &str, value: &str, label: &str) {
    if is_blank(value) {
        errors.add(field, ErrorCode::Required, format!("{label} is required"));
    }
}

impl ValidateItem for FaqItem {
    fn check_fields(&self, _limits: &ValidationConfig, errors: &mut FieldErrors) {
        required(errors, "question", &self.question, "Question");
        required(errors, "answer", &self.answer, "Answer");
    }
}

impl ValidateItem for TestimonialItem {
    fn check_fields(&self, limits: &ValidationConfig, errors: &mut FieldErrors) {
        required(errors, "content", &self.content, "Content");
        required(errors, "name", &self.name, "Name");
        if self.rating < limits.min_rating || self.rating > limits.max_rating {
            errors.add(
                "rating",
                ErrorCode::OutOfRange,
                format!("Rating must be between {} and {}", limits.min_rating, limits.max_rating),
            );
        }
    }
}

impl ValidateItem for HeroSlide {
    fn check_fields(&self, _limits: &ValidationConfig, errors: &mut FieldErrors) {
        required(errors, "image", self.image_src(), "Image");
        required(errors, "title", &self.title, "Title");
        required(errors, "subtitle", &self.subtitle, "Subtitle");
        required(errors, "buttonText", &self.button_text, "Button text");
        required(errors, "buttonLink", &self.button_link, "Button link");
    }
}

/// Validates one item against the list it belongs to.
///
/// `siblings` may contain the item itself (matched by id); it is excluded
/// from the duplicate-order check.
pub fn validate_item<I: ValidateItem>(
    item: &I,
    siblings: &[I],
    limits: &ValidationConfig,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    item.check_fields(limits, &mut errors);
    if item.order() < 1 {
        errors.add(fields::ORDER, ErrorCode::OutOfRange, "Order must be at least 1");
    } else if is_duplicate(item.order(), siblings, Some(item.id())) {
        errors.add(
            fields::ORDER,
            ErrorCode::Duplicate,
            format!("Order {} is already used by another {}", item.order(), I::LABEL),
        );
    }
    errors
}

/// Validates a whole item list; errors are keyed `field.index.name`.
pub fn validate_items<I: ValidateItem>(
    items: &[I],
    field: &str,
    limits: &ValidationConfig,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let dups = duplicate_orders(items);
    for (idx, item) in items.iter().enumerate() {
        let mut item_errors = FieldErrors::new();
        item.check_fields(limits, &mut item_errors);
        if item.order() < 1 {
            item_errors.add(fields::ORDER, ErrorCode::OutOfRange, "Order must be at least 1");
        } else if dups.contains(&item.order()) {
            item_errors.add(
                fields::ORDER,
                ErrorCode::Duplicate,
                format!("Order {} is used more than once", item.order()),
            );
        }
        errors.nest(&format!("{field}.{idx}"), item_errors);
    }
    errors
}
