use crate::config::validate_config;
use crate::{ValidationConfig, fields, is_blank};
use lander_model::Section;
use lander_ordering::OrderPool;
use lander_types::{ErrorCode, FieldErrors, SectionType};

/// Full validation of a candidate section against the other sections.
///
/// `others` may include the candidate itself (matched by id); it is skipped.
pub fn validate_section(
    candidate: &Section,
    others: &[Section],
    config: &ValidationConfig,
) -> FieldErrors {
    let mut errors = validate_section_fields(candidate, others, config);
    errors.merge(validate_config(candidate.section_type, &candidate.config, config));
    errors
}

/// Field and cross-record checks only; config minimums are not applied.
pub fn validate_section_fields(
    candidate: &Section,
    others: &[Section],
    config: &ValidationConfig,
) -> FieldErrors {
    let others: Vec<&Section> = others.iter().filter(|s| s.id != candidate.id).collect();
    let mut errors = FieldErrors::new();

    check_title(candidate, &others, &mut errors);
    check_display_order(candidate, &others, &mut errors);
    if candidate.section_type == SectionType::ProductGrid {
        check_product_grid(candidate, &others, config, &mut errors);
    }
    errors
}

fn check_title(candidate: &Section, others: &[&Section], errors: &mut FieldErrors) {
    if candidate.section_type.has_system_title() {
        return;
    }
    if is_blank(&candidate.title) {
        errors.add(fields::TITLE, ErrorCode::Required, "Title is required");
        return;
    }
    let key = candidate.title_key();
    if others
        .iter()
        .any(|s| s.section_type == candidate.section_type && s.title_key() == key)
    {
        errors.add(
            fields::TITLE,
            ErrorCode::Duplicate,
            format!("A section titled \"{}\" already exists", candidate.title.trim()),
        );
    }
}

fn check_display_order(candidate: &Section, others: &[&Section], errors: &mut FieldErrors) {
    if !candidate.section_type.is_orderable() {
        return;
    }
    let order = candidate.display_order;
    if order < 1 {
        errors.add(
            fields::DISPLAY_ORDER,
            ErrorCode::OutOfRange,
            "Display order must be at least 1",
        );
        return;
    }
    let pool = OrderPool::from_items(others.iter().map(|s| (*s).clone()));
    if pool.is_duplicate(order, None) {
        let holder = pool
            .items()
            .iter()
            .find(|s| s.display_order == order)
            .map(|s| s.title.clone())
            .unwrap_or_default();
        errors.add(
            fields::DISPLAY_ORDER,
            ErrorCode::Duplicate,
            format!("Display order {order} is already used by \"{holder}\""),
        );
    }
}

fn check_product_grid(
    candidate: &Section,
    others: &[&Section],
    config: &ValidationConfig,
    errors: &mut FieldErrors,
) {
    match candidate.product_count {
        None => errors.add(fields::PRODUCT_COUNT, ErrorCode::Required, "Product count is required"),
        Some(n) if n < config.min_product_count || n > config.max_product_count => errors.add(
            fields::PRODUCT_COUNT,
            ErrorCode::OutOfRange,
            format!(
                "Product count must be between {} and {}",
                config.min_product_count, config.max_product_count
            ),
        ),
        Some(_) => {}
    }

    let Some(source) = candidate.source_key() else {
        errors.add(fields::SOURCE_VALUE, ErrorCode::Required, "Select a collection");
        return;
    };
    if !candidate.is_active {
        return;
    }
    if let Some(holder) = others.iter().find(|s| {
        s.section_type == SectionType::ProductGrid && s.is_active && s.source_key() == Some(source)
    }) {
        errors.add(
            fields::SOURCE_VALUE,
            ErrorCode::Duplicate,
            format!("This collection is already shown by \"{}\"", holder.title),
        );
    }
}
