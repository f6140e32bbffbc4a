//! Property-based tests for the config codec.
//!
//! - decode never panics on arbitrary input
//! - decode(encode(c)) == c for every defined variant

use lander_model::codec::{decode_str, encode};
use lander_model::{FaqConfig, FaqItem, SectionConfig, TestimonialItem, TestimonialsConfig};
use lander_types::{ItemId, SectionType};
use proptest::prelude::*;

fn text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ?!]{0,40}").unwrap()
}

fn faq_items() -> impl Strategy<Value = Vec<FaqItem>> {
    prop::collection::vec((text(), text(), any::<bool>()), 0..8).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (q, a, active))| FaqItem {
                id: ItemId::new(format!("faq-{i}")),
                question: q,
                answer: a,
                order: i as u32 + 1,
                is_active: active,
                ..FaqItem::default()
            })
            .collect()
    })
}

fn testimonial_items() -> impl Strategy<Value = Vec<TestimonialItem>> {
    prop::collection::vec((text(), text(), 1u8..=5), 0..8).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (content, name, rating))| TestimonialItem {
                id: ItemId::new(format!("t-{i}")),
                content,
                name,
                rating,
                order: i as u32 + 1,
                ..TestimonialItem::default()
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn decode_never_panics(raw in ".*", pick in 0usize..5) {
        let section_type = SectionType::ALL[pick];
        let config = decode_str(section_type, &raw);
        prop_assert!(config.fits(section_type));
    }

    #[test]
    fn faq_round_trip(faqs in faq_items(), multi in any::<bool>(), bg in text()) {
        let config = SectionConfig::Faq(FaqConfig {
            faqs,
            allow_multiple_open: multi,
            background_color: bg,
            ..FaqConfig::default()
        });
        let encoded = encode(&config).unwrap();
        prop_assert_eq!(decode_str(SectionType::Faq, &encoded), config);
    }

    #[test]
    fn testimonials_round_trip(items in testimonial_items(), rotate in any::<bool>()) {
        let config = SectionConfig::Testimonials(TestimonialsConfig {
            testimonials: items,
            auto_rotate: rotate,
            ..TestimonialsConfig::default()
        });
        let encoded = encode(&config).unwrap();
        prop_assert_eq!(decode_str(SectionType::Testimonials, &encoded), config);
    }
}
