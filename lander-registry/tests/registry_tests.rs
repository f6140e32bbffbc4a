use lander_model::{HeroConfig, HeroSlide, NewSection, SectionConfig, SectionPatch};
use lander_registry::{RegistryConfig, RegistryError, RegistryScope, SectionRegistry};
use lander_sync::SyncError;
use lander_sync::mock::{MemorySectionStore, StoreCall};
use lander_types::{
    Collection, ErrorCode, FieldErrors, ItemId, SectionId, SectionRecord, SectionStatus,
    SectionType,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn record(value: Value) -> SectionRecord {
    serde_json::from_value(value).unwrap()
}

fn grid(id: &str, title: &str, order: u32, source: &str) -> SectionRecord {
    record(json!({
        "id": id,
        "type": "product_grid",
        "title": title,
        "displayOrder": order,
        "sourceType": "collection",
        "sourceValue": source,
        "productCount": 8,
        "config": "{}"
    }))
}

fn hero(id: &str, status: &str) -> SectionRecord {
    record(json!({
        "id": id,
        "type": "hero",
        "title": "Hero",
        "displayOrder": 1,
        "status": status,
        "config": {
            "slides": [{
                "id": "s1", "image": "a.jpg", "title": "Big sale", "subtitle": "Now on",
                "buttonText": "Shop", "buttonLink": "/shop", "order": 1
            }]
        }
    }))
}

fn faq(id: &str) -> SectionRecord {
    record(json!({
        "id": id,
        "type": "faq",
        "title": "FAQ",
        "displayOrder": 9,
        "config": { "faqs": [{ "id": "q1", "question": "Q?", "answer": "A.", "order": 1 }] }
    }))
}

fn email(id: &str, order: u32) -> SectionRecord {
    record(json!({
        "id": id,
        "type": "email_subscribe",
        "title": "Newsletter",
        "displayOrder": order,
        "config": {}
    }))
}

fn grids_only() -> RegistryConfig {
    RegistryConfig {
        scope: RegistryScope::Only(SectionType::ProductGrid),
        ..RegistryConfig::default()
    }
}

fn slide() -> HeroSlide {
    HeroSlide {
        id: ItemId::new("s1"),
        image: "b.jpg".into(),
        title: "Launch".into(),
        subtitle: "New range".into(),
        button_text: "See".into(),
        button_link: "/new".into(),
        order: 1,
        ..HeroSlide::default()
    }
}

async fn setup(records: Vec<SectionRecord>) -> (Arc<MemorySectionStore>, SectionRegistry) {
    init_tracing();
    let store = Arc::new(MemorySectionStore::with_sections(records));
    let registry = SectionRegistry::load(store.clone(), RegistryConfig::default())
        .await
        .unwrap();
    (store, registry)
}

fn expect(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
    pairs.iter().map(|(id, order)| (id.to_string(), *order)).collect()
}

async fn orders(registry: &SectionRegistry) -> Vec<(String, u32)> {
    registry
        .sections()
        .await
        .into_iter()
        .map(|s| (s.id.to_string(), s.display_order))
        .collect()
}

// ── Loading and queries ─────────────────────────────────────────

#[tokio::test]
async fn sections_sorted_with_hero_first() {
    let (_, registry) = setup(vec![
        grid("2", "B", 2, "b"),
        grid("3", "A", 1, "a"),
        hero("1", "draft"),
    ])
    .await;
    let ids: Vec<String> = registry.sections().await.into_iter().map(|s| s.id.to_string()).collect();
    assert_eq!(ids, vec!["1", "3", "2"]);
    assert_eq!(registry.of_type(SectionType::ProductGrid).await.len(), 2);
    assert_eq!(registry.next_display_order().await, 3);
}

#[tokio::test]
async fn scoped_registry_loads_one_type() {
    let store = Arc::new(MemorySectionStore::with_sections(vec![
        grid("1", "A", 1, "a"),
        faq("2"),
    ]));
    let config = RegistryConfig {
        scope: RegistryScope::Only(SectionType::ProductGrid),
        ..RegistryConfig::default()
    };
    let registry = SectionRegistry::load(store.clone(), config).await.unwrap();
    assert_eq!(registry.sections().await.len(), 1);
    assert_eq!(store.calls().await, vec![StoreCall::List(Some(SectionType::ProductGrid))]);
}

#[tokio::test]
async fn scoped_registry_refuses_other_types() {
    let mut faq = faq("1");
    faq.display_order = 2;
    let store = Arc::new(MemorySectionStore::with_sections(vec![faq, email("2", 1)]));
    let registry = SectionRegistry::load(store.clone(), grids_only()).await.unwrap();

    let err = registry.ensure_singleton(SectionType::Faq).await.unwrap_err();
    assert!(matches!(err, RegistryError::ValidationFailed(ref e) if e.has_code("type", ErrorCode::Invalid)));
    let err = registry
        .create(NewSection::defaults(SectionType::EmailSubscribe).with_title("Other"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::ValidationFailed(_)));

    let faqs = store
        .records()
        .await
        .into_iter()
        .filter(|r| r.section_type == SectionType::Faq)
        .count();
    assert_eq!(faqs, 1);
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test]
async fn scoped_create_takes_an_order_free_page_wide() {
    let store = Arc::new(MemorySectionStore::with_sections(vec![
        email("1", 1),
        grid("2", "A", 2, "a"),
        faq("3"),
    ]));
    let registry = SectionRegistry::load(store.clone(), grids_only()).await.unwrap();

    let created = registry
        .create(NewSection::defaults(SectionType::ProductGrid).with_title("B").with_source("b"))
        .await
        .unwrap();
    assert_eq!(created.display_order, 10);

    let err = registry
        .create(
            NewSection::defaults(SectionType::ProductGrid)
                .with_title("C")
                .with_source("c")
                .with_order(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateOrder(_)));
}

#[tokio::test]
async fn scoped_moves_reuse_the_orders_they_hold() {
    let mut faq = faq("f");
    faq.display_order = 3;
    let store = Arc::new(MemorySectionStore::with_sections(vec![
        email("e", 1),
        grid("a", "A", 2, "a"),
        faq,
        grid("b", "B", 4, "b"),
    ]));
    let registry = SectionRegistry::load(store.clone(), grids_only()).await.unwrap();

    assert!(registry.move_down(&"a".into()).await.unwrap());
    assert_eq!(orders(&registry).await, expect(&[("b", 2), ("a", 4)]));

    registry.reorder(&["a".into(), "b".into()]).await.unwrap();
    assert_eq!(orders(&registry).await, expect(&[("a", 2), ("b", 4)]));
    assert_eq!(store.record(&"e".into()).await.unwrap().display_order, 1);
    assert_eq!(store.record(&"f".into()).await.unwrap().display_order, 3);
}

#[tokio::test]
async fn collection_name_resolves_by_id_or_handle() {
    let (store, registry) = setup(vec![grid("1", "A", 1, "summer"), grid("2", "B", 2, "c-9")]).await;
    store
        .set_collections(vec![
            Collection {
                id: "c-1".into(),
                title: "Summer Picks".into(),
                handle: Some("summer".into()),
                products_count: Some(10),
            },
            Collection {
                id: "c-9".into(),
                title: "Winter".into(),
                handle: None,
                products_count: None,
            },
        ])
        .await;
    assert_eq!(registry.collection_name(&"1".into()).await, None);
    registry.load_collections().await.unwrap();
    assert_eq!(registry.collection_name(&"1".into()).await.as_deref(), Some("Summer Picks"));
    assert_eq!(registry.collection_name(&"2".into()).await.as_deref(), Some("Winter"));
}

// ── Create ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_next_free_order() {
    let (_, registry) = setup(vec![hero("1", "draft"), grid("2", "A", 1, "a"), grid("3", "B", 4, "b")]).await;
    let created = registry
        .create(NewSection::defaults(SectionType::ProductGrid).with_title("C").with_source("c"))
        .await
        .unwrap();
    assert_eq!(created.display_order, 5);
    assert_eq!(created.status, SectionStatus::Draft);
    assert!(registry.get(&created.id).await.is_some());
}

#[tokio::test]
async fn hero_order_is_fixed() {
    let (_, registry) = setup(vec![grid("2", "A", 1, "a")]).await;
    let created = registry
        .create(
            NewSection::defaults(SectionType::Hero)
                .with_title("Hero")
                .with_order(7)
                .with_config(SectionConfig::Hero(HeroConfig {
                    slides: vec![slide()],
                    ..HeroConfig::default()
                })),
        )
        .await
        .unwrap();
    assert_eq!(created.display_order, 1);
}

#[tokio::test]
async fn hero_without_slides_is_rejected_locally() {
    let (store, registry) = setup(vec![]).await;
    let err = registry
        .create(NewSection::defaults(SectionType::Hero).with_title("Hero"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::ValidationFailed(ref e) if e.has("slides")));
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test]
async fn duplicate_collection_reference_rejected() {
    let (store, registry) = setup(vec![grid("1", "Summer", 1, "summer")]).await;
    let err = registry
        .create(NewSection::defaults(SectionType::ProductGrid).with_title("Again").with_source("summer"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateCollectionReference(_)));
    assert!(err.field_errors().unwrap().has_code("sourceValue", ErrorCode::Duplicate));
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test]
async fn duplicate_title_rejected() {
    let (_, registry) = setup(vec![grid("1", "Summer", 1, "a")]).await;
    let err = registry
        .create(NewSection::defaults(SectionType::ProductGrid).with_title("SUMMER").with_source("b"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateTitle(_)));
}

#[tokio::test]
async fn second_faq_is_a_singleton_violation() {
    let (_, registry) = setup(vec![faq("1")]).await;
    let err = registry.create(NewSection::defaults(SectionType::Faq)).await.unwrap_err();
    assert!(matches!(err, RegistryError::SingletonViolation(SectionType::Faq)));
}

#[tokio::test]
async fn ensure_singleton_creates_once() {
    let (store, registry) = setup(vec![]).await;
    let first = registry.ensure_singleton(SectionType::Testimonials).await.unwrap();
    let second = registry.ensure_singleton(SectionType::Testimonials).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.title, "Testimonials");
    assert_eq!(store.write_count().await, 1);

    let err = registry.ensure_singleton(SectionType::ProductGrid).await.unwrap_err();
    assert!(matches!(err, RegistryError::ValidationFailed(_)));
}

#[tokio::test]
async fn empty_faq_singleton_can_be_bootstrapped() {
    let (_, registry) = setup(vec![]).await;
    let faq = registry.ensure_singleton(SectionType::Faq).await.unwrap();
    assert_eq!(faq.title, "FAQ");
    assert_eq!(faq.config.as_faq().map(|c| c.faqs.len()), Some(0));
}

// ── Update ──────────────────────────────────────────────────────

#[tokio::test]
async fn update_checks_the_patched_view() {
    let (_, registry) = setup(vec![grid("1", "A", 1, "a"), grid("2", "B", 2, "b")]).await;
    let err = registry
        .update(&"2".into(), SectionPatch::new().display_order(1))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateOrder(_)));

    let err = registry
        .update(&"2".into(), SectionPatch::new().product_count(80))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::ValidationFailed(ref e) if e.has_code("productCount", ErrorCode::OutOfRange)));

    let updated = registry
        .update(&"2".into(), SectionPatch::new().title("Bestsellers").display_order(3))
        .await
        .unwrap();
    assert_eq!(updated.title, "Bestsellers");
    assert_eq!(registry.get(&"2".into()).await.unwrap().display_order, 3);
}

#[tokio::test]
async fn emptied_singleton_stays_editable() {
    let (_, registry) = setup(vec![]).await;
    let faq = registry.ensure_singleton(SectionType::Faq).await.unwrap();

    let updated = registry.set_active(&faq.id, false).await.unwrap();
    assert!(!updated.is_active);
    let updated = registry
        .update(&faq.id, SectionPatch::new().description("Common questions"))
        .await
        .unwrap();
    assert_eq!(updated.description, "Common questions");

    // Replacing the config itself is still held to the minimum.
    let err = registry
        .update(&faq.id, SectionPatch::new().config(faq.config.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::ValidationFailed(ref e) if e.has("faqs")));
}

#[tokio::test]
async fn system_title_is_immutable() {
    let (_, registry) = setup(vec![faq("1")]).await;
    let err = registry
        .update(&"1".into(), SectionPatch::new().title("Questions"))
        .await
        .unwrap_err();
    assert!(err.field_errors().unwrap().has_code("title", ErrorCode::Immutable));
}

#[tokio::test]
async fn reactivating_a_grid_rechecks_its_collection() {
    let mut old = grid("1", "Old", 1, "summer");
    old.is_active = false;
    let (_, registry) = setup(vec![old, grid("2", "New", 2, "summer")]).await;
    let err = registry.set_active(&"1".into(), true).await.unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateCollectionReference(_)));

    let section = registry.set_active(&"2".into(), false).await.unwrap();
    assert!(!section.is_active);
    assert!(registry.set_active(&"1".into(), true).await.is_ok());
}

#[tokio::test]
async fn update_unknown_section() {
    let (_, registry) = setup(vec![]).await;
    let err = registry.update(&"nope".into(), SectionPatch::new()).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(ref id) if id.as_str() == "nope"));
}

// ── Remote failures ─────────────────────────────────────────────

#[tokio::test]
async fn network_failure_leaves_state_unchanged() {
    let (store, registry) = setup(vec![grid("1", "A", 1, "a")]).await;
    let before = registry.sections().await;
    store.fail_next(SyncError::Network("connection reset".into())).await;
    let err = registry
        .update(&"1".into(), SectionPatch::new().title("Renamed"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::TransientNetwork(_)));
    assert!(err.is_transient());
    assert_eq!(registry.sections().await, before);
    assert!(!registry.coordinator().is_busy());
}

#[tokio::test]
async fn server_validation_is_field_mapped() {
    let (store, registry) = setup(vec![grid("1", "A", 1, "a")]).await;
    let errors = FieldErrors::from_server(None, [("title".to_string(), vec!["Taken".to_string()])]);
    store
        .fail_next(SyncError::Validation {
            message: "Invalid data".into(),
            errors,
        })
        .await;
    let err = registry
        .update(&"1".into(), SectionPatch::new().title("B"))
        .await
        .unwrap_err();
    let RegistryError::ServerValidationFailed(errors) = err else {
        panic!("expected server validation error");
    };
    assert_eq!(errors.first("title"), Some("Taken"));
    assert_eq!(errors.message(), Some("Invalid data"));
    assert_eq!(registry.get(&"1".into()).await.unwrap().title, "A");
}

#[tokio::test]
async fn remote_not_found_maps_to_section() {
    let (store, registry) = setup(vec![grid("1", "A", 1, "a")]).await;
    store.fail_next(SyncError::NotFound("gone".into())).await;
    let err = registry.delete(&"1".into()).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(ref id) if id.as_str() == "1"));
    assert!(registry.get(&"1".into()).await.is_some());
}

#[tokio::test]
async fn remote_not_found_on_reorder_names_the_section() {
    let (store, registry) = setup(vec![grid("a", "A", 1, "a"), grid("b", "B", 2, "b")]).await;
    store.fail_next(SyncError::NotFound("b".into())).await;
    let err = registry.move_down(&"a".into()).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(ref id) if id.as_str() == "b"));
    assert_eq!(orders(&registry).await, expect(&[("a", 1), ("b", 2)]));
}

// ── Action lock ─────────────────────────────────────────────────

#[tokio::test]
async fn mutations_fail_fast_while_busy() {
    let (store, registry) = setup(vec![grid("1", "A", 1, "a")]).await;
    let guard = registry.acquire().unwrap();
    let err = registry.delete(&"1".into()).await.unwrap_err();
    assert!(matches!(err, RegistryError::Busy));
    // Reads proceed while a mutation is in flight.
    registry.refresh().await.unwrap();
    assert_eq!(registry.sections().await.len(), 1);
    drop(guard);

    registry.delete(&"1".into()).await.unwrap();
    assert_eq!(store.write_count().await, 1);
}

// ── Delete ──────────────────────────────────────────────────────

#[tokio::test]
async fn delete_leaves_gaps() {
    let (_, registry) = setup(vec![grid("1", "A", 1, "a"), grid("2", "B", 2, "b"), grid("3", "C", 3, "c")]).await;
    registry.delete(&"2".into()).await.unwrap();
    assert_eq!(orders(&registry).await, expect(&[("1", 1), ("3", 3)]));
}

#[tokio::test]
async fn singletons_cannot_be_deleted() {
    let (store, registry) = setup(vec![faq("1")]).await;
    let err = registry.delete(&"1".into()).await.unwrap_err();
    assert!(matches!(err, RegistryError::SingletonViolation(SectionType::Faq)));
    assert_eq!(store.write_count().await, 0);
}

// ── Publish ─────────────────────────────────────────────────────

#[tokio::test]
async fn publishing_a_hero_unpublishes_the_others() {
    let (store, registry) = setup(vec![hero("1", "published"), hero("2", "draft"), hero("3", "draft")]).await;
    registry.publish(&"2".into()).await.unwrap();
    registry.publish(&"3".into()).await.unwrap();

    let published: Vec<SectionId> = registry
        .of_type(SectionType::Hero)
        .await
        .into_iter()
        .filter(|s| s.is_published())
        .map(|s| s.id)
        .collect();
    assert_eq!(published, vec![SectionId::new("3")]);
    assert_eq!(registry.published_hero().await.map(|s| s.id), Some(SectionId::new("3")));

    let remote_published = store
        .records()
        .await
        .into_iter()
        .filter(|r| r.status == SectionStatus::Published)
        .count();
    assert_eq!(remote_published, 1);
}

#[tokio::test]
async fn partial_hero_publish_refetches_authoritative_state() {
    let (store, registry) = setup(vec![hero("1", "published"), hero("2", "draft")]).await;
    store.fail_next_publish_partially().await;
    let err = registry.publish(&"2".into()).await.unwrap_err();
    assert!(matches!(err, RegistryError::Remote(SyncError::Http { status: 502, .. })));
    // The store demoted hero 1 before failing; local state follows it.
    assert!(registry.published_hero().await.is_none());
    let calls = store.calls().await;
    assert_eq!(calls.last(), Some(&StoreCall::List(None)));
}

#[tokio::test]
async fn unpublish_other_types() {
    let mut published = grid("1", "A", 1, "a");
    published.status = SectionStatus::Published;
    let (_, registry) = setup(vec![published]).await;
    let section = registry.unpublish(&"1".into()).await.unwrap();
    assert_eq!(section.status, SectionStatus::Draft);
    assert!(!registry.get(&"1".into()).await.unwrap().is_published());
}

// ── Ordering ────────────────────────────────────────────────────

#[tokio::test]
async fn move_down_swaps_and_repacks() {
    let (store, registry) = setup(vec![grid("a", "A", 1, "a"), grid("b", "B", 2, "b"), grid("c", "C", 3, "c")]).await;
    assert!(registry.move_down(&"a".into()).await.unwrap());
    assert_eq!(
        orders(&registry).await,
        expect(&[("b", 1), ("a", 2), ("c", 3)])
    );
    assert_eq!(store.record(&"a".into()).await.unwrap().display_order, 2);
}

#[tokio::test]
async fn moves_at_the_boundary_are_no_ops() {
    let (store, registry) = setup(vec![grid("a", "A", 1, "a"), grid("b", "B", 2, "b")]).await;
    assert!(!registry.move_up(&"a".into()).await.unwrap());
    assert!(!registry.move_down(&"b".into()).await.unwrap());
    assert_eq!(store.write_count().await, 0);
    assert_eq!(orders(&registry).await, expect(&[("a", 1), ("b", 2)]));
}

#[tokio::test]
async fn move_repacks_gapped_orders() {
    let (_, registry) = setup(vec![grid("a", "A", 2, "a"), grid("b", "B", 5, "b"), grid("c", "C", 9, "c")]).await;
    assert!(registry.move_up(&"c".into()).await.unwrap());
    assert_eq!(
        orders(&registry).await,
        expect(&[("a", 1), ("c", 2), ("b", 3)])
    );
}

#[tokio::test]
async fn hero_is_not_in_the_orderable_pool() {
    let (_, registry) = setup(vec![hero("h", "draft"), grid("a", "A", 1, "a")]).await;
    let err = registry.move_down(&"h".into()).await.unwrap_err();
    assert!(matches!(err, RegistryError::Ordering(_)));
    assert_eq!(registry.get(&"h".into()).await.unwrap().display_order, 1);
}

#[tokio::test]
async fn explicit_reorder() {
    let (_, registry) = setup(vec![hero("h", "draft"), grid("a", "A", 1, "a"), grid("b", "B", 2, "b")]).await;
    registry.reorder(&["b".into(), "a".into()]).await.unwrap();
    assert_eq!(
        orders(&registry).await,
        expect(&[("h", 1), ("b", 1), ("a", 2)])
    );

    let err = registry.reorder(&["a".into()]).await.unwrap_err();
    assert!(matches!(err, RegistryError::Ordering(_)));
    let err = registry.reorder(&["h".into(), "a".into(), "b".into()]).await.unwrap_err();
    assert!(matches!(err, RegistryError::Ordering(_)));
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn registry_config_defaults() {
    let cfg = RegistryConfig::default();
    assert_eq!(cfg.hero_order, 1);
    assert_eq!(cfg.faq_title, "FAQ");
    assert_eq!(cfg.testimonials_title, "Testimonials");
    assert_eq!(cfg.scope, RegistryScope::All);
    assert_eq!(cfg.validation.max_product_count, 50);
}

#[test]
fn registry_config_from_partial_json() {
    let cfg: RegistryConfig =
        serde_json::from_value(json!({ "scope": { "only": "faq" }, "faq_title": "Questions" })).unwrap();
    assert_eq!(cfg.scope, RegistryScope::Only(SectionType::Faq));
    assert_eq!(cfg.system_title(SectionType::Faq), Some("Questions"));
    assert_eq!(cfg.system_title(SectionType::Hero), None);
}
