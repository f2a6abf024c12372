//! Tests for the curriculum catalog

use campfire_looper::catalog::{Catalog, ConceptKey, CURRICULUM};
use campfire_looper::core::RecyclePolicy;

#[test]
fn test_curriculum_order() {
    let ids: Vec<&str> = CURRICULUM.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["2.5.1", "2.5.2", "2.5.3", "2.5.4", "2.5.5"]);
}

#[test]
fn test_pool_options_only_for_reuse() {
    let offering: Vec<ConceptKey> = CURRICULUM
        .iter()
        .filter(|t| t.offers_pool_options())
        .map(|t| t.concept)
        .collect();
    assert_eq!(offering, vec![ConceptKey::Reuse]);
}

#[test]
fn test_selection_drives_policy() {
    let mut catalog = Catalog::default();
    assert_eq!(
        catalog.selected().map(|t| t.recycle_policy()),
        Some(RecyclePolicy::PooledOnly)
    );
    let reuse = catalog.select("2.5.5").unwrap();
    assert_eq!(reuse.recycle_policy(), RecyclePolicy::Always);
    assert!(reuse.assistant_context().starts_with("Message reuse - "));
}

#[test]
fn test_every_concept_has_a_hint() {
    for topic in CURRICULUM {
        assert!(!topic.concept.hint().is_empty());
        assert!(!topic.objectives.is_empty());
    }
}
