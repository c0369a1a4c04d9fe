//! Community engine integration tests
//!
//! Exercises generation, membership limits and statistics against the
//! in-memory store with seeded randomness.

mod common;

use std::collections::HashSet;

use common::{seeded_service, store_with_personas, FailingStore};
use persona_community::community::{
    AgeDistribution, CommunityService, GenerationConfig, LocationConstraint, LocationType, SeededRandom,
};
use persona_community::error::{ConstraintViolation, Error};
use persona_community::persona::{Identity, Persona, RichAttributes};
use persona_community::storage::{FileStore, Storage};
use tempfile::TempDir;

fn spare_identity(service: &CommunityService<persona_community::storage::MemoryStore>) -> String {
    let mut identity = Identity::new("external", "Walk In", RichAttributes::default());
    service.storage().create_identity(&mut identity).unwrap();
    identity.id
}

// ─────────────────────────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_five_member_community_respects_age_bounds() {
    let service = seeded_service(2, 42);
    let config = GenerationConfig {
        age_distribution: AgeDistribution {
            mean: 35.0,
            std_dev: 10.0,
            min_age: 18,
            max_age: 65,
            skewness: 0.0,
        },
        ..Default::default()
    };

    let community = service
        .generate_community(&config, "Five", "five members", "synthetic", 5)
        .unwrap();

    assert_eq!(community.size, 5);
    assert_eq!(community.member_ids.len(), 5);
    for id in &community.member_ids {
        let age = service.storage().get_identity(id).unwrap().age().unwrap();
        assert!((18..=65).contains(&age), "age {} out of bounds", age);
    }

    let stored = service.get_community(&community.id).unwrap();
    assert_eq!(stored.member_ids, community.member_ids);
    assert_eq!(stored.generation_config, config);
}

#[test]
fn test_zero_personas_is_validation_error_and_persists_nothing() {
    let service = seeded_service(0, 1);
    let err = service
        .generate_community(&GenerationConfig::default(), "Nobody", "", "synthetic", 3)
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(service.storage().identity_count(), 0);
    assert_eq!(service.storage().community_count(), 0);
}

#[test]
fn test_invalid_config_is_rejected_before_any_write() {
    let service = seeded_service(2, 1);
    let mut config = GenerationConfig::default();
    config.age_distribution.min_age = 70;
    config.age_distribution.max_age = 20;

    let err = service
        .generate_community(&config, "Upside down", "", "synthetic", 3)
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(service.storage().identity_count(), 0);
}

/// Generation is not transactional: identities written before a storage
/// failure remain, and no community references them.
#[test]
fn test_partial_failure_leaves_orphaned_identities() {
    let store = FailingStore::new(store_with_personas(2), 3);
    let service = CommunityService::with_random(store, Box::new(SeededRandom::new(9)));

    let err = service
        .generate_community(&GenerationConfig::default(), "Flaky", "", "synthetic", 5)
        .unwrap_err();

    assert!(matches!(err, Error::Storage { .. }));
    assert_eq!(service.storage().inner.identity_count(), 3);
    assert_eq!(service.storage().inner.community_count(), 0);
}

#[test]
fn test_same_seed_generates_same_members() {
    let names = |seed| {
        let service = seeded_service(3, seed);
        let community = service
            .generate_community(&GenerationConfig::default(), "Twin", "", "synthetic", 6)
            .unwrap();
        community
            .member_ids
            .iter()
            .map(|id| {
                let identity = service.storage().get_identity(id).unwrap();
                (identity.name.clone(), identity.age(), identity.political_leaning())
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(names(7), names(7));
}

#[test]
fn test_generation_bounds_hold_across_seeds() {
    let configs = [
        GenerationConfig {
            age_distribution: AgeDistribution {
                mean: 40.0,
                std_dev: 1000.0,
                min_age: 21,
                max_age: 60,
                skewness: 5.0,
            },
            interest_spread: 1.0,
            political_spread: 1.0,
            ..Default::default()
        },
        GenerationConfig {
            age_distribution: AgeDistribution {
                mean: 30.0,
                std_dev: 0.0,
                min_age: 30,
                max_age: 30,
                skewness: -3.0,
            },
            interest_spread: 0.0,
            political_spread: 0.0,
            location_constraint: LocationConstraint {
                location_type: LocationType::Global,
                locations: vec!["Lagos".into(), "Lima".into()],
                urban: Some(false),
                timezone: None,
            },
            ..Default::default()
        },
    ];

    for seed in 0..10 {
        for config in &configs {
            let service = seeded_service(3, seed);
            let community = service
                .generate_community(config, "Bounds", "", "synthetic", 8)
                .unwrap();

            assert!((0.0..=1.0).contains(&community.diversity));
            assert!((0.0..=1.0).contains(&community.cohesion));

            for id in &community.member_ids {
                let identity = service.storage().get_identity(id).unwrap();
                let age = identity.age().unwrap();
                let ages = &config.age_distribution;
                assert!(age >= ages.min_age && age <= ages.max_age);

                let interests = identity.interests();
                assert!((2..=12).contains(&interests.len()));
                let distinct: HashSet<&String> = interests.iter().collect();
                assert_eq!(distinct.len(), interests.len());

                assert!(identity.political_leaning().is_some());
                let activity = identity.rich_attributes.activity_level().unwrap();
                assert!((0.0..=1.0).contains(&activity));
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Membership
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_add_member_at_capacity_is_rejected() {
    let service = seeded_service(2, 3);
    let community = service
        .generate_community(&GenerationConfig::default(), "Full", "", "synthetic", 2)
        .unwrap();
    assert_eq!(community.max_members, 4);

    for _ in 0..2 {
        let id = spare_identity(&service);
        service.add_member(&community.id, &id).unwrap();
    }
    let before = service.get_community(&community.id).unwrap().member_ids;
    assert_eq!(before.len(), 4);

    let extra = spare_identity(&service);
    let err = service.add_member(&community.id, &extra).unwrap_err();
    assert!(err.is_constraint());
    assert!(matches!(
        err,
        Error::Constraint(ConstraintViolation::CommunityFull { max_members: 4, .. })
    ));

    let after = service.get_community(&community.id).unwrap();
    assert_eq!(after.member_ids, before);
    assert_eq!(after.size, 4);
}

#[test]
fn test_failed_save_leaves_membership_unchanged() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("store.json");
    let store = FileStore::open(&path).unwrap();
    let mut persona = Persona::new("Chef", "cooking", "You cook.");
    store.create_persona(&mut persona).unwrap();

    let service = CommunityService::with_random(store, Box::new(SeededRandom::new(11)));
    let community = service
        .generate_community(&GenerationConfig::default(), "Durable", "", "synthetic", 2)
        .unwrap();
    let mut walk_in = Identity::new(&persona.id, "Walk In", RichAttributes::default());
    service.storage().create_identity(&mut walk_in).unwrap();

    // A directory on the temp path makes the next save fail
    std::fs::create_dir_all(path.with_extension("json.tmp")).unwrap();

    let err = service.add_member(&community.id, &walk_in.id).unwrap_err();
    assert!(matches!(err, Error::Storage { .. }));

    let current = service.get_community(&community.id).unwrap();
    assert_eq!(current.member_ids, community.member_ids);
    assert_eq!(service.community_stats(&community.id).unwrap().total_members, 2);

    let err = service.remove_member(&community.id, &community.member_ids[0]).unwrap_err();
    assert!(matches!(err, Error::Storage { .. }));
    assert_eq!(service.get_community(&community.id).unwrap().size, 2);
}

#[test]
fn test_add_existing_member_is_rejected() {
    let service = seeded_service(1, 3);
    let community = service
        .generate_community(&GenerationConfig::default(), "Dupes", "", "synthetic", 3)
        .unwrap();

    let err = service
        .add_member(&community.id, &community.member_ids[0])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Constraint(ConstraintViolation::AlreadyMember { .. })
    ));
}

#[test]
fn test_add_unknown_identity_or_community_is_not_found() {
    let service = seeded_service(1, 3);
    let community = service
        .generate_community(&GenerationConfig::default(), "Lookup", "", "synthetic", 2)
        .unwrap();

    assert!(service.add_member(&community.id, "ghost").unwrap_err().is_not_found());
    let id = spare_identity(&service);
    assert!(service.add_member("nowhere", &id).unwrap_err().is_not_found());
}

#[test]
fn test_remove_below_minimum_is_rejected() {
    let service = seeded_service(2, 5);
    let community = service
        .generate_community(&GenerationConfig::default(), "Small", "", "synthetic", 4)
        .unwrap();
    assert_eq!(community.min_members, 2);

    let updated = service
        .remove_member(&community.id, &community.member_ids[0])
        .unwrap();
    assert_eq!(updated.size, 3);
    let updated = service
        .remove_member(&community.id, &community.member_ids[1])
        .unwrap();
    assert_eq!(updated.size, 2);

    let before = service.get_community(&community.id).unwrap().member_ids;
    let err = service
        .remove_member(&community.id, &community.member_ids[2])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Constraint(ConstraintViolation::BelowMinimum { min_members: 2, .. })
    ));
    assert_eq!(service.get_community(&community.id).unwrap().member_ids, before);
}

#[test]
fn test_remove_non_member_is_rejected() {
    let service = seeded_service(1, 5);
    let community = service
        .generate_community(&GenerationConfig::default(), "Strangers", "", "synthetic", 4)
        .unwrap();
    let outsider = spare_identity(&service);

    let err = service.remove_member(&community.id, &outsider).unwrap_err();
    assert!(matches!(
        err,
        Error::Constraint(ConstraintViolation::NotAMember { .. })
    ));
}

#[test]
fn test_membership_changes_keep_generation_metrics() {
    let service = seeded_service(2, 11);
    let community = service
        .generate_community(&GenerationConfig::default(), "Stable", "", "synthetic", 4)
        .unwrap();
    let id = spare_identity(&service);

    let updated = service.add_member(&community.id, &id).unwrap();
    assert_eq!(updated.diversity, community.diversity);
    assert_eq!(updated.cohesion, community.cohesion);
    assert_eq!(updated.attributes, community.attributes);
}

// ─────────────────────────────────────────────────────────────────
// Statistics
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_stats_follow_current_members() {
    let service = seeded_service(2, 21);
    let community = service
        .generate_community(&GenerationConfig::default(), "Counted", "", "synthetic", 6)
        .unwrap();

    let stats = service.community_stats(&community.id).unwrap();
    assert_eq!(stats.community_id, community.id);
    assert_eq!(stats.total_members, 6);
    assert!(stats.active_members <= stats.total_members);
    assert!((stats.diversity_index - community.diversity).abs() < 1e-12);
    assert!((stats.cohesion_score - community.cohesion).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&stats.engagement_score));

    let gender_total: f64 = stats.gender_ratio.values().sum();
    assert!((gender_total - 1.0).abs() < 1e-9);
    let political_total: f64 = stats.political_distribution.values().sum();
    assert!((political_total - 1.0).abs() < 1e-9);
    assert_eq!(stats.location_spread.values().sum::<usize>(), 6);

    let id = spare_identity(&service);
    service.add_member(&community.id, &id).unwrap();
    assert_eq!(service.community_stats(&community.id).unwrap().total_members, 7);
}

#[test]
fn test_stats_skip_deleted_members() {
    let service = seeded_service(2, 8);
    let community = service
        .generate_community(&GenerationConfig::default(), "Gaps", "", "synthetic", 4)
        .unwrap();

    service
        .storage()
        .delete_identity(&community.member_ids[0])
        .unwrap();

    let stats = service.community_stats(&community.id).unwrap();
    assert_eq!(stats.total_members, 3);
    assert_eq!(stats.location_spread.values().sum::<usize>(), 3);
}

#[test]
fn test_stats_for_unknown_community() {
    let service = seeded_service(1, 8);
    assert!(service.community_stats("missing").unwrap_err().is_not_found());
}
