//! Community service: generation and membership management.
//!
//! Constructed once with its storage collaborator and randomness source and
//! shared by reference; there is no global default instance.

use std::collections::BTreeMap;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ConstraintViolation, Error, Result};
use crate::persona::{Identity, PoliticalLeaning};
use crate::storage::Storage;

use super::cohesion::cohesion_score;
use super::diversity::diversity_index;
use super::random::{OsRandom, RandomSource};
use super::selector::select_persona;
use super::synthesizer::synthesize_attributes;
use super::types::{Community, CommunityAttributes, CommunityUpdate, GenerationConfig};

/// Tag attached to every generated identity.
pub const GENERATED_TAG: &str = "community-generated";

const FIRST_NAMES: &[&str] = &[
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Avery", "Quinn", "Sam", "Jamie",
    "Drew", "Reese", "Parker", "Skyler", "Rowan", "Emerson", "Hayden", "Finley", "Sage", "Kai",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas", "Moore", "Jackson",
    "Martin", "Lee", "Thompson",
];

/// Generates communities and manages their membership.
pub struct CommunityService<S: Storage> {
    storage: S,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl<S: Storage> CommunityService<S> {
    /// Service drawing from the OS CSPRNG.
    pub fn new(storage: S) -> Self {
        Self::with_random(storage, Box::new(OsRandom))
    }

    /// Service with a substitute randomness source.
    pub fn with_random(storage: S, rng: Box<dyn RandomSource>) -> Self {
        Self {
            storage,
            rng: Mutex::new(rng),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ─────────────────────────────────────────────────────────────
    // Generation
    // ─────────────────────────────────────────────────────────────

    /// Synthesize and persist `target_size` identities, then persist a
    /// community referencing them.
    ///
    /// Identities are written one at a time. If a write fails the call
    /// returns that error immediately and identities saved earlier in the
    /// run stay in storage, unreferenced by any community.
    pub fn generate_community(
        &self,
        config: &GenerationConfig,
        name: &str,
        description: &str,
        community_type: &str,
        target_size: usize,
    ) -> Result<Community> {
        if target_size == 0 {
            return Err(Error::invalid_field("target_size", "target size must be greater than zero"));
        }
        config.validate()?;
        let max_members = target_size.checked_mul(2).ok_or_else(|| {
            Error::invalid_field("target_size", format!("target size {} is too large", target_size))
        })?;

        let personas = self.storage.list_personas()?;
        if personas.is_empty() {
            return Err(Error::invalid_field("personas", "no personas available for community generation"));
        }

        info!(
            name = %name,
            target_size,
            personas = personas.len(),
            weighted = !config.persona_weights.is_empty(),
            "Generating community"
        );

        let mut members = Vec::with_capacity(target_size);
        {
            let mut guard = self.rng.lock();
            let rng: &mut dyn RandomSource = &mut **guard;
            for index in 0..target_size {
                let persona = select_persona(&personas, &config.persona_weights, rng)
                    .ok_or_else(|| Error::invalid_field("personas", "persona catalog is empty"))?;
                let attributes = synthesize_attributes(config, index, rng);
                let member_name = generated_name(rng);

                let mut identity = Identity::new(&persona.id, member_name, attributes);
                identity.tags.push(GENERATED_TAG.to_string());

                if let Err(e) = self.storage.create_identity(&mut identity) {
                    warn!(
                        index,
                        persisted = members.len(),
                        error = %e,
                        "Identity persistence failed, aborting generation"
                    );
                    return Err(e);
                }
                debug!(index, identity_id = %identity.id, persona_id = %persona.id, "Member generated");
                members.push(identity);
            }
        }

        let now = Utc::now();
        let mut community = Community {
            id: String::new(),
            name: name.to_string(),
            description: description.to_string(),
            community_type: community_type.to_string(),
            size: 0,
            member_ids: members.iter().map(|m| m.id.clone()).collect(),
            max_members,
            min_members: (target_size / 2).max(1),
            diversity: diversity_index(&members),
            cohesion: cohesion_score(&members),
            generation_config: config.clone(),
            attributes: summarize(&members),
            created_at: now,
            updated_at: now,
            is_active: true,
            tags: vec![GENERATED_TAG.to_string()],
        };
        community.size = community.member_ids.len();

        self.storage.create_community(&mut community)?;

        info!(
            community_id = %community.id,
            size = community.size,
            diversity = community.diversity,
            cohesion = community.cohesion,
            "Community generated"
        );
        Ok(community)
    }

    // ─────────────────────────────────────────────────────────────
    // Membership
    // ─────────────────────────────────────────────────────────────

    pub fn add_member(&self, community_id: &str, identity_id: &str) -> Result<Community> {
        let mut community = self.storage.get_community(community_id)?;
        self.storage.get_identity(identity_id)?;

        if community.has_member(identity_id) {
            return Err(ConstraintViolation::AlreadyMember {
                community_id: community_id.to_string(),
                identity_id: identity_id.to_string(),
            }
            .into());
        }
        if community.size >= community.max_members {
            return Err(ConstraintViolation::CommunityFull {
                community_id: community_id.to_string(),
                max_members: community.max_members,
            }
            .into());
        }

        community.member_ids.push(identity_id.to_string());
        community.size = community.member_ids.len();
        community.updated_at = Utc::now();
        self.storage.update_community(community_id, &community)?;

        info!(community_id, identity_id, size = community.size, "Member added");
        Ok(community)
    }

    pub fn remove_member(&self, community_id: &str, identity_id: &str) -> Result<Community> {
        let mut community = self.storage.get_community(community_id)?;

        let position = community
            .member_ids
            .iter()
            .position(|id| id == identity_id)
            .ok_or_else(|| ConstraintViolation::NotAMember {
                community_id: community_id.to_string(),
                identity_id: identity_id.to_string(),
            })?;

        if community.size.saturating_sub(1) < community.min_members {
            return Err(ConstraintViolation::BelowMinimum {
                community_id: community_id.to_string(),
                min_members: community.min_members,
            }
            .into());
        }

        community.member_ids.remove(position);
        community.size = community.member_ids.len();
        community.updated_at = Utc::now();
        self.storage.update_community(community_id, &community)?;

        info!(community_id, identity_id, size = community.size, "Member removed");
        Ok(community)
    }

    // ─────────────────────────────────────────────────────────────
    // Lookup / Update
    // ─────────────────────────────────────────────────────────────

    pub fn get_community(&self, community_id: &str) -> Result<Community> {
        self.storage.get_community(community_id)
    }

    pub fn list_communities(&self) -> Result<Vec<Community>> {
        self.storage.list_communities()
    }

    /// Apply a partial update. Member limits must stay ordered.
    pub fn update_community(&self, community_id: &str, update: CommunityUpdate) -> Result<Community> {
        let mut community = self.storage.get_community(community_id)?;

        let min = update.min_members.unwrap_or(community.min_members);
        let max = update.max_members.unwrap_or(community.max_members);
        if min > max {
            return Err(Error::invalid_field(
                "min_members",
                format!("min_members {} exceeds max_members {}", min, max),
            ));
        }

        if let Some(name) = update.name {
            community.name = name;
        }
        if let Some(description) = update.description {
            community.description = description;
        }
        if let Some(tags) = update.tags {
            community.tags = tags;
        }
        if let Some(active) = update.is_active {
            community.is_active = active;
        }
        community.min_members = min;
        community.max_members = max;
        community.updated_at = Utc::now();

        self.storage.update_community(community_id, &community)?;
        debug!(community_id, "Community updated");
        Ok(community)
    }

    /// Resolve member ids to identities, skipping any that no longer exist.
    pub(crate) fn resolve_members(&self, community: &Community) -> Result<Vec<Identity>> {
        let mut members = Vec::with_capacity(community.member_ids.len());
        for id in &community.member_ids {
            match self.storage.get_identity(id) {
                Ok(identity) => members.push(identity),
                Err(Error::NotFound { .. }) => {
                    debug!(community_id = %community.id, identity_id = %id, "Skipping missing member");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(members)
    }
}

fn generated_name(rng: &mut dyn RandomSource) -> String {
    let first = FIRST_NAMES[rng.intn(FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.intn(LAST_NAMES.len())];
    format!("{} {}", first, last)
}

/// Average age, fractional political mix and location counts.
pub(crate) fn summarize(members: &[Identity]) -> CommunityAttributes {
    CommunityAttributes {
        average_age: average_age(members),
        political_distribution: political_distribution(members),
        location_spread: location_spread(members),
    }
}

pub(crate) fn average_age(members: &[Identity]) -> f64 {
    let ages: Vec<f64> = members.iter().filter_map(Identity::age).map(f64::from).collect();
    if ages.is_empty() {
        return 0.0;
    }
    ages.iter().sum::<f64>() / ages.len() as f64
}

pub(crate) fn political_distribution(members: &[Identity]) -> BTreeMap<PoliticalLeaning, f64> {
    let leanings: Vec<PoliticalLeaning> = members.iter().filter_map(Identity::political_leaning).collect();
    let mut counts: BTreeMap<PoliticalLeaning, usize> = BTreeMap::new();
    for leaning in &leanings {
        *counts.entry(*leaning).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(leaning, count)| (leaning, count as f64 / leanings.len() as f64))
        .collect()
}

pub(crate) fn location_spread(members: &[Identity]) -> BTreeMap<String, usize> {
    let mut spread = BTreeMap::new();
    for location in members.iter().filter_map(Identity::location) {
        *spread.entry(location.spread_label()).or_insert(0) += 1;
    }
    spread
}
