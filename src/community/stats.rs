//! On-demand community statistics.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;

use crate::error::Result;
use crate::persona::{Gender, Identity};
use crate::storage::Storage;

use super::builder::{average_age, location_spread, political_distribution, CommunityService};
use super::cohesion::cohesion_score;
use super::diversity::diversity_index;
use super::types::CommunityStats;

/// Activity above which a member counts as active.
const ACTIVE_THRESHOLD: f64 = 0.5;

impl<S: Storage> CommunityService<S> {
    /// Recompute statistics from the community's current members.
    ///
    /// Nothing is cached. Member ids that no longer resolve to an identity
    /// are left out of every aggregate.
    pub fn community_stats(&self, community_id: &str) -> Result<CommunityStats> {
        let community = self.get_community(community_id)?;
        let members = self.resolve_members(&community)?;

        debug!(
            community_id,
            listed = community.member_ids.len(),
            resolved = members.len(),
            "Computing community stats"
        );

        Ok(compute_stats(community_id, &members))
    }
}

/// Aggregate statistics over an already-resolved member set.
pub fn compute_stats(community_id: &str, members: &[Identity]) -> CommunityStats {
    let activity: Vec<f64> = members
        .iter()
        .filter_map(|m| m.rich_attributes.activity_level())
        .collect();

    let active_members = activity.iter().filter(|&&a| a > ACTIVE_THRESHOLD).count();
    let engagement_score = if activity.is_empty() {
        0.0
    } else {
        activity.iter().sum::<f64>() / activity.len() as f64
    };

    CommunityStats {
        community_id: community_id.to_string(),
        total_members: members.len(),
        active_members,
        average_age: average_age(members),
        location_spread: location_spread(members),
        political_distribution: political_distribution(members),
        diversity_index: diversity_index(members),
        cohesion_score: cohesion_score(members),
        gender_ratio: gender_ratio(members),
        engagement_score,
        computed_at: Utc::now(),
    }
}

fn gender_ratio(members: &[Identity]) -> BTreeMap<Gender, f64> {
    let genders: Vec<Gender> = members
        .iter()
        .filter_map(|m| m.rich_attributes.demographics.gender)
        .collect();

    let mut counts: BTreeMap<Gender, usize> = BTreeMap::new();
    for gender in &genders {
        *counts.entry(*gender).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(gender, count)| (gender, count as f64 / genders.len() as f64))
        .collect()
}
