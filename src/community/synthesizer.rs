//! Attribute synthesis for one generated member.
//!
//! Every attribute is drawn independently from the [`GenerationConfig`]; the
//! member index is recorded for reference only and never influences a draw.

use std::collections::BTreeMap;

use crate::persona::{
    Demographics, Education, Gender, Location, PoliticalLeaning, PoliticalSocial, Preferences,
    RichAttributes, SocioeconomicStatus, ACTIVITY_LEVEL_KEY, MEMBER_INDEX_KEY,
};

use super::random::RandomSource;
use super::types::{AgeDistribution, GenerationConfig, LocationConstraint, LocationType};

// ─────────────────────────────────────────────────────────────────
// Vocabularies
// ─────────────────────────────────────────────────────────────────

/// Fallback cities for a `city` constraint with no locations.
pub const DEFAULT_CITIES: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "Austin",
    "Seattle",
    "Denver",
    "Boston",
    "Atlanta",
    "Miami",
];

/// Interest vocabulary members draw from.
pub const INTERESTS: &[&str] = &[
    "technology",
    "sports",
    "music",
    "art",
    "travel",
    "cooking",
    "reading",
    "gaming",
    "fitness",
    "photography",
    "movies",
    "fashion",
    "science",
    "politics",
    "nature",
    "history",
    "finance",
    "gardening",
    "volunteering",
    "education",
];

/// Interests every member gets on top of the spread-driven count.
const MIN_INTERESTS: usize = 2;

/// Standard deviation of a member's activity around the configured level.
const ACTIVITY_STD_DEV: f64 = 0.2;

/// Probability a member is urban when the constraint leaves it open.
const RURAL_PROBABILITY: f64 = 0.3;

// ─────────────────────────────────────────────────────────────────
// Synthesis
// ─────────────────────────────────────────────────────────────────

/// Produce the full attribute set for member `index`.
pub fn synthesize_attributes(
    config: &GenerationConfig,
    index: usize,
    rng: &mut dyn RandomSource,
) -> RichAttributes {
    let age = generate_age(&config.age_distribution, rng);
    let location = generate_location(&config.location_constraint, rng);
    let leaning = generate_political_leaning(config.political_spread, rng);
    let status = generate_socioeconomic_status(config.socioeconomic_range, rng);
    let interests = generate_interests(config.interest_spread, rng);
    let activity = generate_activity_level(config.activity_level, rng);
    let gender = generate_gender(rng);
    let education = generate_education(age, rng);

    let mut custom = BTreeMap::new();
    custom.insert(ACTIVITY_LEVEL_KEY.to_string(), format!("{:.3}", activity));
    custom.insert(MEMBER_INDEX_KEY.to_string(), index.to_string());

    RichAttributes {
        demographics: Demographics {
            age: Some(age),
            gender: Some(gender),
            location: Some(location),
            education: Some(education),
            socioeconomic_status: Some(status),
        },
        political_social: PoliticalSocial {
            political_leaning: Some(leaning),
        },
        preferences: Preferences { interests },
        custom,
    }
}

/// Normal draw, optionally skewed, rounded and clamped into the age bounds.
pub fn generate_age(dist: &AgeDistribution, rng: &mut dyn RandomSource) -> u32 {
    let mut age = dist.mean + dist.std_dev * rng.normal();
    if dist.skewness != 0.0 {
        age += dist.skewness * (age - dist.mean) * 0.5;
    }
    if age.is_nan() {
        age = dist.mean;
    }

    let min = f64::from(dist.min_age);
    let max = f64::from(dist.max_age);
    age.round().max(min).min(max) as u32
}

pub fn generate_location(constraint: &LocationConstraint, rng: &mut dyn RandomSource) -> Location {
    let picked = if constraint.locations.is_empty() {
        None
    } else {
        Some(constraint.locations[rng.intn(constraint.locations.len())].clone())
    };

    let mut location = Location {
        timezone: constraint.timezone.clone(),
        ..Default::default()
    };

    match constraint.location_type {
        LocationType::City => {
            location.city = picked
                .or_else(|| Some(DEFAULT_CITIES[rng.intn(DEFAULT_CITIES.len())].to_string()));
        }
        LocationType::Region => location.region = picked,
        LocationType::Country => location.country = picked,
        LocationType::Global => location.city = picked,
    }

    location.urban = match constraint.urban {
        Some(urban) => urban,
        None => rng.uniform() > RURAL_PROBABILITY,
    };

    location
}

pub fn generate_political_leaning(spread: f64, rng: &mut dyn RandomSource) -> PoliticalLeaning {
    let value = (rng.normal() * spread).clamp(-1.0, 1.0);
    PoliticalLeaning::from_score(value)
}

pub fn generate_socioeconomic_status(range: f64, rng: &mut dyn RandomSource) -> SocioeconomicStatus {
    SocioeconomicStatus::from_score(rng.uniform() * range)
}

/// Distinct interests, `round(spread * 10) + 2` of them, capped at the vocabulary size.
pub fn generate_interests(spread: f64, rng: &mut dyn RandomSource) -> Vec<String> {
    let count = ((spread * 10.0).round().max(0.0) as usize + MIN_INTERESTS).min(INTERESTS.len());
    rng.permutation(INTERESTS.len())
        .into_iter()
        .take(count)
        .map(|i| INTERESTS[i].to_string())
        .collect()
}

pub fn generate_activity_level(base: f64, rng: &mut dyn RandomSource) -> f64 {
    (base + rng.normal() * ACTIVITY_STD_DEV).clamp(0.0, 1.0)
}

pub fn generate_gender(rng: &mut dyn RandomSource) -> Gender {
    if rng.intn(2) == 0 {
        Gender::Male
    } else {
        Gender::Female
    }
}

/// Younger members are more likely to hold advanced credentials.
pub fn generate_education(age: u32, rng: &mut dyn RandomSource) -> Education {
    let base = match age {
        0..=29 => 0.6,
        30..=50 => 0.4,
        _ => 0.3,
    };

    let draw = rng.uniform();
    if draw < base * 0.4 {
        Education::Graduate
    } else if draw < base {
        Education::Bachelor
    } else if draw < base * 1.4 {
        Education::Associate
    } else if draw < 0.95 {
        Education::HighSchool
    } else {
        Education::SomeHighSchool
    }
}
