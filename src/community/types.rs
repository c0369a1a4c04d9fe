//! Community data model: generation input, the persisted community record,
//! and derived statistics.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::persona::{Gender, PoliticalLeaning};

// ─────────────────────────────────────────────────────────────────
// Generation Config
// ─────────────────────────────────────────────────────────────────

/// Normal distribution of member ages with optional skew and hard bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeDistribution {
    pub mean: f64,
    pub std_dev: f64,
    pub min_age: u32,
    pub max_age: u32,
    pub skewness: f64,
}

impl Default for AgeDistribution {
    fn default() -> Self {
        Self {
            mean: 35.0,
            std_dev: 12.0,
            min_age: 18,
            max_age: 80,
            skewness: 0.0,
        }
    }
}

/// Granularity of a location constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    City,
    Region,
    Country,
    Global,
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "city" => Ok(LocationType::City),
            "region" => Ok(LocationType::Region),
            "country" => Ok(LocationType::Country),
            "global" => Ok(LocationType::Global),
            _ => Err(format!(
                "Unknown location type '{}'. Valid: city, region, country, global",
                s
            )),
        }
    }
}

/// Where generated members may live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConstraint {
    #[serde(rename = "type")]
    pub location_type: LocationType,

    /// Candidate place names; empty means use the built-in fallback.
    pub locations: Vec<String>,

    /// Force every member urban (`true`) or rural (`false`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urban: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Default for LocationConstraint {
    fn default() -> Self {
        Self {
            location_type: LocationType::City,
            locations: Vec::new(),
            urban: None,
            timezone: None,
        }
    }
}

/// Statistical shape of a generated community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Relative selection weight per persona id; absent personas weigh 1.0.
    pub persona_weights: HashMap<String, f64>,

    pub age_distribution: AgeDistribution,

    pub location_constraint: LocationConstraint,

    /// Spread of political leaning around the center, `[0, 1]`.
    pub political_spread: f64,

    /// Breadth of interests per member, `[0, 1]`.
    pub interest_spread: f64,

    /// Upper bound of the socioeconomic draw, `[0, 1]`.
    pub socioeconomic_range: f64,

    /// Mean activity level, `[0, 1]`.
    pub activity_level: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            persona_weights: HashMap::new(),
            age_distribution: AgeDistribution::default(),
            location_constraint: LocationConstraint::default(),
            political_spread: 0.5,
            interest_spread: 0.5,
            socioeconomic_range: 0.5,
            activity_level: 0.5,
        }
    }
}

impl GenerationConfig {
    /// Reject configs the synthesizer cannot honor.
    pub fn validate(&self) -> Result<()> {
        let ages = &self.age_distribution;
        if ages.min_age > ages.max_age {
            return Err(Error::invalid_field(
                "age_distribution.min_age",
                format!("min_age {} exceeds max_age {}", ages.min_age, ages.max_age),
            ));
        }
        if !ages.mean.is_finite() {
            return Err(Error::invalid_field("age_distribution.mean", "mean must be finite"));
        }
        if !ages.std_dev.is_finite() || ages.std_dev < 0.0 {
            return Err(Error::invalid_field(
                "age_distribution.std_dev",
                "std_dev must be a finite, non-negative number",
            ));
        }
        if !ages.skewness.is_finite() {
            return Err(Error::invalid_field("age_distribution.skewness", "skewness must be finite"));
        }

        let spreads = [
            ("political_spread", self.political_spread),
            ("interest_spread", self.interest_spread),
            ("socioeconomic_range", self.socioeconomic_range),
            ("activity_level", self.activity_level),
        ];
        for (field, value) in spreads {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_field(
                    field,
                    format!("{} must be within [0, 1], got {}", field, value),
                ));
            }
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Community
// ─────────────────────────────────────────────────────────────────

/// Summary attributes computed when a community is generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityAttributes {
    pub average_age: f64,

    /// Fraction of members per political category.
    pub political_distribution: BTreeMap<PoliticalLeaning, f64>,

    /// Member count per city (or urban/rural label).
    pub location_spread: BTreeMap<String, usize>,
}

/// A set of identities with aggregate diversity and cohesion metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Storage-assigned identifier (empty until persisted).
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Free-form category such as "synthetic" or "focus-group".
    #[serde(rename = "type", default)]
    pub community_type: String,

    pub size: usize,

    pub member_ids: Vec<String>,

    pub max_members: usize,

    pub min_members: usize,

    pub diversity: f64,

    pub cohesion: f64,

    pub generation_config: GenerationConfig,

    #[serde(default)]
    pub attributes: CommunityAttributes,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub is_active: bool,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Community {
    /// Whether `identity_id` is listed as a member.
    pub fn has_member(&self, identity_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == identity_id)
    }
}

/// Partial update applied by `CommunityService::update_community`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub min_members: Option<usize>,
    pub max_members: Option<usize>,
    pub is_active: Option<bool>,
}

// ─────────────────────────────────────────────────────────────────
// Stats
// ─────────────────────────────────────────────────────────────────

/// Descriptive statistics recomputed from current member identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStats {
    pub community_id: String,
    pub total_members: usize,
    pub active_members: usize,
    pub average_age: f64,
    pub location_spread: BTreeMap<String, usize>,
    pub political_distribution: BTreeMap<PoliticalLeaning, f64>,
    pub diversity_index: f64,
    pub cohesion_score: f64,
    pub gender_ratio: BTreeMap<Gender, f64>,
    pub engagement_score: f64,
    pub computed_at: DateTime<Utc>,
}

impl fmt::Display for CommunityStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Community {}", self.community_id)?;
        writeln!(f, "  Members:     {} ({} active)", self.total_members, self.active_members)?;
        writeln!(f, "  Average age: {:.1}", self.average_age)?;
        writeln!(f, "  Diversity:   {:.3}", self.diversity_index)?;
        writeln!(f, "  Cohesion:    {:.3}", self.cohesion_score)?;
        writeln!(f, "  Engagement:  {:.3}", self.engagement_score)?;
        Ok(())
    }
}
