//! Identities: persona instances carrying demographic and psychographic
//! attributes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Custom attribute key holding the member's activity level in `[0, 1]`.
pub const ACTIVITY_LEVEL_KEY: &str = "activity_level";

/// Custom attribute key holding the member's ordinal within its generation run.
pub const MEMBER_INDEX_KEY: &str = "member_index";

// ─────────────────────────────────────────────────────────────────
// Categorical Attributes
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn slug(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Five-point political scale, ordered from most liberal to most conservative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalLeaning {
    VeryLiberal,
    Liberal,
    Moderate,
    Conservative,
    VeryConservative,
}

impl PoliticalLeaning {
    /// All categories in scale order.
    pub fn all() -> &'static [PoliticalLeaning] {
        &[
            PoliticalLeaning::VeryLiberal,
            PoliticalLeaning::Liberal,
            PoliticalLeaning::Moderate,
            PoliticalLeaning::Conservative,
            PoliticalLeaning::VeryConservative,
        ]
    }

    /// Ordinal position on the scale (0..=4).
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Map a value in `[-1, 1]` onto the scale.
    pub fn from_score(value: f64) -> Self {
        if value < -0.6 {
            PoliticalLeaning::VeryLiberal
        } else if value < -0.2 {
            PoliticalLeaning::Liberal
        } else if value < 0.2 {
            PoliticalLeaning::Moderate
        } else if value < 0.6 {
            PoliticalLeaning::Conservative
        } else {
            PoliticalLeaning::VeryConservative
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            PoliticalLeaning::VeryLiberal => "very_liberal",
            PoliticalLeaning::Liberal => "liberal",
            PoliticalLeaning::Moderate => "moderate",
            PoliticalLeaning::Conservative => "conservative",
            PoliticalLeaning::VeryConservative => "very_conservative",
        }
    }
}

impl fmt::Display for PoliticalLeaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PoliticalLeaning {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.to_lowercase().replace('-', "_");
        PoliticalLeaning::all()
            .iter()
            .copied()
            .find(|p| p.slug() == slug)
            .ok_or_else(|| format!("Unknown political leaning '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocioeconomicStatus {
    LowIncome,
    LowerMiddle,
    Middle,
    UpperMiddle,
    HighIncome,
}

impl SocioeconomicStatus {
    /// Bin a value in `[0, 1]` at 0.2 / 0.4 / 0.6 / 0.8.
    pub fn from_score(value: f64) -> Self {
        if value < 0.2 {
            SocioeconomicStatus::LowIncome
        } else if value < 0.4 {
            SocioeconomicStatus::LowerMiddle
        } else if value < 0.6 {
            SocioeconomicStatus::Middle
        } else if value < 0.8 {
            SocioeconomicStatus::UpperMiddle
        } else {
            SocioeconomicStatus::HighIncome
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    Graduate,
    Bachelor,
    Associate,
    HighSchool,
    SomeHighSchool,
}

// ─────────────────────────────────────────────────────────────────
// Attribute Groups
// ─────────────────────────────────────────────────────────────────

/// Where a member lives. Place fields are only set when the generation
/// constraint named one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default)]
    pub urban: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Location {
    /// Label used for location spread: the city, else `urban` / `rural`.
    pub fn spread_label(&self) -> String {
        match &self.city {
            Some(city) => city.clone(),
            None if self.urban => "urban".to_string(),
            None => "rural".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Education>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socioeconomic_status: Option<SocioeconomicStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoliticalSocial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub political_leaning: Option<PoliticalLeaning>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Full attribute set of an identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichAttributes {
    #[serde(default)]
    pub demographics: Demographics,

    #[serde(default)]
    pub political_social: PoliticalSocial,

    #[serde(default)]
    pub preferences: Preferences,

    /// Free-form string attributes.
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

impl RichAttributes {
    /// Activity level stored in the custom map, if present and numeric.
    pub fn activity_level(&self) -> Option<f64> {
        self.custom
            .get(ACTIVITY_LEVEL_KEY)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

// ─────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────

/// A persona instance with its own attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Storage-assigned identifier (empty until persisted).
    #[serde(default)]
    pub id: String,

    pub persona_id: String,

    pub name: String,

    #[serde(default)]
    pub rich_attributes: RichAttributes,

    #[serde(default)]
    pub tags: Vec<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Build an unsaved identity.
    pub fn new(persona_id: impl Into<String>, name: impl Into<String>, attributes: RichAttributes) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            persona_id: persona_id.into(),
            name: name.into(),
            rich_attributes: attributes,
            tags: Vec::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn age(&self) -> Option<u32> {
        self.rich_attributes.demographics.age
    }

    pub fn political_leaning(&self) -> Option<PoliticalLeaning> {
        self.rich_attributes.political_social.political_leaning
    }

    pub fn interests(&self) -> &[String] {
        &self.rich_attributes.preferences.interests
    }

    pub fn location(&self) -> Option<&Location> {
        self.rich_attributes.demographics.location.as_ref()
    }
}
