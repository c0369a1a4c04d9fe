//! Community generation and analytics.
//!
//! - [`random`]: injectable randomness (OS CSPRNG or seeded)
//! - [`selector`]: weighted persona choice
//! - [`synthesizer`]: per-member attribute draws
//! - [`builder`]: [`CommunityService`], generation and membership
//! - [`diversity`] / [`cohesion`]: population metrics
//! - [`stats`]: on-demand statistics

pub mod builder;
pub mod cohesion;
pub mod diversity;
pub mod random;
pub mod selector;
pub mod stats;
pub mod synthesizer;
pub mod types;

pub use builder::{CommunityService, GENERATED_TAG};
pub use cohesion::{cohesion_score, jaccard_similarity};
pub use diversity::{diversity_index, shannon_diversity};
pub use random::{OsRandom, RandomSource, SeededRandom};
pub use types::{
    AgeDistribution, Community, CommunityAttributes, CommunityStats, CommunityUpdate,
    GenerationConfig, LocationConstraint, LocationType,
};
