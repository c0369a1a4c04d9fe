//! Persona catalog: expert prompt profiles and the identities instantiated
//! from them.

pub mod identity;
pub mod registry;
pub mod types;

pub use identity::{
    Demographics, Education, Gender, Identity, Location, PoliticalLeaning, PoliticalSocial,
    Preferences, RichAttributes, SocioeconomicStatus, ACTIVITY_LEVEL_KEY, MEMBER_INDEX_KEY,
};
pub use registry::PersonaRegistry;
pub use types::Persona;
