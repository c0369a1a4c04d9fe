//! Persona catalog and synthetic community generator.
//!
//! [`community::CommunityService`] turns a catalog of expert personas into
//! communities of synthesized identities, enforces membership limits, and
//! reports diversity, cohesion and engagement statistics. Persistence goes
//! through the [`storage::Storage`] trait.

pub mod cli;
pub mod community;
pub mod config;
pub mod error;
pub mod logging;
pub mod persona;
pub mod storage;
pub mod version;

pub use community::{Community, CommunityService, CommunityStats, GenerationConfig};
pub use error::{Error, Result};
pub use persona::{Identity, Persona};
