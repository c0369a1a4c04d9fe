//! Storage collaborator used by the community engine.
//!
//! The engine only needs a handful of CRUD operations; implementations own
//! their locking and persistence.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::{MemoryStore, Snapshot};

use crate::community::Community;
use crate::error::Result;
use crate::persona::{Identity, Persona};

/// CRUD operations over personas, identities and communities.
///
/// `create_*` methods assign the record's id and timestamps in place.
pub trait Storage: Send + Sync {
    fn list_personas(&self) -> Result<Vec<Persona>>;

    fn create_persona(&self, persona: &mut Persona) -> Result<()>;

    fn create_identity(&self, identity: &mut Identity) -> Result<()>;

    /// Fails with `Error::NotFound` for an unknown id.
    fn get_identity(&self, id: &str) -> Result<Identity>;

    fn list_identities(&self) -> Result<Vec<Identity>>;

    fn create_community(&self, community: &mut Community) -> Result<()>;

    /// Fails with `Error::NotFound` for an unknown id.
    fn get_community(&self, id: &str) -> Result<Community>;

    fn update_community(&self, id: &str, community: &Community) -> Result<()>;

    fn list_communities(&self) -> Result<Vec<Community>>;
}
