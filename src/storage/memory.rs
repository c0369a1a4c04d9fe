//! In-process store backed by hash maps behind a reader/writer lock.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::community::Community;
use crate::error::{Entity, Error, Result};
use crate::persona::{Identity, Persona};

use super::Storage;

/// Serializable image of everything a store holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub personas: HashMap<String, Persona>,
    pub identities: HashMap<String, Identity>,
    pub communities: HashMap<String, Community>,
}

/// Thread-safe in-memory [`Storage`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved contents.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Snapshot {
        self.state.read().clone()
    }

    /// Replace the current contents wholesale.
    pub fn restore(&self, snapshot: Snapshot) {
        *self.state.write() = snapshot;
    }

    pub fn identity_count(&self) -> usize {
        self.state.read().identities.len()
    }

    pub fn community_count(&self) -> usize {
        self.state.read().communities.len()
    }

    /// Remove an identity outright. Community member lists are not touched.
    pub fn delete_identity(&self, id: &str) -> Result<()> {
        self.state
            .write()
            .identities
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(Entity::Identity, id))
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Storage for MemoryStore {
    fn list_personas(&self) -> Result<Vec<Persona>> {
        let mut personas: Vec<Persona> = self.state.read().personas.values().cloned().collect();
        personas.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(personas)
    }

    fn create_persona(&self, persona: &mut Persona) -> Result<()> {
        let now = Utc::now();
        persona.id = new_id();
        persona.created_at = now;
        persona.updated_at = now;
        self.state.write().personas.insert(persona.id.clone(), persona.clone());
        Ok(())
    }

    fn create_identity(&self, identity: &mut Identity) -> Result<()> {
        let now = Utc::now();
        identity.id = new_id();
        identity.created_at = now;
        identity.updated_at = now;
        self.state.write().identities.insert(identity.id.clone(), identity.clone());
        Ok(())
    }

    fn get_identity(&self, id: &str) -> Result<Identity> {
        self.state
            .read()
            .identities
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(Entity::Identity, id))
    }

    fn list_identities(&self) -> Result<Vec<Identity>> {
        let mut identities: Vec<Identity> = self.state.read().identities.values().cloned().collect();
        identities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(identities)
    }

    fn create_community(&self, community: &mut Community) -> Result<()> {
        let now = Utc::now();
        community.id = new_id();
        community.created_at = now;
        community.updated_at = now;
        self.state.write().communities.insert(community.id.clone(), community.clone());
        Ok(())
    }

    fn get_community(&self, id: &str) -> Result<Community> {
        self.state
            .read()
            .communities
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(Entity::Community, id))
    }

    fn update_community(&self, id: &str, community: &Community) -> Result<()> {
        let mut state = self.state.write();
        let slot = state
            .communities
            .get_mut(id)
            .ok_or_else(|| Error::not_found(Entity::Community, id))?;

        let mut updated = community.clone();
        updated.id = id.to_string();
        updated.created_at = slot.created_at;
        *slot = updated;
        Ok(())
    }

    fn list_communities(&self) -> Result<Vec<Community>> {
        let mut communities: Vec<Community> = self.state.read().communities.values().cloned().collect();
        communities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(communities)
    }
}
