//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use parking_lot::Mutex;

use persona_community::community::{Community, CommunityService, SeededRandom};
use persona_community::error::{Error, Result};
use persona_community::persona::{Identity, Persona};
use persona_community::storage::{MemoryStore, Storage};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Store pre-loaded with `count` personas.
pub fn store_with_personas(count: usize) -> MemoryStore {
    let store = MemoryStore::new();
    for i in 0..count {
        let mut persona = Persona::new(format!("Persona {}", i), format!("topic-{}", i), "You help.");
        store.create_persona(&mut persona).expect("create persona");
    }
    store
}

/// Deterministic service over an in-memory store.
pub fn seeded_service(personas: usize, seed: u64) -> CommunityService<MemoryStore> {
    CommunityService::with_random(store_with_personas(personas), Box::new(SeededRandom::new(seed)))
}

/// Store whose identity writes start failing after `succeed` successes.
pub struct FailingStore {
    pub inner: MemoryStore,
    remaining: Mutex<usize>,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, succeed: usize) -> Self {
        Self {
            inner,
            remaining: Mutex::new(succeed),
        }
    }
}

impl Storage for FailingStore {
    fn list_personas(&self) -> Result<Vec<Persona>> {
        self.inner.list_personas()
    }

    fn create_persona(&self, persona: &mut Persona) -> Result<()> {
        self.inner.create_persona(persona)
    }

    fn create_identity(&self, identity: &mut Identity) -> Result<()> {
        let mut remaining = self.remaining.lock();
        if *remaining == 0 {
            return Err(Error::storage("disk full"));
        }
        *remaining -= 1;
        self.inner.create_identity(identity)
    }

    fn get_identity(&self, id: &str) -> Result<Identity> {
        self.inner.get_identity(id)
    }

    fn list_identities(&self) -> Result<Vec<Identity>> {
        self.inner.list_identities()
    }

    fn create_community(&self, community: &mut Community) -> Result<()> {
        self.inner.create_community(community)
    }

    fn get_community(&self, id: &str) -> Result<Community> {
        self.inner.get_community(id)
    }

    fn update_community(&self, id: &str, community: &Community) -> Result<()> {
        self.inner.update_community(id, community)
    }

    fn list_communities(&self) -> Result<Vec<Community>> {
        self.inner.list_communities()
    }
}
