//! Bundled starter personas, compiled into the binary.

use tracing::{debug, info};

use crate::error::{Entity, Error, Result};
use crate::storage::Storage;

use super::types::Persona;

const BUNDLED: &[(&str, &str)] = &[
    ("data-scientist", include_str!("../../config/personas/data-scientist.toml")),
    ("security-analyst", include_str!("../../config/personas/security-analyst.toml")),
    ("urban-planner", include_str!("../../config/personas/urban-planner.toml")),
    ("historian", include_str!("../../config/personas/historian.toml")),
];

/// Registry of starter personas used to seed an empty catalog.
///
/// Only serves bundled definitions; stored personas live in the storage
/// collaborator.
pub struct PersonaRegistry;

impl PersonaRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Slugs of all bundled personas.
    pub fn slugs(&self) -> Vec<&'static str> {
        BUNDLED.iter().map(|(slug, _)| *slug).collect()
    }

    /// Parse one bundled persona by slug.
    pub fn get(&self, slug: &str) -> Result<Option<Persona>> {
        BUNDLED
            .iter()
            .find(|(s, _)| *s == slug)
            .map(|(s, raw)| parse_bundled(s, raw))
            .transpose()
    }

    /// Parse every bundled persona.
    pub fn bundled(&self) -> Result<Vec<Persona>> {
        BUNDLED.iter().map(|(slug, raw)| parse_bundled(slug, raw)).collect()
    }

    /// Store every bundled persona whose name is not already in the catalog.
    /// Returns the personas that were added.
    pub fn seed<S: Storage + ?Sized>(&self, storage: &S) -> Result<Vec<Persona>> {
        let existing: Vec<String> = storage.list_personas()?.into_iter().map(|p| p.name).collect();

        let mut added = Vec::new();
        for mut persona in self.bundled()? {
            if existing.contains(&persona.name) {
                debug!(name = %persona.name, "Persona already present, skipping");
                continue;
            }
            storage.create_persona(&mut persona)?;
            added.push(persona);
        }

        info!(added = added.len(), bundled = BUNDLED.len(), "Persona catalog seeded");
        Ok(added)
    }

    /// Store a single bundled persona unless one with its name exists.
    /// Returns `None` when it was already present.
    pub fn seed_one<S: Storage + ?Sized>(&self, storage: &S, slug: &str) -> Result<Option<Persona>> {
        let Some(mut persona) = self.get(slug)? else {
            debug!(slug, available = ?self.slugs(), "Unknown bundled persona");
            return Err(Error::not_found(Entity::Persona, slug));
        };

        if storage.list_personas()?.iter().any(|p| p.name == persona.name) {
            debug!(name = %persona.name, "Persona already present, skipping");
            return Ok(None);
        }
        storage.create_persona(&mut persona)?;
        info!(slug, persona_id = %persona.id, "Bundled persona seeded");
        Ok(Some(persona))
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bundled(slug: &str, raw: &str) -> Result<Persona> {
    let mut persona: Persona = toml::from_str(raw).map_err(|e| Error::ConfigParse {
        message: format!("bundled persona '{}': {}", slug, e),
        source: Some(e),
    })?;
    persona.prompt = persona.prompt.trim().to_string();
    Ok(persona)
}
