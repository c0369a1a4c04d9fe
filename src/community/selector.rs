//! Weighted-random persona selection.

use std::collections::HashMap;

use crate::persona::Persona;

use super::random::RandomSource;

/// Weight used for personas absent from the map or given a non-positive weight.
const DEFAULT_WEIGHT: f64 = 1.0;

/// Choose one persona, honoring `weights` by persona id.
///
/// Returns `None` only for an empty catalog; callers report that as a
/// validation failure.
pub fn select_persona<'a>(
    personas: &'a [Persona],
    weights: &HashMap<String, f64>,
    rng: &mut dyn RandomSource,
) -> Option<&'a Persona> {
    if personas.is_empty() {
        return None;
    }
    if weights.is_empty() {
        return personas.get(rng.intn(personas.len()));
    }

    let resolved: Vec<f64> = personas.iter().map(|p| weight_for(&p.id, weights)).collect();
    let total: f64 = resolved.iter().sum();
    let target = rng.uniform() * total;

    let mut cumulative = 0.0;
    for (persona, weight) in personas.iter().zip(&resolved) {
        cumulative += weight;
        if cumulative >= target {
            return Some(persona);
        }
    }

    // Rounding overrun.
    personas.last()
}

fn weight_for(id: &str, weights: &HashMap<String, f64>) -> f64 {
    match weights.get(id) {
        Some(w) if w.is_finite() && *w > 0.0 => *w,
        _ => DEFAULT_WEIGHT,
    }
}
