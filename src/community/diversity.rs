//! Shannon-entropy diversity scoring.

use std::collections::HashMap;
use std::hash::Hash;

use crate::persona::Identity;

/// Diversity of a member set in `[0, 1]`.
///
/// Equal-weighted mean of four normalized Shannon scores: exact age, political
/// leaning, city, and interest tokens pooled across all members. Ages are
/// treated as discrete values, not ranges, so a population of mostly unique
/// ages scores close to the maximum on that component.
pub fn diversity_index(members: &[Identity]) -> f64 {
    if members.len() <= 1 {
        return 0.0;
    }

    let ages: Vec<u32> = members.iter().filter_map(Identity::age).collect();
    let leanings: Vec<_> = members.iter().filter_map(Identity::political_leaning).collect();
    let cities: Vec<&str> = members
        .iter()
        .filter_map(|m| m.location().and_then(|l| l.city.as_deref()))
        .collect();
    let interests: Vec<&str> = members
        .iter()
        .flat_map(|m| m.interests().iter().map(String::as_str))
        .collect();

    let scores = [
        shannon_diversity(&ages),
        shannon_diversity(&leanings),
        shannon_diversity(&cities),
        shannon_diversity(&interests),
    ];

    (scores.iter().sum::<f64>() / scores.len() as f64).clamp(0.0, 1.0)
}

/// Normalized Shannon entropy of `values`: `-Σ p·log2(p) / log2(distinct)`.
///
/// Zero when there is at most one observation or one distinct value.
pub fn shannon_diversity<T: Eq + Hash>(values: &[T]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let mut counts: HashMap<&T, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    if counts.len() <= 1 {
        return 0.0;
    }

    let total = values.len() as f64;
    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    (entropy / (counts.len() as f64).log2()).clamp(0.0, 1.0)
}
