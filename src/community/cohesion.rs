//! Pairwise-similarity cohesion scoring.

use std::collections::HashSet;

use crate::persona::Identity;

/// Age gap at which age similarity bottoms out.
const AGE_SIMILARITY_SPAN: f64 = 50.0;

/// Largest possible rank gap on the five-point political scale.
const POLITICAL_RANK_SPAN: f64 = 4.0;

/// Mean similarity over every unordered member pair, in `[0, 1]`.
///
/// A lone member is perfectly cohesive; an empty community scores 0.
pub fn cohesion_score(members: &[Identity]) -> f64 {
    match members.len() {
        0 => return 0.0,
        1 => return 1.0,
        _ => {}
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            total += pair_similarity(a, b);
            pairs += 1;
        }
    }

    (total / pairs as f64).clamp(0.0, 1.0)
}

/// Mean of the similarity components both members can be compared on.
pub fn pair_similarity(a: &Identity, b: &Identity) -> f64 {
    let mut components = Vec::with_capacity(3);

    if let (Some(x), Some(y)) = (a.age(), b.age()) {
        let gap = (f64::from(x) - f64::from(y)).abs();
        components.push((1.0 - gap / AGE_SIMILARITY_SPAN).max(0.0));
    }

    if let (Some(x), Some(y)) = (a.political_leaning(), b.political_leaning()) {
        let gap = (f64::from(x.rank()) - f64::from(y.rank())).abs();
        components.push((1.0 - gap / POLITICAL_RANK_SPAN).max(0.0));
    }

    if !a.interests().is_empty() && !b.interests().is_empty() {
        components.push(jaccard_similarity(a.interests(), b.interests()));
    }

    if components.is_empty() {
        return 0.0;
    }
    components.iter().sum::<f64>() / components.len() as f64
}

/// |A ∩ B| / |A ∪ B|; two empty sets score 0.
pub fn jaccard_similarity(a: &[String], b: &[String]) -> f64 {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
