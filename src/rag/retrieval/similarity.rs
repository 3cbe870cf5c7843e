//! Cosine similarity

use crate::errors::{RagError, Result};

/// Normalised dot product of two vectors, in [-1.0, 1.0]
///
/// Returns 0.0 when either vector has zero norm. Vectors of different
/// lengths are an error rather than silently truncated.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RagError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return Ok(0.0);
    }

    Ok((dot / denom).clamp(-1.0, 1.0))
}

/// Similarity of `query` against every candidate, same order as input
pub fn cosine_similarity_batch<V: AsRef<[f32]>>(query: &[f32], candidates: &[V]) -> Result<Vec<f32>> {
    candidates
        .iter()
        .map(|candidate| cosine_similarity(query, candidate.as_ref()))
        .collect()
}
