use serde::{Deserialize, Serialize};

use crate::domain::Embedding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
    DotProduct,
}

impl DistanceMetric {
    /// Similarity score where higher always means closer.
    pub fn score(&self, query: &Embedding, candidate: &Embedding) -> f32 {
        match self {
            DistanceMetric::Cosine => query.cosine_similarity(candidate),
            DistanceMetric::DotProduct => query.dot_product(candidate),
            DistanceMetric::Euclidean => 1.0 / (1.0 + query.euclidean_distance(candidate)),
        }
    }
}
