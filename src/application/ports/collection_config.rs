use super::{DistanceMetric, PayloadIndex};

#[derive(Debug, Clone)]
pub struct CollectionConfig {
    pub vector_dimensions: u64,
    pub distance_metric: DistanceMetric,
    pub payload_indexes: Vec<PayloadIndex>,
}

impl CollectionConfig {
    pub fn new(vector_dimensions: u64) -> Self {
        Self {
            vector_dimensions,
            distance_metric: DistanceMetric::Cosine,
            payload_indexes: vec![
                PayloadIndex::keyword("source"),
                PayloadIndex::keyword("file_type"),
                PayloadIndex::keyword("file_path"),
            ],
        }
    }

    pub fn with_distance_metric(mut self, distance_metric: DistanceMetric) -> Self {
        self.distance_metric = distance_metric;
        self
    }
}
