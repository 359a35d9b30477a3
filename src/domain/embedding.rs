/// Dense vector produced by an [`Embedder`](crate::application::ports::Embedder).
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    pub fn dot_product(&self, other: &Self) -> f32 {
        self.pairs(other).map(|(a, b)| a * b).sum()
    }

    pub fn euclidean_distance(&self, other: &Self) -> f32 {
        self.pairs(other)
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    /// Zero for mismatched dimensions or a zero vector on either side.
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        if self.dimensions() != other.dimensions() {
            return 0.0;
        }

        let denominator = self.norm() * other.norm();
        if denominator == 0.0 {
            0.0
        } else {
            self.dot_product(other) / denominator
        }
    }

    fn pairs<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = (f32, f32)> + 'a {
        self.values.iter().copied().zip(other.values.iter().copied())
    }
}
