use std::collections::{BTreeMap, HashMap};

use crate::SptError;

/// Relevance weight per Swadesh slot. Unknown slots weigh 1.0.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    weights: HashMap<u32, f64>,
}

impl WeightTable {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    /// Every slot weighs [`Self::DEFAULT_WEIGHT`].
    pub fn uniform() -> Self {
        Self::default()
    }

    /// Build from `(id, weight)` pairs. Weights must be finite and positive.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, SptError>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut weights = HashMap::new();
        for (id, weight) in pairs {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(SptError::Malformed(format!(
                    "weight of slot {id} must be positive, got {weight}"
                )));
            }
            weights.insert(id, weight);
        }
        Ok(Self { weights })
    }

    pub fn get(&self, swadesh_id: u32) -> f64 {
        self.weights
            .get(&swadesh_id)
            .copied()
            .unwrap_or(Self::DEFAULT_WEIGHT)
    }

    pub fn is_uniform(&self) -> bool {
        self.weights.values().all(|&w| w == Self::DEFAULT_WEIGHT)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Explicit weights sorted by slot ID.
    pub fn sorted(&self) -> BTreeMap<u32, f64> {
        self.weights.iter().map(|(&k, &v)| (k, v)).collect()
    }
}
