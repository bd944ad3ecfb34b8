//! A weight vector merged across peers by arithmetic mean.

use crate::mixer::Mixable;
use crate::{Error, Result};

/// Argument payload: the generation the requester has already folded in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsArgument {
    pub generation: u64,
}

/// Diff payload: the responder's full weight vector and generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsDiff {
    pub generation: u64,
    pub weights: Vec<f64>,
}

/// An online mean estimator over fixed-dimension samples.
///
/// Local updates fold samples into a running mean; mixing merges two nodes'
/// vectors by averaging them element-wise. The payload shapes stay private to
/// the model; the mixer moves them around as opaque bytes.
pub struct AveragingModel {
    weights: Vec<f64>,
    generation: u64,
}

impl AveragingModel {
    pub fn new(dimension: usize) -> Self {
        AveragingModel { weights: vec![0.0; dimension], generation: 0 }
    }

    /// Folds one sample into the running mean. Samples shorter than the model
    /// dimension update a prefix; longer ones are truncated.
    pub fn observe(&mut self, sample: &[f64]) {
        self.generation += 1;
        let n = self.generation as f64;
        for (weight, value) in self.weights.iter_mut().zip(sample.iter()) {
            *weight += (value - *weight) / n;
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Mixable for AveragingModel {
    fn get_argument(&self) -> Result<Vec<u8>> {
        let arg = WeightsArgument { generation: self.generation };
        Ok(bincode::serialize(&arg)?)
    }

    fn pull(&self, arg: &[u8]) -> Result<Vec<u8>> {
        let _arg: WeightsArgument = bincode::deserialize(arg)?;
        let diff = WeightsDiff { generation: self.generation, weights: self.weights.clone() };
        Ok(bincode::serialize(&diff)?)
    }

    fn push(&mut self, diff: &[u8]) -> Result<()> {
        let diff: WeightsDiff = bincode::deserialize(diff)?;
        if diff.weights.len() != self.weights.len() {
            return Err(Error::Model(format!(
                "dimension mismatch: {} != {}",
                diff.weights.len(),
                self.weights.len()
            )));
        }
        for (weight, other) in self.weights.iter_mut().zip(diff.weights.iter()) {
            *weight = (*weight + other) / 2.0;
        }
        self.generation = self.generation.max(diff.generation);
        Ok(())
    }
}
