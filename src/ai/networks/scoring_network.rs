use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;

use crate::game::FEATURE_SIZE;

/// Feature-vector to scalar MLP. One instance serves as the critic (state
/// value), another as the actor (afterstate preference).
/// ```text
/// Input:  [batch, 31]
/// FC1:    31 -> 128, ReLU
/// FC2:    128 -> 128, ReLU
/// FC3:    128 -> 64, ReLU
/// Head:   64 -> 1
/// ```
#[derive(Module, Debug)]
pub struct ScoringNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,
    head: Linear<B>,
    relu: Relu,
}

#[derive(Config, Debug)]
pub struct ScoringNetworkConfig {}

impl ScoringNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ScoringNetwork<B> {
        ScoringNetwork {
            fc1: LinearConfig::new(FEATURE_SIZE, 128).init(device),
            fc2: LinearConfig::new(128, 128).init(device),
            fc3: LinearConfig::new(128, 64).init(device),
            head: LinearConfig::new(64, 1).init(device),
            relu: Relu::new(),
        }
    }
}

impl<B: Backend> ScoringNetwork<B> {
    /// Forward pass: `[batch, 31]` -> `[batch, 1]`.
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.relu.forward(self.fc1.forward(input));
        let x = self.relu.forward(self.fc2.forward(x));
        let x = self.relu.forward(self.fc3.forward(x));
        self.head.forward(x)
    }
}
