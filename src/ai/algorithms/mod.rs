pub mod afterstate;
mod ppo;

pub use afterstate::{AfterstateAgent, AfterstateConfig, NetworkScorer, StateScorer};
pub use ppo::{InferBackend, PpoAgent, PpoConfig, TrainBackend};
