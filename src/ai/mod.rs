mod agent;
pub mod algorithms;
pub mod networks;
mod random;
pub mod state_encoding;

pub use agent::{Agent, Learner, UpdateMetrics};
pub use algorithms::{AfterstateAgent, NetworkScorer, PpoAgent, PpoConfig, StateScorer};
pub use networks::{ScoringNetwork, ScoringNetworkConfig};
pub use random::RandomAgent;
