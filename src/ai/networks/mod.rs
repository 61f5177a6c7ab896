mod scoring_network;

pub use scoring_network::{ScoringNetwork, ScoringNetworkConfig};
