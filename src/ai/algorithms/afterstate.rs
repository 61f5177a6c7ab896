//! Greedy afterstate selection over an arbitrary scoring function.
//!
//! Each legal action is applied to a copy of the match and the successor's
//! features are scored. The best-scoring action wins, with a small random
//! jitter to break ties.

use burn::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ai::agent::Agent;
use crate::ai::networks::ScoringNetwork;
use crate::ai::state_encoding::{encode_features, to_vec};
use crate::error::GameError;
use crate::game::{Action, MatchState, StateVector};

/// Anything that maps a feature vector to a preference score.
pub trait StateScorer {
    fn score(&self, features: &StateVector) -> f32;
}

impl<F> StateScorer for F
where
    F: Fn(&StateVector) -> f32,
{
    fn score(&self, features: &StateVector) -> f32 {
        self(features)
    }
}

/// An inference-only copy of a scoring network.
pub struct NetworkScorer<B: Backend> {
    network: ScoringNetwork<B>,
    device: B::Device,
}

impl<B: Backend> NetworkScorer<B> {
    pub fn new(network: ScoringNetwork<B>, device: B::Device) -> Self {
        NetworkScorer { network, device }
    }
}

impl<B: Backend> StateScorer for NetworkScorer<B> {
    fn score(&self, features: &StateVector) -> f32 {
        let output = self.network.forward(encode_features(features, &self.device));
        to_vec(output).first().copied().unwrap_or(0.0)
    }
}

/// Feature vectors of the successor reached by each action, in order.
pub fn afterstate_features(
    state: &MatchState,
    actions: &[Action],
) -> Result<Vec<StateVector>, GameError> {
    actions
        .iter()
        .map(|action| state.after(action).map(|next| next.encode()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct AfterstateConfig {
    /// Chance of playing a uniformly random legal action instead.
    pub random_move_prob: f32,
    /// Upper bound of the uniform noise added to each score.
    pub jitter: f32,
}

impl Default for AfterstateConfig {
    fn default() -> Self {
        AfterstateConfig {
            random_move_prob: 0.1,
            jitter: 0.05,
        }
    }
}

pub struct AfterstateAgent<S> {
    scorer: S,
    config: AfterstateConfig,
    rng: StdRng,
}

impl<S: StateScorer> AfterstateAgent<S> {
    pub fn new(scorer: S) -> Self {
        Self::with_config(scorer, AfterstateConfig::default())
    }

    pub fn with_config(scorer: S, config: AfterstateConfig) -> Self {
        AfterstateAgent {
            scorer,
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(scorer: S, config: AfterstateConfig, seed: u64) -> Self {
        AfterstateAgent {
            scorer,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<S: StateScorer> Agent for AfterstateAgent<S> {
    fn select_action(&mut self, state: &MatchState, _exploring: bool) -> Option<Action> {
        let actions = state.legal_actions();
        if actions.is_empty() {
            return None;
        }

        if self.rng.random::<f32>() < self.config.random_move_prob {
            return Some(actions[self.rng.random_range(0..actions.len())]);
        }

        let mut best = actions[0];
        let mut best_score = f32::NEG_INFINITY;
        for action in &actions {
            let Ok(next) = state.after(action) else {
                continue;
            };
            let noise = self.rng.random::<f32>() * self.config.jitter;
            let score = self.scorer.score(&next.encode()) + noise;
            if score > best_score {
                best_score = score;
                best = *action;
            }
        }
        Some(best)
    }

    fn name(&self) -> &str {
        "Afterstate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, CardId, Coord, HandSlot, Player, MASTER, PAWN};
    use burn::backend::NdArray;

    fn card(id: usize) -> CardId {
        CardId::new(id).unwrap()
    }

    /// Red to move holding Crab, whose sideways jump of two lands on the blue
    /// master.
    fn capture_available() -> MatchState {
        let mut board = Board::empty();
        board.set(Coord::new(0, 2), MASTER * Player::A.sign());
        board.set(Coord::new(2, 2), MASTER * Player::B.sign());
        board.set(Coord::new(4, 4), PAWN * Player::A.sign());
        MatchState::from_parts(
            board,
            [card(2), card(3)],
            [card(5), card(7)],
            card(11),
            Player::A,
        )
        .unwrap()
    }

    #[test]
    fn test_picks_highest_scoring_successor() {
        let state = capture_available();
        // Score successors by how few opposing pieces remain.
        let scorer = |features: &StateVector| -> f32 {
            -(features[..25].iter().filter(|&&v| v < 0.0).count() as f32)
        };
        let config = AfterstateConfig {
            random_move_prob: 0.0,
            jitter: 0.0,
        };
        let mut agent = AfterstateAgent::seeded(scorer, config, 5);
        let action = agent.select_action(&state, false).unwrap();
        assert_eq!(action.from, Coord::new(0, 2));
        assert_eq!(action.to, Coord::new(2, 2));
        assert_eq!(action.slot, HandSlot::First);
    }

    #[test]
    fn test_always_returns_legal_action() {
        let state = MatchState::new(&mut StdRng::seed_from_u64(9));
        let legal = state.legal_actions();
        let mut agent = AfterstateAgent::seeded(
            |_: &StateVector| 0.0f32,
            AfterstateConfig::default(),
            9,
        );
        for _ in 0..50 {
            let action = agent.select_action(&state, false).unwrap();
            assert!(legal.contains(&action));
        }
    }

    #[test]
    fn test_network_scorer_is_a_state_scorer() {
        use crate::ai::networks::ScoringNetworkConfig;

        let device = Default::default();
        let network = ScoringNetworkConfig {}.init::<NdArray<f32>>(&device);
        let scorer = NetworkScorer::new(network, device);
        let state = MatchState::new(&mut StdRng::seed_from_u64(11));
        let score = scorer.score(&state.encode());
        assert!(score.is_finite());

        let mut agent = AfterstateAgent::seeded(scorer, AfterstateConfig::default(), 11);
        let action = agent.select_action(&state, false).unwrap();
        assert!(state.legal_actions().contains(&action));
    }

    #[test]
    fn test_afterstate_features_match_apply() {
        let state = MatchState::new(&mut StdRng::seed_from_u64(12));
        let actions = state.legal_actions();
        let features = afterstate_features(&state, &actions).unwrap();
        assert_eq!(features.len(), actions.len());
        for (action, f) in actions.iter().zip(&features) {
            let mut next = state.clone();
            next.apply(action).unwrap();
            assert_eq!(&next.encode(), f);
        }
    }
}
