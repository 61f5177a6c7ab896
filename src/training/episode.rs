use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ai::{Agent, Learner, RandomAgent};
use crate::game::{Action, GameOutcome, MatchState, Player, StateVector};
use crate::training::experience_buffer::Transition;
use crate::training::metrics::{EpisodeEnd, EpisodeResult};

/// Result of playing a single self-play episode.
pub struct EpisodeTrace {
    pub transitions: Vec<Transition>,
    pub result: EpisodeResult,
}

/// One move as played, before rewards are known.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub state: MatchState,
    pub features: StateVector,
    pub action: Action,
    pub value: f32,
    pub log_prob: Option<f32>,
    pub player: Player,
}

/// Play one self-play episode with the learner on both sides. The deal comes
/// from `seed`; play stops at a finished match, a side with no legal action,
/// or after `max_steps` moves.
pub fn play_self_play_episode<L: Learner + ?Sized>(
    learner: &mut L,
    max_steps: usize,
    seed: u64,
) -> EpisodeTrace {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = MatchState::new(&mut rng);
    let mut move_records: Vec<MoveRecord> = Vec::new();

    let end = loop {
        if state.is_terminal() {
            break EpisodeEnd::Finished;
        }
        if move_records.len() >= max_steps {
            break EpisodeEnd::Truncated;
        }
        let Some(action) = learner.select_action(&state, true) else {
            log::debug!(
                "{} has no legal action after {} moves",
                state.current_player().name(),
                move_records.len()
            );
            break EpisodeEnd::Stalled;
        };

        let features = state.encode();
        let value = learner.estimate_value(&features);
        let log_prob = learner.action_log_prob(&state, &action);
        let player = state.current_player();
        let before = state.clone();
        state.apply(&action).unwrap_or_else(|e| {
            panic!("{} selected an illegal action: {e}", learner.name())
        });
        move_records.push(MoveRecord {
            state: before,
            features,
            action,
            value,
            log_prob,
            player,
        });
    };

    let winner = match state.outcome() {
        Some(GameOutcome::Winner(p)) => Some(p),
        _ => None,
    };
    let transitions = build_transitions(&move_records, winner);

    EpisodeTrace {
        transitions,
        result: EpisodeResult {
            winner,
            game_length: move_records.len(),
            end,
        },
    }
}

/// Attach terminal rewards: +1 on the winner's last move, -1 on the loser's
/// last move, zero everywhere else. The final transition is always `done`.
pub fn build_transitions(move_records: &[MoveRecord], winner: Option<Player>) -> Vec<Transition> {
    let game_length = move_records.len();
    let mut transitions = Vec::with_capacity(game_length);

    for (i, record) in move_records.iter().enumerate() {
        let is_last = i + 1 == game_length;
        // Each side's final move is one of the last two.
        let reward = match winner {
            Some(w) if i + 2 >= game_length => {
                if w == record.player {
                    1.0
                } else {
                    -1.0
                }
            }
            _ => 0.0,
        };

        transitions.push(Transition {
            state: record.state.clone(),
            features: record.features,
            action: record.action,
            reward,
            value: record.value,
            log_prob: record.log_prob,
            done: is_last,
        });
    }

    transitions
}

/// Play a single evaluation game between two agents, neither exploring.
/// Returns Some(true) if `agent` won, Some(false) if it lost, None otherwise.
pub fn play_eval_game<A, O>(
    agent: &mut A,
    opponent: &mut O,
    agent_side: Player,
    max_steps: usize,
    seed: u64,
) -> Option<bool>
where
    A: Agent + ?Sized,
    O: Agent + ?Sized,
{
    let mut state = MatchState::new(&mut StdRng::seed_from_u64(seed));

    for _ in 0..max_steps {
        if state.is_terminal() {
            break;
        }
        let action = if state.current_player() == agent_side {
            agent.select_action(&state, false)
        } else {
            opponent.select_action(&state, false)
        }?;
        state.apply(&action).unwrap_or_else(|e| panic!("illegal move during eval: {e}"));
    }

    match state.outcome() {
        Some(GameOutcome::Winner(winner)) => Some(winner == agent_side),
        _ => None,
    }
}

/// Win/draw/loss tally of an evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalSummary {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl EvalSummary {
    pub fn games(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    pub fn win_rate(&self) -> f32 {
        if self.games() == 0 {
            return 0.0;
        }
        self.wins as f32 / self.games() as f32
    }

    pub fn draw_rate(&self) -> f32 {
        if self.games() == 0 {
            return 0.0;
        }
        self.draws as f32 / self.games() as f32
    }
}

/// Evaluate an agent against `RandomAgent` over `eval_games`, alternating
/// sides.
pub fn evaluate<A: Agent + ?Sized>(
    agent: &mut A,
    eval_games: usize,
    max_steps: usize,
    base_seed: u64,
) -> EvalSummary {
    let mut random = RandomAgent::seeded(base_seed);
    let mut summary = EvalSummary::default();

    for game_idx in 0..eval_games {
        let side = if game_idx % 2 == 0 { Player::A } else { Player::B };
        let seed = episode_seed(base_seed, game_idx);
        match play_eval_game(agent, &mut random, side, max_steps, seed) {
            Some(true) => summary.wins += 1,
            Some(false) => summary.losses += 1,
            None => summary.draws += 1,
        }
    }

    summary
}

/// Derive a deterministic seed for a given episode index.
pub fn episode_seed(base_seed: u64, episode_index: usize) -> u64 {
    // FNV-1a style mixing
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    let index = episode_index as u64;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index >> 32;
    hash
}
