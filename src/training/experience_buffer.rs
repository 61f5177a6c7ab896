use crate::game::{Action, MatchState, StateVector};

/// A single step of self-play experience.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Pre-move match snapshot. The policy update rebuilds the candidate
    /// successor set from it.
    pub state: MatchState,
    pub features: StateVector,
    pub action: Action,
    pub reward: f32,
    /// Critic estimate of `features` at record time.
    pub value: f32,
    /// Behaviour-policy log-probability, when the selector reported one.
    pub log_prob: Option<f32>,
    pub done: bool,
}

/// Append-only log of transitions across episodes. Episode boundaries are
/// carried only by `done` flags. Drained in full by each learning update.
#[derive(Debug, Default)]
pub struct ExperienceBuffer {
    transitions: Vec<Transition>,
}

impl ExperienceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Take every transition out, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }
}

impl Extend<Transition> for ExperienceBuffer {
    fn extend<I: IntoIterator<Item = Transition>>(&mut self, iter: I) {
        self.transitions.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dummy_transition(reward: f32, done: bool) -> Transition {
        let state = MatchState::new(&mut StdRng::seed_from_u64(0));
        let action = state.legal_actions()[0];
        Transition {
            features: state.encode(),
            state,
            action,
            reward,
            value: 0.0,
            log_prob: None,
            done,
        }
    }

    #[test]
    fn test_record_and_len() {
        let mut buf = ExperienceBuffer::new();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());

        buf.record(dummy_transition(0.0, false));
        assert_eq!(buf.len(), 1);

        for _ in 0..9 {
            buf.record(dummy_transition(0.0, false));
        }
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_drain_empties_and_preserves_order() {
        let mut buf = ExperienceBuffer::new();
        buf.record(dummy_transition(0.0, false));
        buf.record(dummy_transition(-1.0, false));
        buf.record(dummy_transition(1.0, true));

        let drained = buf.drain();
        assert!(buf.is_empty());
        let rewards: Vec<f32> = drained.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![0.0, -1.0, 1.0]);
        assert!(drained[2].done);

        assert!(buf.drain().is_empty());
    }

    #[test]
    fn test_extend_appends() {
        let mut buf = ExperienceBuffer::new();
        buf.record(dummy_transition(0.0, false));
        buf.extend(vec![dummy_transition(0.0, true); 3]);
        assert_eq!(buf.len(), 4);
    }
}
