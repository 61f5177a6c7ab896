//! Generalized Advantage Estimation over a flattened, multi-episode batch.

use crate::training::experience_buffer::Transition;

/// Parallel per-step training targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advantages {
    pub advantages: Vec<f32>,
    pub returns: Vec<f32>,
}

/// Raw GAE. A step flagged `done` sees a next value of zero and stops the
/// backward trace, so episodes in one batch never mix.
pub fn compute_gae(
    rewards: &[f32],
    values: &[f32],
    dones: &[bool],
    gamma: f32,
    lambda: f32,
) -> Advantages {
    let n = rewards.len();
    debug_assert_eq!(values.len(), n);
    debug_assert_eq!(dones.len(), n);

    let mut advantages = vec![0.0f32; n];
    let mut returns = vec![0.0f32; n];

    // Process backwards
    let mut gae = 0.0f32;
    for i in (0..n).rev() {
        let not_done = if dones[i] { 0.0 } else { 1.0 };
        let next_value = if i + 1 < n { values[i + 1] } else { 0.0 };

        let delta = rewards[i] + gamma * next_value * not_done - values[i];
        gae = delta + gamma * lambda * not_done * gae;

        advantages[i] = gae;
        returns[i] = gae + values[i];
    }

    Advantages { advantages, returns }
}

/// Subtract the batch mean and divide by `std + epsilon`. Statistics are
/// accumulated in f64.
pub fn normalize_advantages(advantages: &mut [f32], epsilon: f64) {
    let n = advantages.len();
    if n == 0 {
        return;
    }
    let mean = advantages.iter().map(|&a| a as f64).sum::<f64>() / n as f64;
    let var = advantages
        .iter()
        .map(|&a| (a as f64 - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    let std = var.sqrt() + epsilon;
    for a in advantages.iter_mut() {
        *a = ((*a as f64 - mean) / std) as f32;
    }
}

/// GAE over drained transitions using their recorded value estimates, with
/// normalized advantages and raw returns.
pub fn estimate_advantages(
    transitions: &[Transition],
    gamma: f32,
    lambda: f32,
    epsilon: f64,
) -> Advantages {
    let rewards: Vec<f32> = transitions.iter().map(|t| t.reward).collect();
    let values: Vec<f32> = transitions.iter().map(|t| t.value).collect();
    let dones: Vec<bool> = transitions.iter().map(|t| t.done).collect();

    let mut out = compute_gae(&rewards, &values, &dones, gamma, lambda);
    normalize_advantages(&mut out.advantages, epsilon);
    out
}
