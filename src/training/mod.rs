//! Training infrastructure: experience buffer, advantage estimation,
//! self-play episodes, metrics collection and the training orchestrator.

pub mod advantage;
pub mod episode;
pub mod experience_buffer;
pub mod metrics;
pub mod trainer;
