//! Training infrastructure: the episode runner, the self-play trainer, and
//! rolling metrics collection.

pub mod episode;
pub mod metrics;
pub mod trainer;
