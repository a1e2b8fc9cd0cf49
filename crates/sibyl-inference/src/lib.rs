pub mod cache;
pub mod combine;
pub mod engine;
pub mod model;
pub mod network;
pub mod posterior;
pub mod resolve;
pub mod selector;

pub use cache::ModelCache;
pub use engine::GuessEngine;
pub use model::ModelSet;
pub use network::{NetworkTrainer, ThematicNetwork, ALPHA, EPSILON};
pub use posterior::{Belief, Posterior};
