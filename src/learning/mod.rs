//! Reinforcement loop over conversational memory
//!
//! `LearningCoordinator` is the façade the conversation layer talks to:
//! it scores transitions, stores interactions, decides between cached and
//! freshly generated replies, and builds prompt augmentation from memory.

mod coordinator;
pub mod policy;
pub mod prompt;

pub use coordinator::{LearningCoordinator, LearningSettings, LearningStats};
pub use policy::{target_emotion, RandomSource, StdRandom, SAD_SETTLE_PROBABILITY};
pub use prompt::{build_augmentation, MAX_PROMPT_EXAMPLES};
