//! Retargeting: solver contract, frame driver and the end-to-end pipeline.

pub mod driver;
pub mod name_match;
pub mod pipeline;
pub mod solver;

pub use driver::{retarget_animation, RetargetDriver};
pub use name_match::NameMatchRetargeter;
pub use pipeline::load_and_retarget_animation_by_name;
pub use solver::{IkGoal, RetargetProfile, RetargetSide, Retargeter, RetargeterSettings};
