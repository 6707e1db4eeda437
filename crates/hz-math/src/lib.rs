//! Career hazard math utilities.

pub mod math;

pub use math::lognormal::*;
pub use math::periodic::*;
pub use math::stable::*;
