//! Core math modules.

pub mod lognormal;
pub mod periodic;
pub mod stable;
