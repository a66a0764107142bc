//! Data models for Rapat

mod attendance;
mod candidate;
mod note;
mod participant;

pub use attendance::*;
pub use candidate::*;
pub use note::*;
pub use participant::*;
