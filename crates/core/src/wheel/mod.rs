//! Selection wheel: geometry, spin animation and frame scheduling

pub mod geometry;
pub mod scheduler;
pub mod spin;

pub use geometry::{
    index_at, normalize_angle, render_frame, segment_bounds, segment_index_under_pointer,
    segment_width, PointerView, SegmentView, VisualFrame, POINTER_ANGLE,
};
pub use scheduler::{FixedStepScheduler, FrameScheduler};
pub use spin::{ease_out_cubic, SpinAnimation, SpinProfile};
