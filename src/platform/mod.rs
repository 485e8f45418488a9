//! Platform abstraction layer
//!
//! Handles the seams between the simulation and its host:
//! - Frame scheduling (animation clock with a cancellable pending frame)
//! - Viewport measurement (bounding boxes of on-screen elements)

pub mod frame;
pub mod viewport;

pub use frame::{FrameHandle, FrameLoop, FrameScheduler};
pub use viewport::{Element, Viewport, VirtualViewport};
