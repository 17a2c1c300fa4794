//! Smooth scrolling for the tile grid
//!
//! - `easing` - easing curves mapping progress [0, 1] to [0, 1]
//! - `animation` - the animator that moves the viewport towards a target offset
//!
//! Jumps requested through the core `ScrollController` are resolved to a target
//! offset by the grid widget and handed to [`ScrollAnimator::scroll_to`].

pub mod animation;
pub mod easing;

pub use animation::{ScrollAnimator, ScrollConfigExt};
pub use easing::EasingTypeExt;
pub use squaregrid_core::{EasingType, ScrollConfig};
