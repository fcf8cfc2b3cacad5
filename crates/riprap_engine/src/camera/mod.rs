//! Camera path traversal and the capture rig that follows it

pub mod path;
pub mod rig;

pub use path::{Direction, Path, PathMode, PathTraversal, TraversalCursor, Waypoint};
pub use rig::{within_reach, CameraRig, RigError, RigSettings, RigStatus};
