//! Scene population and capture orchestration
//!
//! ## Architecture
//!
//! ```text
//! SceneController (orchestration)
//!      ├── SceneGenerator (layered grid layout)
//!      │        ↓
//!      │   InstancePool (per-prototype reuse)
//!      └── CameraRig (multi-view capture)
//! ```
//!
//! The controller owns the constants and the pool; the generator and the rig
//! borrow what they need for the duration of a call.

mod pool;
mod generator;
mod controller;

#[cfg(test)]
mod tests;

pub use pool::{Instance, InstancePool, PoolError, PoolStats, Prototype, PrototypeId};
pub use generator::{
    grid_axis, GenerationError, GenerationReport, Placement, SceneGenerator,
    MAX_INSTANCE_SCALE, MIN_INSTANCE_SCALE,
};
pub use controller::{build_camera_path, ControllerError, SceneController, TickEvent};
