//! # Riprap Engine
//!
//! Procedural stockpile scenes for synthetic multi-view image data.
//!
//! ## Features
//!
//! - **Instance Pooling**: Stockpile instances are reused across regenerations
//! - **Path Traversal**: One-way, ping-pong and looping camera paths
//! - **Camera Rig**: Tick-driven waypoint following with capture on arrival
//! - **Procedural Layout**: Seeded, reproducible layered grid generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use riprap_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let constants = SceneConstants::for_control(ControlType::Auto);
//!     let prototypes = vec![Prototype::new("rock_00"), Prototype::new("rock_01")];
//!     let mut controller = SceneController::new(
//!         constants.clone(),
//!         prototypes,
//!         Box::new(SeededRandom::from_seed(7)),
//!         Box::new(FsDirectories::new(&constants.save_path)),
//!     )?;
//!     controller.set_cycle_limit(Some(1));
//!     controller.start()?;
//!
//!     let mut sink = LogSink::new();
//!     while !controller.is_finished() {
//!         controller.tick(1.0 / 60.0, &mut sink)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]

pub mod foundation;
pub mod config;
pub mod camera;
pub mod scene;
pub mod output;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::{
            math::{Vec3, Quat, Transform},
            random::{RandomSource, SeededRandom},
            time::FrameClock,
        },
        config::{Config, ConfigError, ControlType, MovementType, SceneConstants},
        camera::{CameraRig, Path, PathMode, PathTraversal, RigSettings, RigStatus, Waypoint},
        scene::{
            ControllerError, GenerationReport, InstancePool, Prototype, SceneController,
            SceneGenerator, TickEvent,
        },
        output::{CaptureRequest, FsDirectories, LogSink, OutputDirectories, SnapshotSink},
    };
}
