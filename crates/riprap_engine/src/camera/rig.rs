//! # Camera Rig
//!
//! Moves a camera pose along a [`PathTraversal`] one tick at a time, always
//! facing the path's look-at target, and requests a capture each time a
//! waypoint is reached.
//!
//! ## Per-tick behaviour
//! 1. Nothing happens until the start delay has elapsed.
//! 2. Nothing happens once the traversal has no current waypoint.
//! 3. The pose moves toward the current waypoint and re-faces the target.
//! 4. Within the reach threshold the rig captures, advances the traversal
//!    and reports completion when a one-way path runs out.

use crate::camera::path::{Path, PathTraversal, Waypoint};
use crate::config::{MovementType, SceneConstants};
use crate::foundation::math::{utils, Transform, Vec3};
use crate::output::{CaptureRequest, SnapshotSink};
use std::sync::Arc;

/// Tuning values read by the rig every tick
#[derive(Debug, Clone, PartialEq)]
pub struct RigSettings {
    /// Units per second for `MoveTowards`, interpolation rate for `LerpTowards`
    pub speed: f32,
    /// Distance under which a waypoint counts as reached
    pub reach_threshold: f32,
    /// Interpolation policy
    pub movement: MovementType,
    /// Scene seconds to wait before moving
    pub move_delay: f32,
    /// Whether captures are requested on arrival
    pub save_snapshot: bool,
    /// Capture width in pixels
    pub snapshot_width: u32,
    /// Capture height in pixels
    pub snapshot_height: u32,
    /// Ticks allowed for approaching a single waypoint
    pub max_approach_ticks: u32,
}

impl RigSettings {
    /// Extract the rig settings from scene constants
    pub fn from_constants(constants: &SceneConstants) -> Self {
        Self {
            speed: constants.camera_speed,
            reach_threshold: constants.camera_reach_threshold,
            movement: constants.camera_movement,
            move_delay: constants.camera_move_delay,
            save_snapshot: constants.camera_save_snapshot,
            snapshot_width: constants.camera_snapshot_width,
            snapshot_height: constants.camera_snapshot_height,
            max_approach_ticks: constants.max_approach_ticks,
        }
    }
}

impl Default for RigSettings {
    fn default() -> Self {
        Self::from_constants(&SceneConstants::default())
    }
}

/// Outcome of one rig tick
#[derive(Debug, Clone, PartialEq)]
pub enum RigStatus {
    /// Start delay has not elapsed yet
    Waiting,
    /// No waypoint left to move to
    Idle,
    /// Moving toward the current waypoint
    Approaching,
    /// Arrived at a waypoint; the traversal moved on
    Reached(Arc<Waypoint>),
    /// Arrived at the last waypoint of a one-way path
    PathComplete(Arc<Waypoint>),
}

/// Errors raised while driving the rig
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RigError {
    /// The pose stopped converging on a waypoint
    #[error("Camera did not reach waypoint '{waypoint}' within {ticks} ticks")]
    NonConvergent {
        /// Name of the waypoint being approached
        waypoint: String,
        /// Ticks spent approaching it
        ticks: u32,
    },
}

/// Whether `position` lies strictly within `threshold` of `target`
///
/// Compares squared distances, so a point exactly `threshold` away does not
/// count.
pub fn within_reach(position: Vec3, target: Vec3, threshold: f32) -> bool {
    (position - target).norm_squared() < threshold * threshold
}

/// Camera pose driven along a path
#[derive(Debug, Clone)]
pub struct CameraRig {
    traversal: PathTraversal,
    settings: RigSettings,
    pose: Transform,
    approach_ticks: u32,
    idle_reported: bool,
}

impl CameraRig {
    /// Attach a rig to `path`, starting at its first waypoint
    ///
    /// The pose jumps to the first waypoint and faces the look-at target. For
    /// paths too short to traverse, the pose is left as given and the rig
    /// stays idle.
    pub fn new(path: Arc<Path>, settings: RigSettings, initial_pose: Transform) -> Self {
        let look_at = path.look_at();
        let mut traversal = PathTraversal::new(path);
        let mut pose = initial_pose;

        if let Some(first) = traversal.next() {
            pose.position = first.position;
            pose.look_at(look_at);
        } else {
            log::info!("Camera path has fewer than two waypoints, nothing to follow");
        }

        Self {
            traversal,
            settings,
            pose,
            approach_ticks: 0,
            idle_reported: false,
        }
    }

    /// Current camera pose
    pub fn pose(&self) -> &Transform {
        &self.pose
    }

    /// Waypoint being approached
    pub fn current_waypoint(&self) -> Option<&Arc<Waypoint>> {
        self.traversal.current()
    }

    /// Underlying traversal
    pub fn traversal(&self) -> &PathTraversal {
        &self.traversal
    }

    /// Rig settings
    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }

    /// Advance the rig by one tick
    ///
    /// `elapsed` is the scene time accumulated so far and `delta_time` the
    /// length of this tick. Captures go to `sink` with `output_dir` as their
    /// destination.
    pub fn tick(
        &mut self,
        elapsed: f32,
        delta_time: f32,
        output_dir: &std::path::Path,
        sink: &mut dyn SnapshotSink,
    ) -> Result<RigStatus, RigError> {
        if elapsed < self.settings.move_delay {
            return Ok(RigStatus::Waiting);
        }

        let Some(target) = self.traversal.current().cloned() else {
            if !self.idle_reported {
                log::info!("Path ends");
                self.idle_reported = true;
            }
            return Ok(RigStatus::Idle);
        };

        let step = self.settings.speed * delta_time;
        self.pose.position = match self.settings.movement {
            MovementType::MoveTowards => {
                utils::move_towards(self.pose.position, target.position, step)
            }
            MovementType::LerpTowards => utils::lerp(self.pose.position, target.position, step),
        };
        self.pose.look_at(self.traversal.path().look_at());
        log::trace!("Camera at {:?} heading for {}", self.pose.position, target.name);

        if !within_reach(self.pose.position, target.position, self.settings.reach_threshold) {
            self.approach_ticks += 1;
            if self.approach_ticks > self.settings.max_approach_ticks {
                return Err(RigError::NonConvergent {
                    waypoint: target.name.clone(),
                    ticks: self.approach_ticks,
                });
            }
            return Ok(RigStatus::Approaching);
        }

        log::info!("At {}", target.name);
        self.approach_ticks = 0;
        if self.settings.save_snapshot {
            sink.capture(CaptureRequest {
                name: target.name.clone(),
                width: self.settings.snapshot_width,
                height: self.settings.snapshot_height,
                output_dir: output_dir.to_path_buf(),
                variant: 0,
            });
        }

        self.traversal.next();
        if self.traversal.is_ended() {
            log::info!("Camera path complete");
            Ok(RigStatus::PathComplete(target))
        } else {
            Ok(RigStatus::Reached(target))
        }
    }
}
