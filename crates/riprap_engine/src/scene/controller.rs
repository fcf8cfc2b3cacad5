//! Scene Controller - wires the pool, the generator and the camera rig
//!
//! The controller owns the constants and drives capture cycles:
//!
//! ```text
//! build camera ring ──► CameraRig (per tick) ──► captures
//!                               │ path complete
//!                               ▼
//!       scene_id += 1, prepare Stockpile_<id> ──► SceneGenerator ──► InstancePool
//!                               │
//!                               ▼
//!                  fresh traversal over the same ring
//! ```
//!
//! Generation never interleaves with a rig step: both run to completion
//! inside the tick that triggers them.

use crate::camera::{CameraRig, Path, RigError, RigSettings, RigStatus, Waypoint};
use crate::config::{ConfigError, ControlType, SceneConstants};
use crate::foundation::math::{constants::TAU, Transform, Vec3};
use crate::foundation::random::RandomSource;
use crate::foundation::time::FrameClock;
use crate::output::{OutputDirectories, SnapshotSink};
use crate::scene::generator::{GenerationError, GenerationReport, SceneGenerator};
use crate::scene::pool::{InstancePool, PoolError, Prototype};
use std::path::PathBuf;
use std::sync::Arc;

/// Errors raised by the scene controller
#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    /// Constants failed validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Pool could not be created
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    /// A generation pass was aborted
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// The camera rig failed to converge
    #[error("Camera error: {0}")]
    Rig(#[from] RigError),

    /// Output directory could not be prepared
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a controller tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// Scene time is frozen
    Paused,
    /// No camera rig is attached
    NoCamera,
    /// The rig ticked without finishing its path
    Camera(RigStatus),
    /// A capture cycle finished and the next scene was generated
    CycleComplete {
        /// Cycles completed so far
        completed: u32,
        /// Scene id of the freshly generated scene
        next_scene: u32,
    },
    /// The cycle limit was reached; the rig has been detached
    Finished,
}

/// Camera ring of `camera_num` waypoints around the canvas centre
///
/// Waypoints are named `cam_000`, `cam_001`, ... and sit at
/// `camera_height` on a circle of radius `canvas_width / 2`.
pub fn build_camera_path(constants: &SceneConstants) -> Path {
    let center_x = constants.canvas_width / 2.0;
    let center_z = constants.canvas_height / 2.0;
    let radius = constants.canvas_width / 2.0;
    let count = constants.camera_num;
    let delta_theta = TAU / count.max(1) as f32;

    let waypoints = (0..count)
        .map(|i| {
            let theta = i as f32 * delta_theta;
            let position = Vec3::new(
                center_x + radius * theta.cos(),
                constants.camera_height,
                center_z + radius * theta.sin(),
            );
            Waypoint::new(format!("cam_{:03}", i), position)
        })
        .collect();

    Path::new(waypoints, constants.camera_path_mode, constants.camera_lookat)
}

/// Orchestrates generation and multi-view capture cycles
pub struct SceneController {
    constants: SceneConstants,
    pool: InstancePool,
    generator: SceneGenerator,
    rng: Box<dyn RandomSource>,
    directories: Box<dyn OutputDirectories>,
    camera_path: Arc<Path>,
    camera_pose: Transform,
    rig: Option<CameraRig>,
    clock: FrameClock,
    scene_id: u32,
    output_dir: PathBuf,
    last_report: GenerationReport,
    cycle_limit: Option<u32>,
    completed_cycles: u32,
    finished: bool,
}

impl SceneController {
    /// Validate constants, load prototypes and prepare the first output directory
    ///
    /// Prototypes receive the body settings from the constants. Manual
    /// control starts paused.
    pub fn new(
        constants: SceneConstants,
        prototypes: Vec<Prototype>,
        rng: Box<dyn RandomSource>,
        mut directories: Box<dyn OutputDirectories>,
    ) -> Result<Self, ControllerError> {
        constants.validate()?;

        let prototypes = prototypes
            .into_iter()
            .map(|prototype| prototype.with_body(constants.rock_mass, constants.rock_motion))
            .collect();
        let pool = InstancePool::new(prototypes)?;

        let camera_path = Arc::new(build_camera_path(&constants));
        let output_dir = directories.prepare(0)?;

        let mut clock = FrameClock::new();
        clock.set_paused(constants.control_type == ControlType::Manual);

        log::info!(
            "Scene controller ready: {} prototypes, {} camera waypoints, {:?} control",
            pool.prototype_count(),
            camera_path.len(),
            constants.control_type
        );

        Ok(Self {
            camera_pose: constants.camera_init_transform(),
            constants,
            pool,
            generator: SceneGenerator::new(),
            rng,
            directories,
            camera_path,
            rig: None,
            clock,
            scene_id: 0,
            output_dir,
            last_report: GenerationReport::default(),
            cycle_limit: None,
            completed_cycles: 0,
            finished: false,
        })
    }

    /// Generate the first scene and, in auto mode, attach the camera rig
    pub fn start(&mut self) -> Result<&GenerationReport, ControllerError> {
        self.regenerate()?;
        if self.constants.control_type == ControlType::Auto && self.constants.camera_move {
            self.start_multiview();
        }
        Ok(&self.last_report)
    }

    /// Attach a camera rig at the start of the camera ring
    pub fn start_multiview(&mut self) {
        let settings = RigSettings::from_constants(&self.constants);
        let rig = CameraRig::new(Arc::clone(&self.camera_path), settings, self.camera_pose);
        self.camera_pose = *rig.pose();
        self.rig = Some(rig);
        self.finished = false;
    }

    /// Reclaim the pool and lay out a new stockpile
    pub fn regenerate(&mut self) -> Result<&GenerationReport, ControllerError> {
        self.last_report = self
            .generator
            .generate(&self.constants, &mut self.pool, self.rng.as_mut())?;
        Ok(&self.last_report)
    }

    /// Flip between paused and running scene time
    pub fn toggle_pause(&mut self) {
        let paused = !self.clock.is_paused();
        self.clock.set_paused(paused);
        log::info!("Scene {}", if paused { "paused" } else { "resumed" });
    }

    /// Whether scene time is frozen
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Stop after `limit` completed cycles; `None` runs forever
    pub fn set_cycle_limit(&mut self, limit: Option<u32>) {
        self.cycle_limit = limit;
    }

    /// Advance the scene by one tick of `delta_time` seconds
    pub fn tick(
        &mut self,
        delta_time: f32,
        sink: &mut dyn SnapshotSink,
    ) -> Result<TickEvent, ControllerError> {
        if self.finished {
            return Ok(TickEvent::Finished);
        }

        let delta_time = self.clock.tick(delta_time);
        if self.clock.is_paused() {
            return Ok(TickEvent::Paused);
        }

        let Some(rig) = self.rig.as_mut() else {
            return Ok(TickEvent::NoCamera);
        };

        let status = rig.tick(self.clock.total_time(), delta_time, &self.output_dir, sink)?;
        self.camera_pose = *rig.pose();

        match status {
            RigStatus::PathComplete(_) => self.complete_cycle(),
            status => Ok(TickEvent::Camera(status)),
        }
    }

    fn complete_cycle(&mut self) -> Result<TickEvent, ControllerError> {
        self.completed_cycles += 1;
        self.scene_id += 1;
        self.output_dir = self.directories.prepare(self.scene_id)?;

        if self.cycle_limit.is_some_and(|limit| self.completed_cycles >= limit) {
            log::info!("Completed {} capture cycles, stopping", self.completed_cycles);
            self.rig = None;
            self.finished = true;
            return Ok(TickEvent::Finished);
        }

        self.regenerate()?;
        self.start_multiview();
        log::info!("Cycle {} complete, scene {} generated", self.completed_cycles, self.scene_id);

        Ok(TickEvent::CycleComplete {
            completed: self.completed_cycles,
            next_scene: self.scene_id,
        })
    }

    /// Scene constants
    pub fn constants(&self) -> &SceneConstants {
        &self.constants
    }

    /// Instance pool
    pub fn pool(&self) -> &InstancePool {
        &self.pool
    }

    /// Camera ring
    pub fn camera_path(&self) -> &Arc<Path> {
        &self.camera_path
    }

    /// Current camera pose
    pub fn camera_pose(&self) -> &Transform {
        &self.camera_pose
    }

    /// Attached camera rig, if any
    pub fn rig(&self) -> Option<&CameraRig> {
        self.rig.as_ref()
    }

    /// Id of the scene currently being captured
    pub fn scene_id(&self) -> u32 {
        self.scene_id
    }

    /// Directory captures currently go to
    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    /// Result of the most recent generation pass
    pub fn last_report(&self) -> &GenerationReport {
        &self.last_report
    }

    /// Capture cycles completed so far
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Scene time elapsed so far
    pub fn elapsed(&self) -> f32 {
        self.clock.total_time()
    }

    /// Whether the cycle limit has been reached
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PathMode;
    use crate::foundation::random::SeededRandom;
    use crate::output::{RecordingSink, VirtualDirectories};
    use approx::assert_relative_eq;

    fn controller(constants: SceneConstants) -> SceneController {
        SceneController::new(
            constants,
            vec![Prototype::new("rock_a"), Prototype::new("rock_b")],
            Box::new(SeededRandom::from_seed(5)),
            Box::new(VirtualDirectories::new("out")),
        )
        .unwrap()
    }

    #[test]
    fn test_camera_ring_layout() {
        let constants = SceneConstants::default();
        let path = build_camera_path(&constants);

        assert_eq!(path.len(), 36);
        assert_eq!(path.mode(), PathMode::OneWay);
        assert_eq!(path.sequence()[0].name, "cam_000");
        assert_eq!(path.sequence()[35].name, "cam_035");
        let ring = path.sequence();
        assert_relative_eq!(ring[0].position, Vec3::new(100.0, 5.0, 50.0), epsilon = 1e-4);
        assert_relative_eq!(ring[9].position, Vec3::new(50.0, 5.0, 100.0), epsilon = 1e-4);
        assert_eq!(path.look_at(), Vec3::new(50.0, 0.0, 50.0));

        for waypoint in path.sequence() {
            let offset = waypoint.position - Vec3::new(50.0, 5.0, 50.0);
            assert_relative_eq!(offset.norm(), 50.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_new_rejects_invalid_inputs() {
        let bad_constants = SceneConstants { density_x: 0, ..SceneConstants::default() };
        let result = SceneController::new(
            bad_constants,
            vec![Prototype::new("rock")],
            Box::new(SeededRandom::from_seed(1)),
            Box::new(VirtualDirectories::new("out")),
        );
        assert!(matches!(result, Err(ControllerError::Config(_))));

        let result = SceneController::new(
            SceneConstants::default(),
            Vec::new(),
            Box::new(SeededRandom::from_seed(1)),
            Box::new(VirtualDirectories::new("out")),
        );
        assert!(matches!(result, Err(ControllerError::Pool(PoolError::InvalidArgument(_)))));
    }

    #[test]
    fn test_prototypes_receive_body_settings() {
        let controller = controller(SceneConstants {
            rock_mass: 3.0,
            rock_motion: false,
            ..SceneConstants::default()
        });
        for prototype in controller.pool().prototypes() {
            assert_eq!(prototype.mass, 3.0);
            assert!(prototype.kinematic);
        }
    }

    #[test]
    fn test_manual_mode_waits_for_requests() {
        let mut controller = controller(SceneConstants::default());
        let mut sink = RecordingSink::default();

        controller.start().unwrap();
        assert!(controller.is_paused());
        assert!(controller.rig().is_none());
        assert_eq!(controller.tick(0.1, &mut sink).unwrap(), TickEvent::Paused);
        assert_eq!(controller.elapsed(), 0.0);

        controller.toggle_pause();
        assert_eq!(controller.tick(0.1, &mut sink).unwrap(), TickEvent::NoCamera);

        controller.start_multiview();
        let first = controller.camera_path().sequence()[0].position;
        assert_eq!(controller.camera_pose().position, first);
        let event = controller.tick(0.1, &mut sink).unwrap();
        assert!(matches!(event, TickEvent::Camera(RigStatus::Reached(_))));
        assert_eq!(sink.requests[0].output_dir, PathBuf::from("out").join("Stockpile_000"));
    }

    #[test]
    fn test_auto_mode_respects_move_delay() {
        let mut controller = controller(SceneConstants::for_control(ControlType::Auto));
        let mut sink = RecordingSink::default();
        controller.start().unwrap();

        assert!(!controller.is_paused());
        assert!(controller.rig().is_some());
        for _ in 0..4 {
            let event = controller.tick(1.0, &mut sink).unwrap();
            assert_eq!(event, TickEvent::Camera(RigStatus::Waiting));
        }
        let event = controller.tick(1.0, &mut sink).unwrap();
        assert!(matches!(event, TickEvent::Camera(RigStatus::Reached(_))));
    }
}
