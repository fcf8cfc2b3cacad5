//! # Scene Control Constants
//!
//! Immutable configuration snapshot shared by the scene generator, the camera
//! rig and the controller. Built once (from defaults or a config file), then
//! passed around by reference.

use crate::camera::PathMode;
use crate::config::{Config, ConfigError};
use crate::foundation::math::{utils, Quat, Transform, Vec3};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the scene is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlType {
    /// Scene starts paused; the camera rig is attached on request
    Manual,
    /// Scene runs immediately with the camera rig attached
    Auto,
}

impl ControlType {
    /// Seconds the camera rig waits before its first move
    pub fn default_move_delay(self) -> f32 {
        match self {
            Self::Manual => 0.0,
            Self::Auto => 5.0,
        }
    }
}

/// Interpolation policy used by the camera rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    /// Constant speed, clamped at the waypoint
    MoveTowards,
    /// Exponential approach, never clamped
    LerpTowards,
}

/// Scene control constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConstants {
    /// Manual or automatic control
    pub control_type: ControlType,

    /// Ground canvas extent along X
    pub canvas_width: f32,
    /// Ground canvas extent along Z
    pub canvas_height: f32,

    /// Number of multi-view camera waypoints on the ring
    pub camera_num: u32,
    /// Height of the camera ring
    pub camera_height: f32,
    /// Camera position before the rig takes over
    pub camera_init_pos: Vec3,
    /// Camera orientation before the rig takes over
    pub camera_init_rot: Quat,
    /// Point every capture looks at
    pub camera_lookat: Vec3,

    /// Whether the camera rig is attached at all
    pub camera_move: bool,
    /// Seconds of scene time to wait before the camera starts moving
    pub camera_move_delay: f32,
    /// Camera speed in units per second
    pub camera_speed: f32,
    /// Distance under which a waypoint counts as reached
    pub camera_reach_threshold: f32,
    /// Interpolation policy toward the current waypoint
    pub camera_movement: MovementType,
    /// Traversal mode of the camera path
    pub camera_path_mode: PathMode,
    /// Ticks spent approaching one waypoint before giving up
    pub max_approach_ticks: u32,

    /// Whether captures are requested on arrival
    pub camera_save_snapshot: bool,
    /// Capture width in pixels
    pub camera_snapshot_width: u32,
    /// Capture height in pixels
    pub camera_snapshot_height: u32,

    /// Grid density along X
    pub density_x: u32,
    /// Grid density along Z
    pub density_z: u32,
    /// Vertical spacing between layers
    pub spacing_y: f32,
    /// Minimum number of layers (inclusive)
    pub min_layers: u32,
    /// Maximum number of layers (exclusive)
    pub max_layers: u32,
    /// Mass assigned to every prototype body
    pub rock_mass: f32,
    /// When false, prototype bodies are kinematic
    pub rock_motion: bool,

    /// Root directory for per-scene output directories
    pub save_path: PathBuf,
}

impl Default for SceneConstants {
    fn default() -> Self {
        Self::for_control(ControlType::Manual)
    }
}

impl SceneConstants {
    /// Default constants for the given control type
    pub fn for_control(control_type: ControlType) -> Self {
        let canvas_width = 100.0;
        let canvas_height = 100.0;
        let camera_move_delay = control_type.default_move_delay();

        Self {
            control_type,
            canvas_width,
            canvas_height,
            camera_num: 36,
            camera_height: 5.0,
            camera_init_pos: Vec3::new(canvas_width / 2.0, 50.0, canvas_height / 2.0),
            camera_init_rot: utils::euler_degrees(90.0, 0.0, 0.0),
            camera_lookat: Vec3::new(canvas_width / 2.0, 0.0, canvas_height / 2.0),
            camera_move: true,
            camera_move_delay,
            camera_speed: 10.0,
            camera_reach_threshold: 0.1,
            camera_movement: MovementType::MoveTowards,
            camera_path_mode: PathMode::OneWay,
            max_approach_ticks: 10_000,
            camera_save_snapshot: true,
            camera_snapshot_width: 1024,
            camera_snapshot_height: 768,
            density_x: 8,
            density_z: 8,
            spacing_y: 5.0,
            min_layers: 20,
            max_layers: 25,
            rock_mass: 1.0,
            rock_motion: true,
            save_path: PathBuf::from("SyntheticData"),
        }
    }

    /// Switch control type, keeping every other loaded value
    ///
    /// The move delay follows the new control type.
    pub fn switch_control(&mut self, control_type: ControlType) {
        self.control_type = control_type;
        self.camera_move_delay = control_type.default_move_delay();
    }

    /// Centre of the canvas at ground level
    pub fn canvas_center(&self) -> Vec3 {
        Vec3::new(self.canvas_width / 2.0, 0.0, self.canvas_height / 2.0)
    }

    /// Ground plane transform; the unit plane mesh spans 10x10
    pub fn ground_transform(&self) -> Transform {
        let scale = self.canvas_width / 10.0;
        Transform {
            position: self.canvas_center(),
            rotation: Quat::identity(),
            scale: Vec3::new(scale, scale, scale),
        }
    }

    /// Initial camera pose, before any rig is attached
    pub fn camera_init_transform(&self) -> Transform {
        Transform::from_position_rotation(self.camera_init_pos, self.camera_init_rot)
    }

    /// Describe the first problem with the layout fields, if any
    ///
    /// Layout fields are the ones scene generation reads.
    pub fn layout_problem(&self) -> Option<String> {
        if self.max_layers <= self.min_layers {
            return Some(format!(
                "max_layers ({}) must exceed min_layers ({})",
                self.max_layers, self.min_layers
            ));
        }
        if i32::try_from(self.max_layers).is_err() {
            return Some(format!("max_layers ({}) is too large", self.max_layers));
        }
        if self.density_x == 0 || self.density_z == 0 {
            return Some(format!(
                "grid density must be non-zero (x = {}, z = {})",
                self.density_x, self.density_z
            ));
        }
        if self.canvas_width.is_nan() || self.canvas_height.is_nan()
            || self.canvas_width <= 0.0 || self.canvas_height <= 0.0
        {
            return Some(format!(
                "canvas must have a positive extent ({} x {})",
                self.canvas_width, self.canvas_height
            ));
        }
        if !self.spacing_y.is_finite() {
            return Some(format!("spacing_y must be finite ({})", self.spacing_y));
        }
        None
    }

    /// Check every field, failing on the first unusable value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(problem) = self.layout_problem() {
            return Err(ConfigError::InvalidArgument(problem));
        }
        if self.camera_num == 0 {
            return Err(ConfigError::InvalidArgument("camera_num must be non-zero".to_string()));
        }
        if self.camera_speed.is_nan() || self.camera_speed < 0.0 {
            return Err(ConfigError::InvalidArgument(format!(
                "camera_speed must be non-negative ({})",
                self.camera_speed
            )));
        }
        // Arrival is a strict `d² < t²` test, so a zero threshold is never met
        if !self.camera_reach_threshold.is_finite() || self.camera_reach_threshold <= 0.0 {
            return Err(ConfigError::InvalidArgument(format!(
                "camera_reach_threshold must be positive and finite ({})",
                self.camera_reach_threshold
            )));
        }
        if self.camera_snapshot_width == 0 || self.camera_snapshot_height == 0 {
            return Err(ConfigError::InvalidArgument(format!(
                "snapshot dimensions must be non-zero ({} x {})",
                self.camera_snapshot_width, self.camera_snapshot_height
            )));
        }
        if self.max_approach_ticks == 0 {
            return Err(ConfigError::InvalidArgument(
                "max_approach_ticks must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config for SceneConstants {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("riprap_constants_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_are_valid() {
        let manual = SceneConstants::default();
        assert!(manual.validate().is_ok());
        assert_eq!(manual.control_type, ControlType::Manual);
        assert_eq!(manual.camera_move_delay, 0.0);

        let auto = SceneConstants::for_control(ControlType::Auto);
        assert!(auto.validate().is_ok());
        assert_eq!(auto.camera_move_delay, 5.0);
    }

    #[test]
    fn test_ground_transform_scales_with_canvas() {
        let constants = SceneConstants::default();
        let ground = constants.ground_transform();

        assert_relative_eq!(ground.position, Vec3::new(50.0, 0.0, 50.0));
        assert_relative_eq!(ground.scale, Vec3::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_initial_camera_looks_down() {
        let constants = SceneConstants::default();
        let pose = constants.camera_init_transform();

        assert_relative_eq!(pose.forward(), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_validate_rejects_empty_layer_range() {
        let constants = SceneConstants {
            min_layers: 3,
            max_layers: 3,
            ..SceneConstants::default()
        };
        assert!(matches!(constants.validate(), Err(ConfigError::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_rejects_zero_density() {
        let constants = SceneConstants {
            density_z: 0,
            ..SceneConstants::default()
        };
        assert!(constants.layout_problem().is_some());
        assert!(matches!(constants.validate(), Err(ConfigError::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_rejects_camera_settings() {
        let no_cameras = SceneConstants {
            camera_num: 0,
            ..SceneConstants::default()
        };
        assert!(no_cameras.validate().is_err());

        let negative_speed = SceneConstants {
            camera_speed: -1.0,
            ..SceneConstants::default()
        };
        assert!(negative_speed.validate().is_err());

        let no_pixels = SceneConstants {
            camera_snapshot_height: 0,
            ..SceneConstants::default()
        };
        assert!(no_pixels.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        for threshold in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            let constants = SceneConstants {
                camera_reach_threshold: threshold,
                ..SceneConstants::for_control(ControlType::Auto)
            };
            assert!(
                matches!(constants.validate(), Err(ConfigError::InvalidArgument(_))),
                "threshold {} accepted",
                threshold
            );
        }

        let tiny = SceneConstants {
            camera_reach_threshold: 1e-3,
            ..SceneConstants::default()
        };
        assert!(tiny.validate().is_ok());
    }

    #[test]
    fn test_switch_control_keeps_loaded_values() {
        let mut constants = SceneConstants {
            density_x: 1,
            max_layers: 3,
            min_layers: 2,
            camera_num: 4,
            camera_path_mode: PathMode::Loop,
            ..SceneConstants::default()
        };
        constants.switch_control(ControlType::Auto);

        assert_eq!(constants.control_type, ControlType::Auto);
        assert_eq!(constants.camera_move_delay, 5.0);
        assert_eq!(constants.density_x, 1);
        assert_eq!(constants.max_layers, 3);
        assert_eq!(constants.camera_num, 4);
        assert_eq!(constants.camera_path_mode, PathMode::Loop);
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_config_path("round_trip.toml");
        let constants = SceneConstants {
            density_x: 2,
            camera_path_mode: PathMode::Loop,
            camera_movement: MovementType::LerpTowards,
            ..SceneConstants::for_control(ControlType::Auto)
        };

        constants.save_to_file(&path).unwrap();
        let loaded = SceneConstants::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.density_x, 2);
        assert_eq!(loaded.camera_path_mode, PathMode::Loop);
        assert_eq!(loaded.camera_movement, MovementType::LerpTowards);
        assert_eq!(loaded.control_type, ControlType::Auto);
        assert_relative_eq!(loaded.camera_init_pos, constants.camera_init_pos);
    }

    #[test]
    fn test_ron_partial_file_uses_defaults() {
        let path = temp_config_path("partial.ron");
        let contents = "(density_x: 1, density_z: 1, min_layers: 2, max_layers: 3)";
        std::fs::write(&path, contents).unwrap();

        let loaded = SceneConstants::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.density_x, 1);
        assert_eq!(loaded.max_layers, 3);
        assert_eq!(loaded.camera_num, 36);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        // Extension is checked before the file is read
        let result = SceneConstants::load_from_file("missing_constants.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let result = SceneConstants::load_from_file(temp_config_path("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));

        let saved = SceneConstants::default().save_to_file(temp_config_path("constants.json"));
        assert!(matches!(saved, Err(ConfigError::UnsupportedFormat(_))));
    }
}
