//! Procedural stockpile generator
//!
//! Lays out a random number of layers over a square grid in the middle half
//! of the canvas and poses one pooled instance per grid cell. With a seeded
//! [`RandomSource`] and fixed constants the output is fully reproducible: the
//! (layer, x, z) iteration order fixes both the draw order and the instance
//! names.

use crate::config::SceneConstants;
use crate::foundation::math::{Transform, Vec3};
use crate::foundation::random::RandomSource;
use crate::scene::pool::{InstancePool, PoolError, PrototypeId};

/// Smallest uniform scale drawn for an instance
pub const MIN_INSTANCE_SCALE: f32 = 0.5;

/// Largest uniform scale drawn for an instance
pub const MAX_INSTANCE_SCALE: f32 = 1.0;

/// Errors that abort a generation pass
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Constants or collaborators describe an unusable scene
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Pool rejected an acquisition
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
}

/// One posed instance produced by a generation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Sequential name, zero-padded to four digits
    pub name: String,
    /// Prototype the instance was drawn from
    pub prototype_id: PrototypeId,
    /// Pose given to the instance
    pub transform: Transform,
}

/// Summary of a generation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// Number of layers drawn
    pub layers: u32,
    /// Placements in generation order
    pub placements: Vec<Placement>,
}

/// Grid coordinates along one canvas axis
///
/// Runs from a quarter to three quarters of `extent` in `density` equal
/// steps, both ends included. Computed from the step index so the last cell
/// is never lost to accumulated rounding.
pub fn grid_axis(extent: f32, density: u32) -> impl Iterator<Item = f32> {
    let start = extent / 4.0;
    let step = extent / (2.0 * density as f32);
    (0..=density).map(move |i| start + i as f32 * step)
}

/// Populates an [`InstancePool`] with a freshly randomized stockpile
#[derive(Debug, Default)]
pub struct SceneGenerator {
    passes: u64,
}

impl SceneGenerator {
    /// Create a generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of passes that completed successfully
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Reclaim the pool and lay out a new stockpile
    ///
    /// The layer count is drawn from `[min_layers, max_layers)`. Malformed
    /// constants fail before the pool is touched; a pool error aborts the pass
    /// midway, leaving the instances acquired so far active.
    pub fn generate(
        &mut self,
        constants: &SceneConstants,
        pool: &mut InstancePool,
        rng: &mut dyn RandomSource,
    ) -> Result<GenerationReport, GenerationError> {
        if let Some(problem) = constants.layout_problem() {
            return Err(GenerationError::InvalidArgument(problem));
        }
        let min_layers = to_i32(constants.min_layers, "min_layers")?;
        let max_layers = to_i32(constants.max_layers, "max_layers")?;
        let prototype_count = to_i32(pool.prototype_count(), "prototype count")?;

        pool.reclaim_all();

        let drawn = rng.int_range(min_layers, max_layers);
        let layers = u32::try_from(drawn).map_err(|_| {
            GenerationError::InvalidArgument(format!("random source drew {} layers", drawn))
        })?;

        let mut placements = Vec::new();
        for layer in 0..layers {
            let y = layer as f32 * constants.spacing_y + 1.0;
            for x in grid_axis(constants.canvas_width, constants.density_x) {
                for z in grid_axis(constants.canvas_height, constants.density_z) {
                    let raw_id = rng.int_range(0, prototype_count);
                    // A negative id maps past the table so the pool reports it as out of range
                    let prototype_id = usize::try_from(raw_id).unwrap_or_else(|_| {
                        log::warn!("Random source drew negative prototype id {}", raw_id);
                        usize::MAX
                    });

                    let instance = pool.acquire(prototype_id)?;
                    instance.name = format!("{:04}", placements.len());

                    let rotation = rng.random_rotation();
                    let scale = rng.float_range(MIN_INSTANCE_SCALE, MAX_INSTANCE_SCALE);
                    let position = Vec3::new(x, y, z);
                    instance.transform = Transform::with_uniform_scale(position, rotation, scale);

                    placements.push(Placement {
                        name: instance.name.clone(),
                        prototype_id,
                        transform: instance.transform,
                    });
                }
            }
        }

        self.passes += 1;
        log::info!(
            "Generated {} instances in {} layers (pool: {} created, {} reused)",
            placements.len(),
            layers,
            pool.stats().total_created,
            pool.stats().total_reused
        );

        Ok(GenerationReport { layers, placements })
    }
}

fn to_i32<T>(value: T, what: &str) -> Result<i32, GenerationError>
where
    T: TryInto<i32> + Copy + std::fmt::Display,
{
    value.try_into().map_err(|_| {
        GenerationError::InvalidArgument(format!("{} ({}) is too large", what, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use crate::foundation::random::SeededRandom;
    use crate::scene::pool::Prototype;

    /// Random source that always returns the middle of each range
    struct MidRandom;

    impl RandomSource for MidRandom {
        fn int_range(&mut self, low: i32, high: i32) -> i32 {
            low + (high - low) / 2
        }

        fn float_range(&mut self, low: f32, high: f32) -> f32 {
            (low + high) / 2.0
        }

        fn random_rotation(&mut self) -> Quat {
            Quat::identity()
        }
    }

    /// Random source that draws negative prototype ids
    struct NegativeRandom;

    impl RandomSource for NegativeRandom {
        fn int_range(&mut self, low: i32, _high: i32) -> i32 {
            if low == 0 {
                -1
            } else {
                low
            }
        }

        fn float_range(&mut self, low: f32, _high: f32) -> f32 {
            low
        }

        fn random_rotation(&mut self) -> Quat {
            Quat::identity()
        }
    }

    /// Random source that draws prototype ids past the end of the table
    struct OverflowRandom;

    impl RandomSource for OverflowRandom {
        fn int_range(&mut self, _low: i32, high: i32) -> i32 {
            high
        }

        fn float_range(&mut self, low: f32, _high: f32) -> f32 {
            low
        }

        fn random_rotation(&mut self) -> Quat {
            Quat::identity()
        }
    }

    fn pool(count: usize) -> InstancePool {
        let prototypes = (0..count).map(|i| Prototype::new(format!("rock_{}", i))).collect();
        InstancePool::new(prototypes).unwrap()
    }

    fn small_constants() -> SceneConstants {
        SceneConstants {
            density_x: 1,
            density_z: 1,
            min_layers: 2,
            max_layers: 3,
            canvas_width: 100.0,
            canvas_height: 100.0,
            spacing_y: 5.0,
            ..SceneConstants::default()
        }
    }

    #[test]
    fn test_grid_axis_includes_both_ends() {
        let xs: Vec<f32> = grid_axis(100.0, 1).collect();
        assert_eq!(xs, vec![25.0, 75.0]);

        let xs: Vec<f32> = grid_axis(100.0, 8).collect();
        assert_eq!(xs.len(), 9);
        assert_eq!(xs[0], 25.0);
        assert_eq!(xs[8], 75.0);
    }

    #[test]
    fn test_small_scene_layout() {
        let mut generator = SceneGenerator::new();
        let mut pool = pool(3);
        let report = generator.generate(&small_constants(), &mut pool, &mut MidRandom).unwrap();

        assert_eq!(report.layers, 2);
        assert_eq!(report.placements.len(), 8);

        let ys: Vec<f32> = report.placements.iter().map(|p| p.transform.position.y).collect();
        assert_eq!(ys, vec![1.0, 1.0, 1.0, 1.0, 6.0, 6.0, 6.0, 6.0]);

        // z varies fastest within a layer
        let xz: Vec<(f32, f32)> = report.placements[..4]
            .iter()
            .map(|p| (p.transform.position.x, p.transform.position.z))
            .collect();
        assert_eq!(xz, vec![(25.0, 25.0), (25.0, 75.0), (75.0, 25.0), (75.0, 75.0)]);

        let names: Vec<&str> = report.placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["0000", "0001", "0002", "0003", "0004", "0005", "0006", "0007"]);

        for placement in &report.placements {
            assert_eq!(placement.prototype_id, 1);
            assert_eq!(placement.transform.scale, Vec3::new(0.75, 0.75, 0.75));
        }
        assert_eq!(pool.active_count(1), 8);
        assert_eq!(generator.passes(), 1);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let constants = SceneConstants {
            density_x: 3,
            density_z: 2,
            min_layers: 2,
            max_layers: 6,
            ..SceneConstants::default()
        };

        let run = |seed: u64| {
            let mut pool = pool(4);
            let mut rng = SeededRandom::from_seed(seed);
            SceneGenerator::new().generate(&constants, &mut pool, &mut rng).unwrap()
        };

        let first = run(1234);
        let second = run(1234);
        assert_eq!(first, second);
        assert!(first.layers >= 2 && first.layers < 6);
        assert_eq!(first.placements.len(), first.layers as usize * 4 * 3);
    }

    #[test]
    fn test_regeneration_reuses_pool() {
        let constants = small_constants();
        let mut generator = SceneGenerator::new();
        let mut pool = pool(1);
        let mut rng = SeededRandom::from_seed(9);

        generator.generate(&constants, &mut pool, &mut rng).unwrap();
        assert_eq!(pool.stats().total_created, 8);

        let report = generator.generate(&constants, &mut pool, &mut rng).unwrap();
        assert_eq!(report.placements.len(), 8);
        assert_eq!(pool.stats().total_created, 8);
        assert_eq!(pool.stats().total_reused, 8);
        assert_eq!(pool.instances(0).len(), 8);

        // Pool instances carry the new poses
        let active: Vec<&str> = pool.active_instances().map(|i| i.name.as_str()).collect();
        assert_eq!(active.len(), 8);
        for (instance, placement) in pool.active_instances().zip(&report.placements) {
            assert_eq!(instance.name, placement.name);
            assert_eq!(instance.transform, placement.transform);
        }
    }

    #[test]
    fn test_scales_stay_in_range() {
        let mut pool = pool(2);
        let mut rng = SeededRandom::from_seed(77);
        let report = SceneGenerator::new()
            .generate(&SceneConstants::default(), &mut pool, &mut rng)
            .unwrap();

        assert!(report.layers >= 20 && report.layers < 25);
        for placement in &report.placements {
            let scale = placement.transform.scale;
            assert!((MIN_INSTANCE_SCALE..=MAX_INSTANCE_SCALE).contains(&scale.x));
            assert_eq!(scale.x, scale.y);
            assert_eq!(scale.y, scale.z);
        }
    }

    #[test]
    fn test_malformed_constants_fail_before_reclaim() {
        let mut pool = pool(1);
        pool.acquire(0).unwrap();

        let constants = SceneConstants {
            max_layers: 2,
            min_layers: 2,
            ..small_constants()
        };
        let result = SceneGenerator::new().generate(&constants, &mut pool, &mut MidRandom);
        assert!(matches!(result, Err(GenerationError::InvalidArgument(_))));
        assert_eq!(pool.active_count(0), 1);

        let constants = SceneConstants {
            density_x: 0,
            ..small_constants()
        };
        let result = SceneGenerator::new().generate(&constants, &mut pool, &mut MidRandom);
        assert!(matches!(result, Err(GenerationError::InvalidArgument(_))));
    }

    #[test]
    fn test_out_of_range_prototype_aborts_pass() {
        let mut pool = pool(2);
        let mut generator = SceneGenerator::new();
        let result = generator.generate(&small_constants(), &mut pool, &mut OverflowRandom);

        assert_eq!(
            result.unwrap_err(),
            GenerationError::Pool(PoolError::OutOfRange { prototype_id: 2, prototype_count: 2 })
        );
        assert_eq!(generator.passes(), 0);
    }

    #[test]
    fn test_negative_prototype_id_is_out_of_range() {
        let mut pool = pool(2);
        let mut generator = SceneGenerator::new();
        let result = generator.generate(&small_constants(), &mut pool, &mut NegativeRandom);

        assert!(matches!(
            result,
            Err(GenerationError::Pool(PoolError::OutOfRange { prototype_count: 2, .. }))
        ));
        assert_eq!(pool.stats().total_created, 0);
        assert_eq!(generator.passes(), 0);
    }
}
