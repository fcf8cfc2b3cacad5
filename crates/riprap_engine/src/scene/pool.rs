//! Instance Pool
//!
//! Keeps every instance ever created for a prototype and hands them out again
//! on the next regeneration instead of destroying and recreating objects each
//! cycle.
//!
//! # Invariant
//!
//! For every prototype `p`, `active_count[p] <= instances[p].len()` and the
//! first `active_count[p]` instances of `p` are exactly the active ones.
//! Growth is append-only, so active instances always form a contiguous prefix
//! and acquiring is O(1) amortized.

use crate::foundation::math::Transform;

/// Index of a prototype in the pool's prototype table
pub type PrototypeId = usize;

/// Template for a class of placeable object
///
/// Immutable once loaded into a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    /// Asset name the prototype was loaded from
    pub name: String,
    /// Rigid body mass
    pub mass: f32,
    /// Whether gravity acts on the body
    pub use_gravity: bool,
    /// Kinematic bodies are moved by script only and never simulated
    pub kinematic: bool,
}

impl Prototype {
    /// Create a dynamic prototype with unit mass
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mass: 1.0,
            use_gravity: true,
            kinematic: false,
        }
    }

    /// Apply body settings shared by every prototype of a scene
    pub fn with_body(mut self, mass: f32, motion: bool) -> Self {
        self.mass = mass;
        self.use_gravity = true;
        self.kinematic = !motion;
        self
    }
}

/// One concrete, reusable placement of a prototype
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    prototype_id: PrototypeId,
    /// Display name, reassigned on every generation pass
    pub name: String,
    /// World-space pose
    pub transform: Transform,
    active: bool,
}

impl Instance {
    fn new(prototype_id: PrototypeId) -> Self {
        Self {
            prototype_id,
            name: String::new(),
            transform: Transform::identity(),
            active: true,
        }
    }

    /// Prototype this instance was created from
    pub fn prototype_id(&self) -> PrototypeId {
        self.prototype_id
    }

    /// Whether the instance is part of the current scene
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Errors that can occur during pool management
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Pool created without any prototype
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Prototype id outside the prototype table
    #[error("Prototype {prototype_id} out of range (pool has {prototype_count} prototypes)")]
    OutOfRange {
        /// The requested prototype id
        prototype_id: PrototypeId,
        /// Number of prototypes in the pool
        prototype_count: usize,
    },
}

/// Statistics for the instance pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances constructed since the pool was created
    pub total_created: u64,
    /// Acquisitions served by reactivating an existing instance
    pub total_reused: u64,
    /// Instances currently active across all prototypes
    pub active_instances: usize,
    /// Instances owned by the pool across all prototypes
    pub total_instances: usize,
}

/// Per-prototype pool of reusable instances
#[derive(Debug)]
pub struct InstancePool {
    prototypes: Vec<Prototype>,
    instances: Vec<Vec<Instance>>,
    active_count: Vec<usize>,
    stats: PoolStats,
}

impl InstancePool {
    /// Create a pool with one empty instance list per prototype
    pub fn new(prototypes: Vec<Prototype>) -> Result<Self, PoolError> {
        if prototypes.is_empty() {
            return Err(PoolError::InvalidArgument(
                "an instance pool needs at least one prototype".to_string(),
            ));
        }

        let count = prototypes.len();
        log::info!("Created instance pool for {} prototypes", count);
        Ok(Self {
            prototypes,
            instances: vec![Vec::new(); count],
            active_count: vec![0; count],
            stats: PoolStats::default(),
        })
    }

    /// Hand out an instance of `prototype_id`, reusing an inactive one first
    ///
    /// The returned instance is active and sits at position
    /// `active_count(prototype_id) - 1` of that prototype's list.
    pub fn acquire(&mut self, prototype_id: PrototypeId) -> Result<&mut Instance, PoolError> {
        let prototype_count = self.prototypes.len();
        let (pool, active) = match (
            self.instances.get_mut(prototype_id),
            self.active_count.get_mut(prototype_id),
        ) {
            (Some(pool), Some(active)) => (pool, active),
            _ => {
                return Err(PoolError::OutOfRange {
                    prototype_id,
                    prototype_count,
                })
            }
        };

        let slot = *active;
        if slot < pool.len() {
            pool[slot].active = true;
            self.stats.total_reused += 1;
            log::trace!("Reusing instance {} of prototype {}", slot, prototype_id);
        } else {
            pool.push(Instance::new(prototype_id));
            self.stats.total_created += 1;
            self.stats.total_instances += 1;
            log::debug!("Created instance {} of prototype {}", slot, prototype_id);
        }
        *active += 1;
        self.stats.active_instances += 1;

        Ok(&mut pool[slot])
    }

    /// Deactivate every instance and reset all active counts
    ///
    /// Inactive tail instances are deactivated too. Idempotent.
    pub fn reclaim_all(&mut self) {
        for (pool, active) in self.instances.iter_mut().zip(self.active_count.iter_mut()) {
            for instance in pool.iter_mut() {
                instance.active = false;
            }
            *active = 0;
        }
        self.stats.active_instances = 0;
    }

    /// Prototype table
    pub fn prototypes(&self) -> &[Prototype] {
        &self.prototypes
    }

    /// Number of prototypes
    pub fn prototype_count(&self) -> usize {
        self.prototypes.len()
    }

    /// Every instance created for `prototype_id`, in creation order
    pub fn instances(&self, prototype_id: PrototypeId) -> &[Instance] {
        self.instances.get(prototype_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of active instances of `prototype_id`
    pub fn active_count(&self, prototype_id: PrototypeId) -> usize {
        self.active_count.get(prototype_id).copied().unwrap_or(0)
    }

    /// Active instances across all prototypes, grouped by prototype
    pub fn active_instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances
            .iter()
            .zip(self.active_count.iter())
            .flat_map(|(pool, &active)| pool[..active].iter())
    }

    /// Current pool statistics
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}
