//! Camera paths and their traversal
//!
//! A [`Path`] is an ordered list of waypoints plus a traversal mode. A
//! [`PathTraversal`] walks it lazily: every call to [`Iterator::next`]
//! produces the next waypoint, and the cursor stays frozen between calls.
//! Traversing again means constructing a new `PathTraversal` from the same
//! path.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Named point in space visited by a traversal
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Identifying name, used as the capture file name
    pub name: String,
    /// World-space position
    pub position: Vec3,
}

impl Waypoint {
    /// Create a waypoint
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Traversal mode of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathMode {
    /// Visit every waypoint once, then terminate
    OneWay,
    /// Bounce between both ends forever, endpoints included once per turn
    PingPong,
    /// Wrap from the last waypoint back to the first forever
    Loop,
}

/// Ordered waypoints, a traversal mode and a fixed look-at target
#[derive(Debug, Clone)]
pub struct Path {
    sequence: Vec<Arc<Waypoint>>,
    mode: PathMode,
    look_at: Vec3,
}

impl Path {
    /// Create a path; it is traversable only with two or more waypoints
    pub fn new(sequence: Vec<Waypoint>, mode: PathMode, look_at: Vec3) -> Self {
        Self {
            sequence: sequence.into_iter().map(Arc::new).collect(),
            mode,
            look_at,
        }
    }

    /// Waypoints in traversal order
    pub fn sequence(&self) -> &[Arc<Waypoint>] {
        &self.sequence
    }

    /// Traversal mode
    pub fn mode(&self) -> PathMode {
        self.mode
    }

    /// Target every camera pose faces
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the path has no waypoints
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Whether the path has enough waypoints to be traversed
    pub fn is_traversable(&self) -> bool {
        self.sequence.len() >= 2
    }

    /// Segments between consecutive waypoints, closing back to the first
    pub fn edges(&self) -> Vec<(Vec3, Vec3)> {
        if !self.is_traversable() {
            return Vec::new();
        }
        let count = self.sequence.len();
        (0..count)
            .map(|i| (self.sequence[i].position, self.sequence[(i + 1) % count].position))
            .collect()
    }
}

/// Direction of travel along a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward higher indices
    Forward,
    /// Toward lower indices
    Backward,
}

impl Direction {
    fn offset(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Position of a traversal within its path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalCursor {
    /// Index of the waypoint produced last (or about to be produced first)
    pub index: isize,
    /// Current direction of travel
    pub direction: Direction,
    /// Set once a one-way traversal has run off either end
    pub ended: bool,
}

impl Default for TraversalCursor {
    fn default() -> Self {
        Self {
            index: 0,
            direction: Direction::Forward,
            ended: false,
        }
    }
}

/// Lazy, single-pass traversal over a [`Path`]
///
/// One-way traversals are finite; ping-pong and loop traversals never end on
/// their own and must be consumed incrementally. Paths with fewer than two
/// waypoints produce nothing in every mode.
#[derive(Debug, Clone)]
pub struct PathTraversal {
    path: Arc<Path>,
    cursor: TraversalCursor,
    started: bool,
    current: Option<Arc<Waypoint>>,
}

impl PathTraversal {
    /// Start a fresh traversal; nothing is produced until the first `next`
    pub fn new(path: Arc<Path>) -> Self {
        Self {
            path,
            cursor: TraversalCursor::default(),
            started: false,
            current: None,
        }
    }

    /// Path being traversed
    pub fn path(&self) -> &Arc<Path> {
        &self.path
    }

    /// Cursor state
    pub fn cursor(&self) -> TraversalCursor {
        self.cursor
    }

    /// Waypoint produced last, if the traversal is running
    pub fn current(&self) -> Option<&Arc<Waypoint>> {
        self.current.as_ref()
    }

    /// Whether a one-way traversal ran off the end of its path
    pub fn is_ended(&self) -> bool {
        self.cursor.ended
    }

    /// Move the cursor one waypoint along the path
    fn step(&mut self) {
        let len = self.path.len() as isize;
        let cursor = &mut self.cursor;

        if self.path.mode == PathMode::PingPong {
            if cursor.index <= 0 {
                cursor.direction = Direction::Forward;
            } else if cursor.index >= len - 1 {
                cursor.direction = Direction::Backward;
            }
        }
        cursor.index += cursor.direction.offset();

        match self.path.mode {
            PathMode::OneWay => {
                if cursor.index < 0 || cursor.index >= len {
                    cursor.ended = true;
                }
            }
            PathMode::Loop => {
                if cursor.index >= len {
                    cursor.index = 0;
                }
                if cursor.index < 0 {
                    cursor.index = len - 1;
                }
            }
            PathMode::PingPong => {}
        }
    }
}

impl Iterator for PathTraversal {
    type Item = Arc<Waypoint>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.path.is_traversable() || self.cursor.ended {
            self.current = None;
            return None;
        }

        if self.started {
            self.step();
            if self.cursor.ended {
                self.current = None;
                return None;
            }
        } else {
            self.started = true;
        }

        let waypoint = usize::try_from(self.cursor.index)
            .ok()
            .and_then(|index| self.path.sequence.get(index))
            .cloned();
        self.current.clone_from(&waypoint);
        waypoint
    }
}
