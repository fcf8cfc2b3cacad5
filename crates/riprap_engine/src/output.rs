//! Capture and output-directory collaborators
//!
//! The core never writes images itself. It hands [`CaptureRequest`]s to a
//! [`SnapshotSink`] and asks an [`OutputDirectories`] implementation for the
//! per-scene directory. Failures stay inside the collaborators.

use std::path::{Path, PathBuf};

/// Request to persist one rendered view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// File stem, normally the waypoint name
    pub name: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Directory the image belongs in
    pub output_dir: PathBuf,
    /// Which synthetic pass to capture (0 is the plain colour image)
    pub variant: u32,
}

/// Fire-and-forget consumer of capture requests
pub trait SnapshotSink {
    /// Persist a view; errors are handled by the sink, never reported back
    fn capture(&mut self, request: CaptureRequest);
}

/// Sink that only logs requests
#[derive(Debug, Default)]
pub struct LogSink {
    captured: usize,
}

impl LogSink {
    /// Create a logging sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests seen so far
    pub fn captured(&self) -> usize {
        self.captured
    }
}

impl SnapshotSink for LogSink {
    fn capture(&mut self, request: CaptureRequest) {
        self.captured += 1;
        log::info!(
            "Capture {} ({}x{}, variant {}) -> {}",
            request.name,
            request.width,
            request.height,
            request.variant,
            request.output_dir.display()
        );
    }
}

/// Sink that keeps every request in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Requests in arrival order
    pub requests: Vec<CaptureRequest>,
}

impl SnapshotSink for RecordingSink {
    fn capture(&mut self, request: CaptureRequest) {
        self.requests.push(request);
    }
}

/// Directory for scene `scene_id` under `base`: `<base>/Stockpile_<id:03>`
pub fn stockpile_dir(base: &Path, scene_id: u32) -> PathBuf {
    base.join(format!("Stockpile_{:03}", scene_id))
}

/// Produces the output directory for each capture cycle
pub trait OutputDirectories {
    /// Make sure the directory for `scene_id` exists and return its path
    fn prepare(&mut self, scene_id: u32) -> std::io::Result<PathBuf>;
}

/// Creates stockpile directories on the local filesystem
#[derive(Debug, Clone)]
pub struct FsDirectories {
    base: PathBuf,
}

impl FsDirectories {
    /// Create directories below `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl OutputDirectories for FsDirectories {
    fn prepare(&mut self, scene_id: u32) -> std::io::Result<PathBuf> {
        let dir = stockpile_dir(&self.base, scene_id);
        std::fs::create_dir_all(&dir)?;
        log::info!("Prepared output directory {}", dir.display());
        Ok(dir)
    }
}

/// Computes directory paths without touching the filesystem
#[derive(Debug, Clone, Default)]
pub struct VirtualDirectories {
    base: PathBuf,
    /// Scene ids prepared so far, in order
    pub prepared: Vec<u32>,
}

impl VirtualDirectories {
    /// Compute paths below `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            prepared: Vec::new(),
        }
    }
}

impl OutputDirectories for VirtualDirectories {
    fn prepare(&mut self, scene_id: u32) -> std::io::Result<PathBuf> {
        self.prepared.push(scene_id);
        Ok(stockpile_dir(&self.base, scene_id))
    }
}
