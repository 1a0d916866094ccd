use std::fs::{File, OpenOptions};
use std::ops::RangeInclusive;
use std::os::fd::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};

use crate::config::{DeviceSelection, RENDER_NODE_DIR};
use crate::error::AcquireError;

/// Minor numbers the kernel assigns to DRM render nodes.
pub const RENDER_NODE_MINORS: RangeInclusive<u32> = 128..=191;

/// Open read/write handle on a DRM render node.
///
/// Must be the last resource released: every GBM and EGL object borrows it.
#[derive(Debug)]
pub struct DeviceHandle {
    file: File,
    path: PathBuf,
}

impl DeviceHandle {
    /// Opens `path` for read/write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AcquireError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| AcquireError::DeviceOpen {
                path: path.clone(),
                source,
            })?;

        log::debug!("opened render node {}", path.display());
        Ok(Self { file, path })
    }

    /// Opens the device named by `selection`.
    pub fn select(selection: &DeviceSelection) -> Result<Self, AcquireError> {
        match selection {
            DeviceSelection::Fixed(path) => Self::open(path),
            DeviceSelection::Probe => probe_render_nodes(RENDER_NODE_DIR),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsFd for DeviceHandle {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        log::debug!("closing render node {}", self.path.display());
    }
}

/// Opens the first render node under `dir` that accepts a read/write open.
///
/// Nodes are tried in minor-number order; failures are logged and skipped.
pub fn probe_render_nodes(dir: impl AsRef<Path>) -> Result<DeviceHandle, AcquireError> {
    let dir = dir.as_ref();
    for minor in RENDER_NODE_MINORS {
        let candidate = dir.join(format!("renderD{minor}"));
        if !candidate.exists() {
            continue;
        }
        match DeviceHandle::open(&candidate) {
            Ok(handle) => return Ok(handle),
            Err(err) => log::debug!("skipping {}: {err}", candidate.display()),
        }
    }
    Err(AcquireError::NoRenderNode {
        dir: dir.to_path_buf(),
    })
}
