use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::buffer::PixelBuffer;
use crate::foundation::error::{SheetError, SheetResult};

/// Where intermediate render output lives between render and composite.
///
/// `InMemory` hands the buffer straight through. `Disk` writes a
/// full-precision raw dump and reloads it at composite time, for embedders
/// that need on-disk parity with renderers producing file output; `dir`
/// defaults to the system temp dir.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SpillMode {
    #[default]
    InMemory,
    Disk { dir: Option<PathBuf> },
}

/// Tracks intermediate render artifacts for one job.
///
/// Every rendered view is round-tripped through [`ArtifactStore::acquire`];
/// the returned guard removes any backing file when it drops, on success and
/// error paths alike, so a job that renders hundreds of views never leaks.
#[derive(Debug)]
pub struct ArtifactStore {
    spill: SpillMode,
    tag: String,
    outstanding: Cell<usize>,
}

impl ArtifactStore {
    pub fn new(spill: SpillMode) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Self {
            spill,
            tag: format!("{}_{}", std::process::id(), nanos),
            outstanding: Cell::new(0),
        }
    }

    /// Take ownership of a rendered view for the current loop iteration.
    pub fn acquire(&self, index: usize, buffer: PixelBuffer) -> SheetResult<ArtifactGuard<'_>> {
        let (buffer, path) = match &self.spill {
            SpillMode::InMemory => (Some(buffer), None),
            SpillMode::Disk { dir } => {
                let dir = dir.clone().unwrap_or_else(std::env::temp_dir);
                let path = dir.join(format!("view_{}_{index:03}.rgba32f", self.tag));
                write_spill(&path, &buffer)?;
                (None, Some(path))
            }
        };

        self.outstanding.set(self.outstanding.get() + 1);
        Ok(ArtifactGuard {
            store: self,
            buffer,
            path,
        })
    }

    /// Number of artifacts currently held by live guards.
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }
}

/// Scoped handle to one intermediate artifact. Dropping it releases the
/// artifact and deletes its backing file if one was written.
#[derive(Debug)]
pub struct ArtifactGuard<'a> {
    store: &'a ArtifactStore,
    buffer: Option<PixelBuffer>,
    path: Option<PathBuf>,
}

impl ArtifactGuard<'_> {
    /// Consume the guard and yield the view's pixels, reloading from disk
    /// when the store spilled them. The backing file is still removed when
    /// the guard drops at the end of this call.
    pub fn take(mut self) -> SheetResult<PixelBuffer> {
        if let Some(buffer) = self.buffer.take() {
            return Ok(buffer);
        }
        match &self.path {
            Some(path) => read_spill(path),
            None => Err(SheetError::io("render artifact was already consumed")),
        }
    }

    pub fn spill_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Drop for ArtifactGuard<'_> {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove spilled view");
                }
            }
        }
        self.store
            .outstanding
            .set(self.store.outstanding.get().saturating_sub(1));
    }
}

/// Raw spill format: width and height as little-endian u32, then the
/// f32 channel data in buffer order.
fn write_spill(path: &Path, buffer: &PixelBuffer) -> SheetResult<()> {
    let data = buffer.data();
    let mut bytes = Vec::with_capacity(8 + data.len() * 4);
    bytes.extend_from_slice(&buffer.width().to_le_bytes());
    bytes.extend_from_slice(&buffer.height().to_le_bytes());
    for v in data {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    std::fs::write(path, bytes)
        .map_err(|e| SheetError::io(format!("write spilled view '{}': {e}", path.display())))
}

fn read_spill(path: &Path) -> SheetResult<PixelBuffer> {
    let bytes = std::fs::read(path)
        .map_err(|e| SheetError::io(format!("read spilled view '{}': {e}", path.display())))?;
    if bytes.len() < 8 {
        return Err(SheetError::io(format!(
            "spilled view '{}' is truncated",
            path.display()
        )));
    }

    let mut dim = [0u8; 4];
    dim.copy_from_slice(&bytes[0..4]);
    let width = u32::from_le_bytes(dim);
    dim.copy_from_slice(&bytes[4..8]);
    let height = u32::from_le_bytes(dim);

    let payload = &bytes[8..];
    if !payload.len().is_multiple_of(4) {
        return Err(SheetError::io(format!(
            "spilled view '{}' has a partial channel value",
            path.display()
        )));
    }
    let mut data = Vec::with_capacity(payload.len() / 4);
    let mut chunk = [0u8; 4];
    for c in payload.chunks_exact(4) {
        chunk.copy_from_slice(c);
        data.push(f32::from_le_bytes(chunk));
    }
    PixelBuffer::from_raw(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) % 2) as f32;
                buf.set_pixel(x, y, [v, 1.0 - v, 0.5, 1.0]).unwrap();
            }
        }
        buf
    }

    #[test]
    fn in_memory_take_returns_the_same_pixels() {
        let store = ArtifactStore::new(SpillMode::InMemory);
        let buffer = checker(4, 4);
        let guard = store.acquire(0, buffer.clone()).unwrap();
        assert!(guard.spill_path().is_none());
        assert_eq!(store.outstanding(), 1);
        assert_eq!(guard.take().unwrap(), buffer);
        assert_eq!(store.outstanding(), 0);
    }

    #[test]
    fn disk_spill_roundtrips_and_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(SpillMode::Disk {
            dir: Some(dir.path().to_path_buf()),
        });

        let buffer = checker(6, 3);
        let guard = store.acquire(7, buffer.clone()).unwrap();
        let path = guard.spill_path().unwrap().to_path_buf();
        assert!(path.exists());

        assert_eq!(guard.take().unwrap(), buffer);
        assert!(!path.exists(), "spill file must be removed after take");
        assert_eq!(store.outstanding(), 0);
    }

    #[test]
    fn dropping_an_unconsumed_guard_still_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(SpillMode::Disk {
            dir: Some(dir.path().to_path_buf()),
        });

        let guard = store.acquire(0, checker(2, 2)).unwrap();
        let path = guard.spill_path().unwrap().to_path_buf();
        assert!(path.exists());
        drop(guard);
        assert!(!path.exists(), "spill file must be removed on early drop");
        assert_eq!(store.outstanding(), 0);
    }

    #[test]
    fn truncated_spill_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.rgba32f");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        assert!(matches!(
            read_spill(&path),
            Err(SheetError::Io(_))
        ));
    }
}
