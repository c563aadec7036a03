use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Process-wide so two targets on the same file never share a temp name.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// The container whose content the widget owns.
///
/// `replace_contents` swaps the whole content in one step; readers never
/// observe a half-written render.
pub trait RenderTarget: Send + Sync {
    fn replace_contents(&self, markup: &str);
}

/// In-memory container, cheap to clone (just an Arc bump).
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    inner: Arc<RwLock<String>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RenderTarget for SharedBuffer {
    fn replace_contents(&self, markup: &str) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clear();
        guard.push_str(markup);
    }
}

/// HTML fragment on disk, for a host page that includes it.
///
/// Each render goes to its own sibling temp file which is then renamed over
/// the target, so the fragment is always either the old or the new content,
/// even with overlapping writers.
///
/// Writes are blocking file I/O on the calling task. Fine for a small
/// fragment; a host rendering large content should wrap its own target in
/// `tokio::task::spawn_blocking`.
#[derive(Clone, Debug)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_tmp_path(&self) -> PathBuf {
        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        tmp_name.push(format!(".{}.{seq}.tmp", process::id()));
        self.path.with_file_name(tmp_name)
    }

    fn write_atomic(&self, markup: &str) -> io::Result<()> {
        let tmp_path = self.next_tmp_path();
        if let Err(err) = fs::write(&tmp_path, markup).and_then(|_| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }
        Ok(())
    }
}

impl RenderTarget for FileTarget {
    fn replace_contents(&self, markup: &str) {
        if let Err(err) = self.write_atomic(markup) {
            warn!(path = %self.path.display(), error = %err, "failed to write market data fragment");
        }
    }
}
