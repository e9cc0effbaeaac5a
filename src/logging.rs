//! Tracing subscriber setup: a rotating, line-flushed `deskmate.log`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "deskmate.log";
pub const LOG_ENV_VAR: &str = "DESKMATE_LOG";
const DEFAULT_FILTER: &str = "deskmate=info,warn";
const KEEP_ROTATED: u32 = 3;

/// Install the global subscriber writing to `<log_dir>/deskmate.log`.
///
/// Existing logs are rotated first (`deskmate.log` → `.1` → `.2` → `.3`).
/// The filter comes from `DESKMATE_LOG`, then `RUST_LOG`, then the default.
pub fn init_tracing(log_dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);

    rotate_log_file(&log_path, KEEP_ROTATED);

    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(FlushingWriter::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        log_file = %log_path.display(),
        pid = std::process::id(),
        "=== Deskmate starting ==="
    );

    Ok(log_path)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Shift `base` → `base.1` → … → `base.{keep}`, deleting the oldest.
///
/// Gaps in the chain are skipped.
pub fn rotate_log_file(base: &Path, keep: u32) {
    if keep == 0 {
        let _ = std::fs::remove_file(base);
        return;
    }

    let numbered = |i: u32| PathBuf::from(format!("{}.{i}", base.display()));

    let _ = std::fs::remove_file(numbered(keep));
    for i in (1..keep).rev() {
        let _ = std::fs::rename(numbered(i), numbered(i + 1));
    }
    if base.exists() {
        let _ = std::fs::rename(base, numbered(1));
    }
}

/// File writer that flushes after every write so no line is lost on a crash.
#[derive(Clone)]
struct FlushingWriter {
    file: Arc<Mutex<File>>,
}

impl FlushingWriter {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }

    fn lock(&self) -> std::io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|e| std::io::Error::other(format!("lock poisoned: {e}")))
    }
}

impl Write for FlushingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut f = self.lock()?;
        let n = f.write(buf)?;
        f.flush()?;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.lock()?.flush()
    }
}

impl<'a> MakeWriter<'a> for FlushingWriter {
    type Writer = FlushingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
