//! exiftool extractor. Keeps long-lived `exiftool -stay_open True -@ -` processes and feeds them
//! one `-j -q <path> -execute` request per file, so perl starts once per process, not per file.

use anyhow::{Context, Result, bail};
use log::debug;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{MetadataExtractor, RawMetadata};

const DEFAULT_BINARY: &str = "exiftool";
/// Line exiftool prints after each `-execute` in stay-open mode.
const READY_MARK: &str = "{ready}";

/// One stay-open exiftool process. Requests and replies are strictly alternating.
struct StayOpen {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl StayOpen {
    fn spawn(binary: &Path) -> Result<Self> {
        let mut child = Command::new(binary)
            .args(["-stay_open", "True", "-@", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("spawn {} -stay_open", binary.display()))?;
        let stdin = child.stdin.take().context("exiftool stdin not captured")?;
        let stdout = child.stdout.take().context("exiftool stdout not captured")?;
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Send one request and collect stdout up to the ready mark.
    fn request(&mut self, path: &Path) -> Result<Vec<u8>> {
        let path_str = path.to_string_lossy();
        if path_str.contains('\n') {
            bail!("path contains a newline: {}", path.display());
        }
        let request = format!("-j\n-q\n{path_str}\n-execute\n");
        self.stdin.write_all(request.as_bytes())?;
        self.stdin.flush()?;

        let mut out = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                bail!("exiftool exited before answering for {}", path.display());
            }
            if line.trim_end() == READY_MARK {
                return Ok(out);
            }
            out.extend_from_slice(line.as_bytes());
        }
    }
}

impl Drop for StayOpen {
    fn drop(&mut self) {
        let _ = self.stdin.write_all(b"-stay_open\nFalse\n");
        let _ = self.stdin.flush();
        let _ = self.child.wait();
    }
}

pub struct ExiftoolExtractor {
    binary: PathBuf,
    pool: Vec<Mutex<StayOpen>>,
    next: AtomicUsize,
}

impl ExiftoolExtractor {
    /// `exiftool` from `PATH`, one stay-open process per worker.
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_binary(DEFAULT_BINARY, workers)
    }

    /// Probe `binary -ver`, then start `workers` stay-open processes (at least one).
    pub fn with_binary(binary: impl Into<PathBuf>, workers: usize) -> Result<Self> {
        let binary = binary.into();
        let out = Command::new(&binary)
            .arg("-ver")
            .output()
            .with_context(|| {
                format!(
                    "error while initializing metadata extractor ({})",
                    binary.display()
                )
            })?;
        if !out.status.success() {
            bail!(
                "error while initializing metadata extractor: {} -ver exited with {}",
                binary.display(),
                out.status
            );
        }
        debug!(
            "exiftool version {}, {} stay-open process(es)",
            String::from_utf8_lossy(&out.stdout).trim(),
            workers.max(1)
        );
        let pool = (0..workers.max(1))
            .map(|_| StayOpen::spawn(&binary).map(Mutex::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            binary,
            pool,
            next: AtomicUsize::new(0),
        })
    }

    /// Number of stay-open processes.
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }
}

/// Parse `exiftool -j` output. Empty output means no records.
pub fn parse_exiftool_json(stdout: &[u8]) -> Result<Vec<RawMetadata>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(stdout).context("decode exiftool json output")
}

impl MetadataExtractor for ExiftoolExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<RawMetadata>> {
        let slot = self.next.fetch_add(1, Ordering::Relaxed) % self.pool.len();
        let stdout = self.pool[slot]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .request(path)
            .with_context(|| format!("run {}", self.binary.display()))?;
        parse_exiftool_json(&stdout)
    }
}
