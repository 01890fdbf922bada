//! Link status probe via the local skupper CLI.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{ProbeError, ScrapeError};

/// Responsiveness budget handed to the CLI itself, distinct from the outer
/// `--wait` budget. Part of the tool's flag contract, passed verbatim.
const PROBE_INNER_TIMEOUT: &str = "0.01s";

/// A source of raw link-status text for one scrape cycle.
///
/// The production implementation is [`SkupperCli`]; tests substitute a
/// stub so no subprocess is spawned.
pub trait LinkProbe {
    fn fetch_status(&self) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}

/// Runs the local `skupper` binary and captures its link-status report.
pub struct SkupperCli {
    binary: PathBuf,
    timeout: Duration,
}

impl SkupperCli {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Invoke `skupper link status --wait <secs> --timeout 0.01s` and
    /// return captured stdout.
    ///
    /// Stdout is decoded lossily; encoding damage degrades to fewer parsed
    /// records downstream rather than failing the scrape. Spawn failure,
    /// non-zero exit, and a hung process all surface as [`ProbeError`].
    pub async fn run(&self) -> Result<String, ProbeError> {
        let wait_secs = self.timeout.as_secs().to_string();
        debug!(binary = %self.binary.display(), wait = %wait_secs, "running link status probe");

        let child = Command::new(&self.binary)
            .args([
                "link",
                "status",
                "--wait",
                &wait_secs,
                "--timeout",
                PROBE_INNER_TIMEOUT,
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        // One second of grace on top of --wait, so under normal operation
        // the CLI's own budget governs and the watchdog only catches a
        // binary that ignores it.
        let budget = self.timeout + Duration::from_secs(1);
        let output = tokio::time::timeout(budget, child.wait_with_output())
            .await
            .map_err(|_| ProbeError::Timeout(budget))?
            .map_err(|source| ProbeError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Exit {
                binary: self.binary.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl LinkProbe for SkupperCli {
    async fn fetch_status(&self) -> Result<String, ScrapeError> {
        self.run().await.map_err(ScrapeError::from)
    }
}
