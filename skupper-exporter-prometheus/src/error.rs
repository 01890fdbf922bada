//! Scrape error taxonomy.

use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors that abort a single scrape cycle.
///
/// Both variants are fatal to the current scrape only. The HTTP handler
/// reports the failure to the scraper and the process keeps serving; no
/// partial metric output is ever produced.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("unable to fetch stats from the service controller")]
    ControllerUnavailable(#[source] ControllerError),

    #[error("unable to probe link status")]
    LinkProbeUnavailable(#[source] ProbeError),
}

/// Causes of a failed controller stats fetch.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Transport failure, timeout, non-2xx status, or a non-JSON body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The body was valid JSON but not shaped like a stats document.
    #[error("malformed stats payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Causes of a failed link status probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} exited with {status}: {stderr}")]
    Exit {
        binary: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("probe did not complete within {0:?}")]
    Timeout(Duration),
}

impl From<ControllerError> for ScrapeError {
    fn from(e: ControllerError) -> Self {
        ScrapeError::ControllerUnavailable(e)
    }
}

impl From<ProbeError> for ScrapeError {
    fn from(e: ProbeError) -> Self {
        ScrapeError::LinkProbeUnavailable(e)
    }
}
