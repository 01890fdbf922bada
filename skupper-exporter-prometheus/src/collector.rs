//! One scrape cycle: fetch, parse, compile.

use tracing::debug;

use crate::compile::{compile_controller_metrics, compile_link_metrics};
use crate::controller::StatsSource;
use crate::error::ScrapeError;
use crate::metrics::MetricFamily;
use crate::parser::parse_link_status;
use crate::probe::LinkProbe;

/// Orchestrates one scrape cycle over the two data sources.
///
/// Holds no mutable state: concurrent scrape requests may run
/// [`collect`](SkupperCollector::collect) independently without locking.
/// A failed fetch stage aborts the whole cycle and no partial families are
/// returned. The controller fetch runs first, so a controller failure
/// means the link probe is never attempted.
pub struct SkupperCollector<S, P> {
    stats_source: S,
    link_probe: P,
}

impl<S: StatsSource, P: LinkProbe> SkupperCollector<S, P> {
    pub fn new(stats_source: S, link_probe: P) -> Self {
        Self {
            stats_source,
            link_probe,
        }
    }

    /// Run one full fetch-parse-compile cycle and return the five metric
    /// families in exposition order.
    pub async fn collect(&self) -> Result<Vec<MetricFamily>, ScrapeError> {
        let stats = self.stats_source.fetch_stats().await?;
        let mut families = compile_controller_metrics(&stats);

        let report = self.link_probe.fetch_status().await?;
        let links = parse_link_status(&report);
        debug!(links = links.len(), "parsed link status report");
        families.push(compile_link_metrics(&links));

        Ok(families)
    }
}
