//! Prometheus metrics exporter for Skupper service networks.
//!
//! This crate translates the operational state of a Skupper overlay into
//! Prometheus metrics. Every scrape of the `/metrics` endpoint runs one
//! fresh fetch-parse-compile cycle over two data sources: the
//! service-controller stats API (JSON over HTTP) and the local `skupper`
//! CLI binary (free-text link-status report). Nothing is cached between
//! scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ Service Controller │────>│                 │     │                 │
//! │   (GET /DATA)      │     │    Collector    │────>│   HTTP Server   │
//! ├────────────────────┤     │ (fetch/compile) │     │   (/metrics)    │
//! │ skupper CLI probe  │────>│                 │     │                 │
//! │   (link status)    │     └─────────────────┘     └─────────────────┘
//! └────────────────────┘
//! ```
//!
//! # Usage
//!
//! Configuration is read from `spc_`-prefixed environment variables:
//!
//! ```bash
//! spc_service_controller=http://controller:8888/DATA \
//! spc_skupper_binary=/opt/skupper/skupper \
//! skupper-exporter-prometheus
//! ```
//!
//! See [`config::ExporterConfig`] for the full variable list.

pub mod collector;
pub mod compile;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod metrics;
pub mod parser;
pub mod probe;
pub mod stats;

pub use collector::SkupperCollector;
pub use config::ExporterConfig;
pub use controller::{ControllerClient, StatsSource};
pub use error::{ControllerError, ProbeError, ScrapeError};
pub use http::HttpServer;
pub use metrics::{MetricFamily, MetricKind, Sample};
pub use parser::{LinkRecord, parse_link_status};
pub use probe::{LinkProbe, SkupperCli};
pub use stats::{ControllerStats, Service, Site};
