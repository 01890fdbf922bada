//! Compilation of fetched state into the exported metric families.
//!
//! The five families below are the schema contract external consumers
//! depend on. Family order and sample order are fixed: sites, services,
//! and links appear exactly as fetched.

use tracing::debug;

use crate::metrics::MetricFamily;
use crate::parser::LinkRecord;
use crate::stats::ControllerStats;

/// Compile the four controller-derived families, in exposition order:
/// `skupper_site_spec`, `skupper_site_outgoing_connections`,
/// `skupper_service_spec`, `skupper_service_count`.
pub fn compile_controller_metrics(stats: &ControllerStats) -> Vec<MetricFamily> {
    let mut site_spec = MetricFamily::info(
        "skupper_site_spec",
        "Skupper version and site information",
        vec!["site_name", "namespace"],
    );
    let mut outgoing_connections = MetricFamily::gauge(
        "skupper_site_outgoing_connections",
        "Number of outgoing site connections",
        vec!["site_name", "namespace"],
    );

    debug!(sites = stats.sites.len(), "compiling site metrics");
    for site in &stats.sites {
        let label_values = vec![site.site_name.clone(), site.namespace.clone()];
        site_spec.add_info(
            label_values.clone(),
            vec![
                ("version", site.version.clone()),
                ("site_id", site.site_id.clone()),
                ("edge", flag(site.edge)),
                ("gateway", flag(site.gateway)),
                ("url", site.url.clone()),
            ],
        );
        outgoing_connections.add_gauge(label_values, site.connected.len() as f64);
    }

    debug!(services = stats.services.len(), "compiling service metrics");
    let mut service_spec =
        MetricFamily::info("skupper_service_spec", "Service information", vec![]);
    for service in &stats.services {
        service_spec.add_info(
            vec![],
            vec![
                ("address", service.address.clone()),
                ("protocol", service.protocol.clone()),
            ],
        );
    }

    let mut service_count = MetricFamily::gauge(
        "skupper_service_count",
        "Number of available skupper services",
        vec![],
    );
    service_count.add_gauge(vec![], stats.services.len() as f64);

    vec![
        site_spec,
        outgoing_connections,
        service_spec,
        service_count,
    ]
}

/// Compile `skupper_link_status`: one gauge sample per link, in probe
/// order, 1 if the link is active and 0 otherwise.
pub fn compile_link_metrics(links: &[LinkRecord]) -> MetricFamily {
    let mut link_status = MetricFamily::gauge(
        "skupper_link_status",
        "Status of links created from this site",
        vec!["link_name"],
    );
    for link in links {
        link_status.add_gauge(
            vec![link.name.clone()],
            if link.active { 1.0 } else { 0.0 },
        );
    }
    link_status
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
