//! Metric family model and Prometheus text exposition.

use std::fmt::Write;

/// Prometheus metric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Info,
    Gauge,
}

impl MetricKind {
    /// Get the TYPE comment string for the exposition format.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Info => "info",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// One observation within a family.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Gauge {
        label_values: Vec<String>,
        value: f64,
    },
    /// Info samples have a fixed value of 1 and carry their payload as
    /// extra labels.
    Info {
        label_values: Vec<String>,
        fields: Vec<(&'static str, String)>,
    },
}

/// A named group of samples sharing documentation and a label schema.
///
/// Family names and label names are the exposition contract; renaming any
/// of them is a breaking change for scrape consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: &'static str,
    pub kind: MetricKind,
    pub documentation: &'static str,
    pub labels: Vec<&'static str>,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    /// Create an empty gauge family.
    pub fn gauge(
        name: &'static str,
        documentation: &'static str,
        labels: Vec<&'static str>,
    ) -> Self {
        Self {
            name,
            kind: MetricKind::Gauge,
            documentation,
            labels,
            samples: Vec::new(),
        }
    }

    /// Create an empty info family.
    pub fn info(
        name: &'static str,
        documentation: &'static str,
        labels: Vec<&'static str>,
    ) -> Self {
        Self {
            name,
            kind: MetricKind::Info,
            documentation,
            labels,
            samples: Vec::new(),
        }
    }

    /// Append a gauge sample.
    pub fn add_gauge(&mut self, label_values: Vec<String>, value: f64) {
        self.samples.push(Sample::Gauge {
            label_values,
            value,
        });
    }

    /// Append an info sample.
    pub fn add_info(&mut self, label_values: Vec<String>, fields: Vec<(&'static str, String)>) {
        self.samples.push(Sample::Info {
            label_values,
            fields,
        });
    }
}

/// Render families in the Prometheus text exposition format.
///
/// Family and sample order is preserved exactly as compiled; scrapers
/// treat series as a set but test fixtures diff on ordering. Info samples
/// are emitted under the conventional `_info` suffix with value 1.
pub fn render_families(families: &[MetricFamily]) -> String {
    let mut out = String::new();

    for family in families {
        writeln!(out, "# HELP {} {}", family.name, family.documentation).ok();
        writeln!(out, "# TYPE {} {}", family.name, family.kind.as_str()).ok();

        for sample in &family.samples {
            match sample {
                Sample::Gauge {
                    label_values,
                    value,
                } => {
                    writeln!(
                        out,
                        "{}{} {}",
                        family.name,
                        format_labels(&family.labels, label_values, &[]),
                        format_value(*value)
                    )
                    .ok();
                }
                Sample::Info {
                    label_values,
                    fields,
                } => {
                    writeln!(
                        out,
                        "{}_info{} 1",
                        family.name,
                        format_labels(&family.labels, label_values, fields)
                    )
                    .ok();
                }
            }
        }
    }

    out
}

/// Format a label set, appending any info fields after the schema labels.
fn format_labels(names: &[&'static str], values: &[String], fields: &[(&'static str, String)]) -> String {
    if names.is_empty() && fields.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .chain(
            fields
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v))),
        )
        .collect();

    format!("{{{}}}", parts.join(","))
}

/// Escape special characters in label values.
fn escape_label_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

/// Format a floating point value for Prometheus.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}
