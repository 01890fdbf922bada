//! Free-text parser for `skupper link status` output.
//!
//! The CLI prints a report like:
//!
//! ```text
//! Links created from this site:
//! -------------------------------
//! Link site-01 is active
//! Link site-02 is not active
//!
//! Currently active links from other sites:
//! ----------------------------------------
//! There are no active links
//! ```
//!
//! Only the first section is read: parsing stops at the first empty line
//! or at the no-links sentinel, so inbound links reported by other sites
//! are never consulted. Only outbound, self-created links are modeled.

/// A link from this site to a peer, as reported by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub name: String,
    pub active: bool,
}

const SECTION_HEADER: &str = "Links created from this site";
const NO_LINKS_SENTINEL: &str = "There are no links configured or active";

enum State {
    Seeking,
    Collecting,
}

/// Parse the link-status report into ordered link records.
///
/// Total over all inputs: unparseable text yields an empty vector, never
/// an error. Formatting drift in the CLI output degrades to fewer records
/// rather than failing the scrape.
pub fn parse_link_status(raw: &str) -> Vec<LinkRecord> {
    let mut records = Vec::new();
    let mut state = State::Seeking;

    for line in raw.lines() {
        // Separator decoration surrounds section headers.
        if line.starts_with("---") {
            continue;
        }

        match state {
            State::Seeking => {
                if line.starts_with(SECTION_HEADER) {
                    state = State::Collecting;
                }
            }
            State::Collecting => {
                if line.starts_with(NO_LINKS_SENTINEL) {
                    break;
                }
                if line.trim().is_empty() {
                    break;
                }
                // "Link <name> is [not] active": the name is the token
                // after the leading "Link". Note "is active" is not a
                // substring of "is not active", so a plain substring test
                // is sufficient.
                if let Some(name) = line.split_whitespace().nth(1) {
                    records.push(LinkRecord {
                        name: name.to_string(),
                        active: line.contains("is active"),
                    });
                }
            }
        }
    }

    records
}
