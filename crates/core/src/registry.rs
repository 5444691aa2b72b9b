// Endpoint registry: the fixed set of knowledge graphs the bridge can query

use crate::error::{BridgeError, BridgeResult};
use crate::types::EndpointDescriptor;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Identifier reserved because `query_federated` is a fixed tool name.
pub const RESERVED_IDENTIFIER: &str = "federated";

/// Default endpoint used by `query_federated`.
pub const DEFAULT_FEDERATED_URL: &str = "https://qlever.cs.uni-freiburg.de/api/wikidata";

// (id, url, domain, description)
const KNOWN_ENDPOINTS: &[(&str, &str, &str, &str)] = &[
    (
        "wikidata",
        "https://query.wikidata.org/sparql",
        "General knowledge",
        "Collaborative knowledge base covering people, places, organizations, works and scientific entities",
    ),
    (
        "dbpedia",
        "https://dbpedia.org/sparql",
        "General knowledge",
        "Structured content extracted from Wikipedia infoboxes and categories",
    ),
    (
        "uniprot",
        "https://sparql.uniprot.org/sparql",
        "Life sciences",
        "Protein sequences, functional annotation and cross-references",
    ),
    (
        "rhea",
        "https://sparql.rhea-db.org/sparql",
        "Life sciences",
        "Expert-curated biochemical reactions linked to ChEBI compounds",
    ),
    (
        "wikipathways",
        "https://sparql.wikipathways.org/sparql",
        "Life sciences",
        "Community-curated biological pathways",
    ),
    (
        "bgee",
        "https://www.bgee.org/sparql/",
        "Life sciences",
        "Gene expression patterns across animal species",
    ),
    (
        "dblp",
        "https://sparql.dblp.org/sparql",
        "Scholarly publishing",
        "Computer science bibliography: publications, authors and venues",
    ),
    (
        "osm-planet",
        "https://qlever.cs.uni-freiburg.de/api/osm-planet",
        "Geography",
        "OpenStreetMap planet data with geometries and tags",
    ),
    (
        "pubchem",
        "https://qlever.cs.uni-freiburg.de/api/pubchem",
        "Chemistry",
        "Chemical compounds, substances and bioassays",
    ),
    (
        "yago-4",
        "https://qlever.cs.uni-freiburg.de/api/yago-4",
        "General knowledge",
        "Schema.org-aligned knowledge base derived from Wikidata",
    ),
    (
        "linked-geo-data",
        "https://linkedgeodata.org/sparql",
        "Geography",
        "Spatial knowledge base derived from OpenStreetMap",
    ),
];

/// The built-in endpoint list, in catalog order.
pub fn default_endpoints() -> Vec<EndpointDescriptor> {
    KNOWN_ENDPOINTS
        .iter()
        .map(|(id, url, domain, description)| {
            EndpointDescriptor::new(*id, *url, *domain, *description)
        })
        .collect()
}

/// Immutable lookup table of endpoints plus the federated endpoint URL.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// mutate it afterwards.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    entries: Vec<EndpointDescriptor>,
    index: HashMap<String, usize>,
    federated_url: String,
}

impl EndpointRegistry {
    /// Validate and index the given endpoints. Definition order is kept.
    pub fn new(
        entries: Vec<EndpointDescriptor>,
        federated_url: impl Into<String>,
    ) -> BridgeResult<Self> {
        let federated_url = federated_url.into();
        validate_url("federated endpoint", &federated_url)?;

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            validate_entry(entry)?;
            if index.insert(entry.id.clone(), position).is_some() {
                return Err(BridgeError::Config(format!(
                    "duplicate endpoint identifier: {}",
                    entry.id
                )));
            }
        }

        debug!(endpoints = entries.len(), "Endpoint registry built");

        Ok(Self {
            entries,
            index,
            federated_url,
        })
    }

    /// Registry with the built-in endpoints and federated URL.
    pub fn with_defaults() -> BridgeResult<Self> {
        Self::new(default_endpoints(), DEFAULT_FEDERATED_URL)
    }

    pub fn get(&self, id: &str) -> Option<&EndpointDescriptor> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[EndpointDescriptor] {
        &self.entries
    }

    pub fn federated_url(&self) -> &str {
        &self.federated_url
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Identifiers are `[a-z0-9-]`, starting with a letter. Keeping `_` out of
/// the charset makes the tool-name mapping reversible.
pub fn is_valid_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn validate_entry(entry: &EndpointDescriptor) -> BridgeResult<()> {
    if !is_valid_identifier(&entry.id) {
        return Err(BridgeError::Config(format!(
            "invalid endpoint identifier '{}': use lowercase letters, digits and '-', starting with a letter",
            entry.id
        )));
    }
    if entry.id == RESERVED_IDENTIFIER {
        return Err(BridgeError::Config(format!(
            "endpoint identifier '{}' is reserved",
            entry.id
        )));
    }
    if entry.domain.trim().is_empty() {
        return Err(BridgeError::Config(format!(
            "endpoint '{}' has an empty domain",
            entry.id
        )));
    }
    if entry.description.trim().is_empty() {
        return Err(BridgeError::Config(format!(
            "endpoint '{}' has an empty description",
            entry.id
        )));
    }
    validate_url(&entry.id, &entry.url)
}

fn validate_url(owner: &str, raw: &str) -> BridgeResult<()> {
    let url = Url::parse(raw)
        .map_err(|e| BridgeError::Config(format!("{}: invalid URL '{}': {}", owner, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BridgeError::Config(format!(
            "{}: unsupported URL scheme '{}'",
            owner, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> EndpointDescriptor {
        EndpointDescriptor::new(id, "https://example.org/sparql", "Test", "Test graph")
    }

    #[test]
    fn test_default_registry_is_valid() {
        let registry = EndpointRegistry::with_defaults().unwrap();
        assert_eq!(registry.len(), KNOWN_ENDPOINTS.len());
        assert_eq!(registry.federated_url(), DEFAULT_FEDERATED_URL);
        assert!(registry.get("wikidata").is_some());
    }

    #[test]
    fn test_default_entries_have_metadata() {
        for entry in default_endpoints() {
            assert!(!entry.url.is_empty(), "{} has no url", entry.id);
            assert!(!entry.domain.is_empty(), "{} has no domain", entry.id);
            assert!(!entry.description.is_empty(), "{} has no description", entry.id);
        }
    }

    #[test]
    fn test_iteration_keeps_definition_order() {
        let registry = EndpointRegistry::new(
            vec![entry("zeta"), entry("alpha"), entry("mid-1")],
            "https://example.org/federated",
        )
        .unwrap();

        let ids: Vec<&str> = registry.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid-1"]);
    }

    #[test]
    fn test_point_lookup() {
        let registry =
            EndpointRegistry::new(vec![entry("osm-planet")], "https://example.org/f").unwrap();

        assert_eq!(registry.get("osm-planet").unwrap().id, "osm-planet");
        assert!(registry.get("osm_planet").is_none());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_rejects_duplicate_identifier() {
        let err = EndpointRegistry::new(vec![entry("dup"), entry("dup")], "https://example.org/f")
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_separator_in_identifier() {
        let err = EndpointRegistry::new(vec![entry("osm_planet")], "https://example.org/f")
            .unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_rejects_reserved_identifier() {
        let err = EndpointRegistry::new(vec![entry("federated")], "https://example.org/f")
            .unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_rejects_bad_urls() {
        let mut bad = entry("ftp-graph");
        bad.url = "ftp://example.org/sparql".to_string();
        assert!(EndpointRegistry::new(vec![bad], "https://example.org/f").is_err());

        assert!(EndpointRegistry::new(vec![entry("ok")], "not a url").is_err());
    }

    #[test]
    fn test_identifier_charset() {
        assert!(is_valid_identifier("wikidata"));
        assert!(is_valid_identifier("yago-4"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("4store"));
        assert!(!is_valid_identifier("Wikidata"));
        assert!(!is_valid_identifier("with_underscore"));
        assert!(!is_valid_identifier("with space"));
    }
}
