use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A remote knowledge graph reachable through a SPARQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub id: String,
    pub url: String,
    pub domain: String,
    pub description: String,
}

impl EndpointDescriptor {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        domain: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            domain: domain.into(),
            description: description.into(),
        }
    }
}

/// SPARQL 1.1 query results in the JSON format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: ResultHead,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultSet>,
}

impl SparqlResults {
    /// Rows of the result, empty when the payload carries none.
    pub fn bindings(&self) -> &[Binding] {
        self.results
            .as_ref()
            .map(|r| r.bindings.as_slice())
            .unwrap_or(&[])
    }

    pub fn vars(&self) -> &[String] {
        &self.head.vars
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// One result row. Variables left unbound by the query are simply absent.
pub type Binding = HashMap<String, RdfTerm>;

/// A bound value: IRI, literal or blank node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdfTerm {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub value: String,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

/// What a successful remote call hands back: the response body exactly as
/// received and its typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub raw: String,
    pub results: SparqlResults,
}

impl QueryOutcome {
    /// Parse a response body. Fails on anything that is not JSON shaped like
    /// a SPARQL result document.
    pub fn from_body(body: impl Into<String>) -> Result<Self, serde_json::Error> {
        let raw = body.into();
        let results = serde_json::from_str(&raw)?;
        Ok(Self { raw, results })
    }
}
