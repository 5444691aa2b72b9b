// Tool catalog: derives the tool list from the endpoint registry and maps tool
// names back to registry identifiers

use crate::protocol::ToolSchema;
use crate::tools::schema::{empty_input_schema, query_input_schema};
use kgbridge_core::{EndpointDescriptor, EndpointRegistry};

pub const LIST_KNOWLEDGE_GRAPHS: &str = "list_knowledge_graphs";
pub const QUERY_FEDERATED: &str = "query_federated";

/// Prefix of every per-endpoint tool name.
pub const QUERY_TOOL_PREFIX: &str = "query_";

/// What a tool name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolTarget {
    ListKnowledgeGraphs,
    Federated,
    /// A per-endpoint tool; carries the recovered registry identifier, which
    /// may or may not exist in the registry.
    Endpoint(String),
    Unknown,
}

impl ToolTarget {
    /// Resolve a tool name. Fixed names win over the generated pattern.
    pub fn resolve(tool_name: &str) -> Self {
        match tool_name {
            LIST_KNOWLEDGE_GRAPHS => Self::ListKnowledgeGraphs,
            QUERY_FEDERATED => Self::Federated,
            name => match identifier_for(name) {
                Some(id) => Self::Endpoint(id),
                None => Self::Unknown,
            },
        }
    }
}

/// `query_` + identifier with `-` replaced by `_`.
pub fn tool_name_for(identifier: &str) -> String {
    format!("{}{}", QUERY_TOOL_PREFIX, identifier.replace('-', "_"))
}

/// Inverse of [`tool_name_for`]. `None` when the name is not a generated
/// tool name.
pub fn identifier_for(tool_name: &str) -> Option<String> {
    tool_name
        .strip_prefix(QUERY_TOOL_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(|rest| rest.replace('_', "-"))
}

/// Build the full catalog: the two fixed tools, then one tool per endpoint in
/// registry order.
pub fn build_catalog(registry: &EndpointRegistry) -> Vec<ToolSchema> {
    let mut tools = Vec::with_capacity(registry.len() + 2);

    tools.push(ToolSchema {
        name: LIST_KNOWLEDGE_GRAPHS.to_string(),
        description: format!(
            "List the {} available knowledge graphs with their SPARQL endpoint, domain and description",
            registry.len()
        ),
        input_schema: empty_input_schema(),
    });

    tools.push(ToolSchema {
        name: QUERY_FEDERATED.to_string(),
        description: format!(
            "Run a SPARQL query against the federated endpoint ({}), which can reach across the available knowledge graphs",
            registry.federated_url()
        ),
        input_schema: query_input_schema(),
    });

    tools.extend(registry.iter().map(endpoint_tool));
    tools
}

fn endpoint_tool(entry: &EndpointDescriptor) -> ToolSchema {
    ToolSchema {
        name: tool_name_for(&entry.id),
        description: format!(
            "Run a SPARQL query against {} ({}): {}",
            entry.id, entry.domain, entry.description
        ),
        input_schema: query_input_schema(),
    }
}
