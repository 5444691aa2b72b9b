pub mod catalog;
pub mod schema;

pub use catalog::{
    build_catalog, identifier_for, tool_name_for, ToolTarget, LIST_KNOWLEDGE_GRAPHS,
    QUERY_FEDERATED, QUERY_TOOL_PREFIX,
};
pub use schema::{json_schema_object, json_schema_string, query_input_schema};
