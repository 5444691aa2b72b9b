// Helper functions for creating tool input schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

/// Schema for tools that take a single required SPARQL `query`.
pub fn query_input_schema() -> serde_json::Value {
    json_schema_object(
        serde_json::json!({
            "query": json_schema_string("SPARQL query to execute")
        }),
        vec!["query"],
    )
}

/// Schema for tools without arguments.
pub fn empty_input_schema() -> serde_json::Value {
    json_schema_object(serde_json::json!({}), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_schema_requires_query() {
        let schema = query_input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["required"], serde_json::json!(["query"]));
    }

    #[test]
    fn test_empty_schema() {
        let schema = empty_input_schema();
        assert_eq!(schema["properties"], serde_json::json!({}));
        assert_eq!(schema["required"], serde_json::json!([]));
    }
}
