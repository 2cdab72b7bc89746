//! MCP tool definitions.

use serde_json::json;

use super::protocol::{InputSchema, ToolDefinition};

/// Generate all tool definitions
pub fn all_tools() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(read_tools());
    tools.extend(write_tools());
    tools
}

// ============================================================================
// Read Tools (5)
// ============================================================================

fn read_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "list_categories".to_string(),
            description: "List all note categories with counts and last activity date. \
                Use this to understand what topics are available in the scratchpad."
                .to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({})),
                required: None,
            },
        },
        ToolDefinition {
            name: "get_notes".to_string(),
            description: "Get notes from a specific category, ordered by newest first. \
                Use this to retrieve all notes in a topic."
                .to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "category": {"type": "string", "description": "Category name (e.g., 'twitter-analytics', 'content-ideas')"},
                    "limit": {"type": "integer", "description": "Maximum number of notes to return (default: 50, max: 200)"},
                    "offset": {"type": "integer", "description": "Number of notes to skip for pagination (default: 0)"}
                })),
                required: Some(vec!["category".to_string()]),
            },
        },
        ToolDefinition {
            name: "search_notes".to_string(),
            description: "Full-text search across notes with optional category and date filtering. \
                Supports quoted phrases and -term exclusion."
                .to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "query": {"type": "string", "description": "Search query matched against note content"},
                    "category": {"type": "string", "description": "Only search within this category"},
                    "since": {"type": "string", "description": "Only notes created at or after this date (YYYY-MM-DD or RFC 3339)"},
                    "until": {"type": "string", "description": "Only notes created at or before this date (YYYY-MM-DD or RFC 3339)"},
                    "limit": {"type": "integer", "description": "Maximum number of notes to return (default: 50, max: 200)"}
                })),
                required: Some(vec!["query".to_string()]),
            },
        },
        ToolDefinition {
            name: "get_recent_notes".to_string(),
            description: "Get the most recent notes across all categories. \
                Use this to see what's new or to get an overview of recent activity."
                .to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "limit": {"type": "integer", "description": "Maximum number of notes to return (default: 20, max: 100)"},
                    "since": {"type": "string", "description": "Only notes created at or after this date (YYYY-MM-DD or RFC 3339)"}
                })),
                required: None,
            },
        },
        ToolDefinition {
            name: "get_note".to_string(),
            description: "Get a specific note by its ID.".to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "id": {"type": "string", "description": "The note ID (UUID)"}
                })),
                required: Some(vec!["id".to_string()]),
            },
        },
    ]
}

// ============================================================================
// Write Tools (1)
// ============================================================================

fn write_tools() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: "create_note".to_string(),
        description: "Capture a markdown note in a category. \
            The category is normalized (lowercase, spaces become hyphens)."
            .to_string(),
        input_schema: InputSchema {
            schema_type: "object".to_string(),
            properties: Some(json!({
                "category": {"type": "string", "description": "Category name"},
                "content": {"type": "string", "description": "Markdown content"}
            })),
            required: Some(vec!["category".to_string(), "content".to_string()]),
        },
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_unique() {
        let tools = all_tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
        assert_eq!(tools.len(), 6);
    }

    #[test]
    fn test_required_fields_are_declared_properties() {
        for tool in all_tools() {
            let props = tool.input_schema.properties.clone().unwrap_or_default();
            for field in tool.input_schema.required.clone().unwrap_or_default() {
                assert!(
                    props.get(&field).is_some(),
                    "{} requires undeclared {}",
                    tool.name,
                    field
                );
            }
        }
    }
}
