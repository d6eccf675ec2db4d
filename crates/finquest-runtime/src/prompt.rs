//! System prompt construction
//!
//! Renders the tool catalog into the fixed reasoning instructions. The
//! catalog is built once per session from the registry's descriptors and is
//! read-only thereafter.

use finquest_tools::ToolDescriptor;

/// Build the session system prompt from the registered tool descriptors
pub fn build_system_prompt(descriptors: &[ToolDescriptor]) -> String {
    let mut catalog = String::new();
    for descriptor in descriptors {
        catalog.push_str(&format!(
            "{}: {}\n    args schema: {}\n\n",
            descriptor.name, descriptor.description, descriptor.input_schema
        ));
    }

    let action_names = descriptors
        .iter()
        .map(|d| d.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Answer the following questions as best you can. You have access to the following tools:

{catalog}The way you use the tools is by specifying a json blob.
Specifically, this json should have an `action` key (with the name of the tool to use) and an `action_input` key (with the input to the tool going here).

The only values that should be in the "action" field are: {action_names}

Example use:

```json
{{
  "action": "get_stock_price",
  "action_input": {{
    "ticker": "NVDA"
  }}
}}
```

ALWAYS use the following format:

Thought: you should always think about one action to take. Only one action at a time in this format:
Action:

```json
$JSON_BLOB
```

Observation: the result of the action. This Observation is unique, complete, and the source of truth.
... (this Thought/Action/Observation can repeat N times, you should take several steps when needed. The $JSON_BLOB must be formatted as markdown and only use a SINGLE action at a time.)

You must always end your output with the following format:

Thought: I now know the final answer
Final Answer: the final answer to the original input question

Now begin! Reminder to ALWAYS use the exact characters `Final Answer:` when you provide a definitive answer."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            description: format!("{name} does things"),
            input_schema: json!({"type": "object", "properties": {"ticker": {"type": "string"}}}),
        }
    }

    #[test]
    fn test_catalog_lists_every_tool() {
        let descriptors = vec![descriptor("get_stock_price"), descriptor("get_order_book")];
        let prompt = build_system_prompt(&descriptors);

        assert!(prompt.contains("get_stock_price: get_stock_price does things"));
        assert!(prompt.contains("get_order_book: get_order_book does things"));
        assert!(prompt.contains("get_stock_price, get_order_book"));
    }

    #[test]
    fn test_format_instructions_present() {
        let prompt = build_system_prompt(&[descriptor("get_stock_price")]);

        assert!(prompt.contains("`action` key"));
        assert!(prompt.contains("`action_input` key"));
        assert!(prompt.contains("Final Answer:"));
        assert!(prompt.contains("Thought:"));
    }

    #[test]
    fn test_schema_rendered_into_catalog() {
        let prompt = build_system_prompt(&[descriptor("get_stock_price")]);
        assert!(prompt.contains("args schema:"));
        assert!(prompt.contains("\"ticker\""));
    }
}
