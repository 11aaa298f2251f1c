//! Response schemas sent with the structured calls.
//!
//! The service is asked, not forced, to follow these; the interpreter is what
//! actually enforces the shape.

use serde_json::{json, Value};

pub fn analysis() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "detected_objects": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "icon": { "type": "STRING" }
                    },
                    "required": ["name", "icon"]
                }
            },
            "color_palette": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["title", "summary", "detected_objects", "color_palette"]
    })
}

pub fn suggestions() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["suggestions"]
    })
}
