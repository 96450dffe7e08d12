use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "server": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 0, "maximum": 65535 },
                    "static_dir": { "type": ["string", "null"] },
                    "cors_origins": { "type": "array", "items": { "type": "string" } }
                }
            },
            "database": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "path": { "type": "string", "minLength": 1 },
                    "seed_sample": { "type": "boolean" }
                }
            },
            "llm": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "provider": { "type": "string", "enum": ["openai", "anthropic", "local"] },
                    "model": { "type": ["string", "null"] },
                    "api_key": { "type": ["string", "null"] },
                    "base_url": { "type": ["string", "null"] },
                    "max_tokens": { "type": "integer", "minimum": 1 }
                }
            },
            "analysis": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "max_upload_bytes": { "type": "integer", "minimum": 1, "maximum": 10485760 },
                    "lifestyle_guidance": { "type": "string" }
                }
            }
        }
    })
});
