use serde_json::{json, Value};
use std::sync::LazyLock;

pub static TOPOLOGY_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "hosts": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "label": { "type": "string" },
                        "zone": { "type": "string" },
                        "ip": { "type": "string" },
                        "os": { "type": "string" }
                    }
                }
            },
            "vulnerabilities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "affected_host"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "label": { "type": "string" },
                        "cvss": { "type": "number", "minimum": 0.0, "maximum": 10.0 },
                        "cvss_vector": { "type": "string" },
                        "affected_host": { "type": "string" }
                    }
                }
            },
            "privileges": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "host", "level"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "label": { "type": "string" },
                        "host": { "type": "string" },
                        "level": { "type": "string" }
                    }
                }
            },
            "services": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "host", "port"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "label": { "type": "string" },
                        "host": { "type": "string" },
                        "port": { "type": "integer", "minimum": 0, "maximum": 65535 }
                    }
                }
            },
            "exploits": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "vulnerability", "precondition", "postcondition"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "label": { "type": "string" },
                        "vulnerability": { "type": "string" },
                        "precondition": { "type": "string" },
                        "postcondition": { "type": "string" }
                    }
                }
            },
            "network_edges": { "type": "array", "items": { "$ref": "#/$defs/edge" } },
            "edges": { "type": "array", "items": { "$ref": "#/$defs/edge" } }
        },
        "$defs": {
            "edge": {
                "type": "object",
                "required": ["from", "to"],
                "properties": {
                    "from": { "type": "string" },
                    "to": { "type": "string" },
                    "label": { "type": "string" }
                }
            }
        }
    })
});
