//! Shared fixtures for unit tests.

use reflectory_types::CodebaseSnapshot;
use serde_json::json;

use crate::{Codebase, Introspector};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn codebase() -> Codebase {
    init_logging();
    let snapshot: CodebaseSnapshot = serde_json::from_value(fixture()).unwrap();
    Codebase::from_snapshot(snapshot).unwrap()
}

pub(crate) fn introspector() -> Introspector {
    Introspector::new(codebase())
}

fn named(name: &str) -> serde_json::Value {
    json!({ "kind": "named", "name": name })
}

fn fixture() -> serde_json::Value {
    json!({
        "classes": [
            {
                "name": "App\\ServiceInterface",
                "kind": "interface",
                "methods": [{ "name": "run", "return_type": named("void") }]
            },
            { "name": "App\\OtherInterface", "kind": "interface" },
            {
                "name": "App\\ExtendedInterface",
                "kind": "interface",
                "interfaces": ["App\\ServiceInterface"]
            },
            { "name": "App\\Marker", "kind": "interface" },
            {
                "name": "App\\LoggerTrait",
                "kind": "trait",
                "methods": [{
                    "name": "log",
                    "parameters": [{ "name": "message", "ty": named("string") }],
                    "return_type": named("void")
                }]
            },
            { "name": "App\\Attr\\Marker", "kind": "interface" },
            { "name": "App\\Attr\\Service", "interfaces": ["App\\Attr\\Marker"] },
            { "name": "App\\Attr\\Tag" },
            {
                "name": "App\\Base",
                "interfaces": ["App\\ServiceInterface"],
                "traits": ["App\\LoggerTrait"],
                "attributes": [
                    { "name": "App\\Attr\\Service", "arguments": { "id": "base", "shared": true } },
                    { "name": "App\\Attr\\Tag", "arguments": { "id": "tagged" } }
                ],
                "properties": [
                    { "name": "name", "is_readonly": true, "ty": named("string") },
                    { "name": "registry", "visibility": "protected", "is_static": true },
                    { "name": "token", "visibility": "private" }
                ],
                "methods": [
                    {
                        "name": "__construct",
                        "parameters": [
                            { "name": "name", "ty": named("string") },
                            {
                                "name": "parent",
                                "ty": { "kind": "named", "name": "self", "nullable": true },
                                "is_optional": true
                            }
                        ]
                    },
                    {
                        "name": "make",
                        "is_static": true,
                        "return_type": named("static"),
                        "attributes": [{ "name": "App\\Attr\\Service", "arguments": { "id": "make" } }]
                    },
                    { "name": "selfMake", "is_static": true, "return_type": named("self") },
                    {
                        "name": "create",
                        "is_static": true,
                        "return_type": named("static"),
                        "parameters": [
                            {
                                "name": "template",
                                "ty": named("static"),
                                "attributes": [{ "name": "App\\Attr\\Tag", "arguments": { "id": "param" } }]
                            },
                            { "name": "sibling", "ty": named("self"), "is_optional": true },
                            { "name": "dependency", "ty": named("App\\Dependency") }
                        ]
                    },
                    { "name": "run", "return_type": named("void") },
                    {
                        "name": "secret",
                        "visibility": "private",
                        "is_static": true,
                        "return_type": named("string")
                    },
                    {
                        "name": "internal",
                        "visibility": "protected",
                        "return_type": {
                            "kind": "union",
                            "types": [named("App\\Dependency"), named("null")]
                        }
                    },
                    {
                        "name": "both",
                        "return_type": {
                            "kind": "union",
                            "types": [named("App\\Dependency"), named("App\\OtherInterface")]
                        }
                    },
                    { "name": "missing", "return_type": named("App\\Nowhere") },
                    { "name": "__destruct" }
                ]
            },
            {
                "name": "App\\Derived",
                "parent": "App\\Base",
                "properties": [{ "name": "label" }],
                "methods": [
                    { "name": "extra", "is_final": true, "return_type": named("App\\Dependency") }
                ]
            },
            { "name": "App\\Leaf", "parent": "App\\Derived" },
            {
                "name": "App\\ClockTrait",
                "kind": "trait",
                "methods": [
                    { "name": "now", "is_abstract": true, "return_type": named("string") },
                    { "name": "tick" }
                ]
            },
            { "name": "App\\Clock", "methods": [{ "name": "now", "return_type": named("string") }] },
            { "name": "App\\SystemClock", "parent": "App\\Clock", "traits": ["App\\ClockTrait"] },
            { "name": "App\\StandaloneClock", "is_abstract": true, "traits": ["App\\ClockTrait"] },
            {
                "name": "App\\AbstractWorker",
                "is_abstract": true,
                "interfaces": ["App\\ServiceInterface"],
                "methods": [{ "name": "work", "is_abstract": true }]
            },
            { "name": "App\\Dependency" },
            {
                "name": "App\\Multi",
                "interfaces": ["App\\ServiceInterface", "App\\OtherInterface"],
                "methods": [{ "name": "run" }]
            },
            { "name": "App\\ExtendedService", "interfaces": ["App\\ExtendedInterface"], "methods": [{ "name": "run" }] },
            {
                "name": "App\\Statics",
                "methods": [
                    { "name": "f", "is_static": true },
                    { "name": "g", "is_static": true, "visibility": "private" },
                    { "name": "h" }
                ]
            },
            {
                "name": "App\\PrivateCtor",
                "methods": [{ "name": "__construct", "visibility": "private" }]
            },
            { "name": "App\\Broken", "parent": "App\\Missing" },
            { "name": "App\\BrokenChild", "parent": "App\\Broken" },
            { "name": "App\\BrokenImpl", "interfaces": ["App\\MissingInterface"] },
            { "name": "App\\ImplementsClass", "interfaces": ["App\\Dependency"] },
            { "name": "App\\LoopA", "parent": "App\\LoopB" },
            { "name": "App\\LoopB", "parent": "App\\LoopA" },
            { "name": "App\\Broken\\Factory", "methods": [{ "name": "broken", "return_type": named("App\\Broken") }] }
        ],
        "functions": [
            {
                "name": "build_service",
                "return_type": named("App\\Base"),
                "parameters": [
                    { "name": "dependency", "ty": named("App\\Dependency") },
                    { "name": "count", "ty": named("int"), "is_optional": true }
                ]
            },
            {
                "name": "confused",
                "parameters": [{ "name": "me", "ty": named("self") }]
            }
        ]
    })
}
