//! End-to-end generation runs against in-memory and on-disk sinks

use gqlsynth::ir::{FieldDescriptor, OperationDescriptor, OperationKind, TypeDescriptor};
use gqlsynth::{
    get_backend, ArtifactSink, FsSink, Generator, GeneratorError, GeneratorOptions, MemorySink,
    SchemaSnapshot,
};
use std::fs;

const BLOG_SNAPSHOT: &str = r#"{
    "types": [
        { "name": "Status", "kind": "enum", "enumValues": ["ACTIVE", "INACTIVE"] },
        {
            "name": "Post",
            "kind": "object",
            "fields": [
                { "name": "id", "typeRef": "ID!", "required": true },
                { "name": "status", "typeRef": "Status" }
            ]
        }
    ]
}"#;

fn run_memory(snapshot: &SchemaSnapshot, options: GeneratorOptions, language: &str) -> MemorySink {
    let backend = get_backend(language).unwrap();
    let mut sink = MemorySink::new();
    Generator::new(snapshot, options, backend.as_ref(), &mut sink)
        .run()
        .unwrap();
    sink
}

#[test]
fn test_enum_and_model_scenario() {
    let snapshot = SchemaSnapshot::from_json(BLOG_SNAPSHOT).unwrap();
    let sink = run_memory(&snapshot, GeneratorOptions::default(), "typescript");

    let enums = sink.get("types.enums.ts").unwrap();
    assert!(enums.contains("export enum Status"));
    assert!(enums.contains("ACTIVE = 'ACTIVE'"));
    assert!(enums.contains("INACTIVE = 'INACTIVE'"));

    let models = sink.get("types.models.ts").unwrap();
    assert!(models.contains("import { Status } from './types.index';"));
    assert!(models.contains("export interface Post"));
    assert!(models.contains("status?: Status;"));

    let inputs = sink.get("types.inputs.ts").unwrap();
    assert!(inputs.contains("No inputs types defined"));

    for absent in ["queries.ts", "mutations.ts", "subscriptions.ts"] {
        assert!(!sink.exists(absent), "{absent} should not be written");
    }

    let index = sink.get("types.index.ts").unwrap();
    assert!(index.contains("export * from './types.enums';"));
    assert!(index.contains("export * from './types.models';"));
    assert!(!index.contains("types.inputs"));
}

#[test]
fn test_runs_are_idempotent() {
    let snapshot = SchemaSnapshot::from_json(BLOG_SNAPSHOT).unwrap();
    let first = run_memory(&snapshot, GeneratorOptions::default(), "typescript");
    let second = run_memory(&snapshot, GeneratorOptions::default(), "typescript");
    assert_eq!(first.files(), second.files());
}

#[test]
fn test_fs_sink_rerun_replaces_stale_files() {
    let snapshot = SchemaSnapshot::from_json(BLOG_SNAPSHOT).unwrap();
    let backend = get_backend("typescript").unwrap();
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("stale.ts"), "old").unwrap();

    let mut sink = FsSink::new(tmp.path());
    let first = Generator::new(&snapshot, GeneratorOptions::default(), backend.as_ref(), &mut sink)
        .run()
        .unwrap();
    let before = fs::read_to_string(tmp.path().join("types.models.ts")).unwrap();

    let second = Generator::new(&snapshot, GeneratorOptions::default(), backend.as_ref(), &mut sink)
        .run()
        .unwrap();
    let after = fs::read_to_string(tmp.path().join("types.models.ts")).unwrap();

    assert_eq!(first, second);
    assert_eq!(before, after);
    assert!(!tmp.path().join("stale.ts").exists());
}

#[test]
fn test_large_namespaces_are_batched_behind_an_index() {
    let snapshot = SchemaSnapshot {
        types: (0..5)
            .map(|i| TypeDescriptor::object(format!("Model{i}"), vec![FieldDescriptor::new("id", "ID!")]))
            .collect(),
        queries: (0..3)
            .map(|i| OperationDescriptor::new(format!("model{i}"), OperationKind::Query, format!("Model{i}"), vec![]))
            .collect(),
        ..Default::default()
    };
    let options = GeneratorOptions {
        max_items_per_artifact: 2,
        ..Default::default()
    };
    let sink = run_memory(&snapshot, options, "typescript");

    for file in [
        "types.models.1.ts",
        "types.models.2.ts",
        "types.models.3.ts",
        "types.models.index.ts",
        "types.models.ts",
        "queries.1.ts",
        "queries.2.ts",
        "queries.index.ts",
        "queries.ts",
    ] {
        assert!(sink.exists(file), "missing {file}");
    }

    let index = sink.get("types.models.index.ts").unwrap();
    let positions: Vec<_> = ["./types.models.1", "./types.models.2", "./types.models.3"]
        .iter()
        .map(|m| index.find(m).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(sink
        .get("types.models.ts")
        .unwrap()
        .contains("export * from './types.models.index';"));

    let client = sink.get("client.ts").unwrap();
    assert!(client.contains("QueryClient1"));
    assert!(client.contains("QueryClient2"));
}

#[test]
fn test_rust_backend_writes_module_tree() {
    let mut snapshot = SchemaSnapshot::from_json(BLOG_SNAPSHOT).unwrap();
    snapshot.queries.push(OperationDescriptor::new(
        "post",
        OperationKind::Query,
        "Post",
        vec![FieldDescriptor::new("id", "ID!")],
    ));
    let sink = run_memory(&snapshot, GeneratorOptions::default(), "rust");

    for file in [
        "types_enums.rs",
        "types_models.rs",
        "types_inputs.rs",
        "types_index.rs",
        "fragments.rs",
        "queries.rs",
        "utils.rs",
        "client.rs",
        "mod.rs",
    ] {
        assert!(sink.exists(file), "missing {file}");
    }

    let manifest = sink.get("mod.rs").unwrap();
    assert!(manifest.contains("pub mod queries;"));
    assert!(!manifest.contains("pub mod mutations;"));

    let queries = sink.get("queries.rs").unwrap();
    assert!(queries.contains("pub struct QueryClient"));
    assert!(queries.contains("query post($id: ID!)"));
}

#[test]
fn test_invalid_snapshot_is_a_schema_error() {
    assert!(matches!(
        SchemaSnapshot::from_json("{ \"types\": 3 }"),
        Err(GeneratorError::Schema(_))
    ));
}

#[test]
fn test_unwritable_output_fails_in_clear_stage() {
    let snapshot = SchemaSnapshot::default();
    let backend = get_backend("typescript").unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("file");
    fs::write(&blocker, "not a directory").unwrap();

    let mut sink = FsSink::new(blocker.join("out"));
    let err = Generator::new(&snapshot, GeneratorOptions::default(), backend.as_ref(), &mut sink)
        .run()
        .unwrap_err();
    match err {
        GeneratorError::Stage { stage, source } => {
            assert_eq!(stage, "clear");
            assert!(matches!(*source, GeneratorError::Io { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_without_type_index_imports_come_from_declaring_artifacts() {
    let mut snapshot = SchemaSnapshot::from_json(BLOG_SNAPSHOT).unwrap();
    snapshot.scalars.push("DateTime".to_string());
    snapshot.types[1]
        .fields
        .push(FieldDescriptor::new("publishedAt", "DateTime"));
    snapshot.queries.push(OperationDescriptor::new(
        "post",
        OperationKind::Query,
        "Post",
        vec![FieldDescriptor::new("status", "Status!")],
    ));
    let options = GeneratorOptions {
        generate_index_file: false,
        ..Default::default()
    };

    let sink = run_memory(&snapshot, options.clone(), "typescript");
    assert!(!sink.exists("types.index.ts"));
    for (file, content) in sink.files() {
        assert!(!content.contains("types.index"), "{file} references the type index");
    }
    let models = sink.get("types.models.ts").unwrap();
    assert!(models.contains("import { Status } from './types.enums';"));
    assert!(models.contains("publishedAt?: string;"));
    let queries = sink.get("queries.ts").unwrap();
    assert!(queries.contains("import { Status } from './types.enums';"));
    assert!(queries.contains("import { Post } from './types.models';"));

    let sink = run_memory(&snapshot, options, "rust");
    assert!(!sink.exists("types_index.rs"));
    assert!(!sink.get("mod.rs").unwrap().contains("types_index"));
    for (file, content) in sink.files() {
        assert!(!content.contains("types_index"), "{file} references the type index");
    }
    let models = sink.get("types_models.rs").unwrap();
    assert!(
        models.contains("use super::types_enums::{Status};")
            || models.contains("use super::types_enums::Status;")
    );
    assert!(models.contains("Option<String>"));
}

#[test]
fn test_javascript_backend_writes_es_modules() {
    let mut snapshot = SchemaSnapshot::from_json(BLOG_SNAPSHOT).unwrap();
    snapshot.queries.push(OperationDescriptor::new(
        "post",
        OperationKind::Query,
        "Post",
        vec![FieldDescriptor::new("id", "ID!")],
    ));
    let sink = run_memory(&snapshot, GeneratorOptions::default(), "javascript");

    assert!(sink.files().keys().all(|file| file.ends_with(".js")));
    let enums = sink.get("types.enums.js").unwrap();
    assert!(enums.contains("export const Status = Object.freeze({"));

    let models = sink.get("types.models.js").unwrap();
    assert!(models.contains("/** @typedef {import('./types.index.js').Status} Status */"));
    assert!(models.contains(" * @typedef {Object} Post"));

    let index = sink.get("types.index.js").unwrap();
    assert!(index.contains("export * from './types.enums.js';"));

    let queries = sink.get("queries.js").unwrap();
    assert!(queries.contains("query post($id: ID!)"));
    assert!(queries.contains("import { withRetry, withTimeout } from './utils.js';"));

    let client = sink.get("client.js").unwrap();
    assert!(client.contains("from './queries.js';"));
    assert!(client.contains("QueryClient"));
}
