//! Global hook tests
//!
//! Hooks are process-wide, so this file holds a single test.

use envstruct::{EnvParser, EnvStruct};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default, EnvStruct)]
struct Inner {
    #[env(name = "HOOK_DEPTH")]
    depth: u8,
}

#[derive(Debug, Default, EnvStruct)]
struct Outer {
    #[env(name = "HOOK_NAME")]
    name: String,

    #[env(name = "HOOK_BAD")]
    bad: u8,

    #[env(name = "HOOK_UNSET")]
    unset: String,

    #[env(nested)]
    inner: Inner,
}

#[test]
fn test_hooks_fire_once_per_set_field() {
    let seen: Arc<Mutex<Vec<(String, String)>>> = Arc::default();
    let lines: Arc<Mutex<Vec<String>>> = Arc::default();

    let seen_hook = Arc::clone(&seen);
    envstruct::set_on_var_set(Some(Arc::new(move |meta: &envstruct::FieldMeta, value: &str| {
        seen_hook.lock().push((meta.env.to_string(), value.to_string()));
    })));
    let lines_sink = Arc::clone(&lines);
    envstruct::enable_debug_logging(Some(Arc::new(move |line: &str| {
        lines_sink.lock().push(line.to_string());
    })));

    let source: HashMap<String, String> = [
        ("T_HOOK_NAME", "svc"),
        ("T_HOOK_BAD", "-1"),
        ("T_HOOK_DEPTH", "3"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut outer = Outer::default();
    let result = EnvParser::new()
        .with_prefix("T_")
        .with_source(source)
        .parse(&mut outer);

    envstruct::set_on_var_set(None);
    envstruct::enable_debug_logging(None);

    assert_eq!(result.unwrap_err().field_errors().len(), 1);
    assert_eq!(outer.inner.depth, 3);

    assert_eq!(
        *seen.lock(),
        vec![
            ("HOOK_NAME".to_string(), "svc".to_string()),
            ("HOOK_DEPTH".to_string(), "3".to_string()),
        ]
    );
    assert_eq!(
        *lines.lock(),
        vec![
            "env: T_HOOK_NAME = svc (field: Outer.name)".to_string(),
            "env: T_HOOK_DEPTH = 3 (field: Inner.inner.depth)".to_string(),
        ]
    );
}
