//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Qi.
//! The Qi project belongs to the Dunimd Team.

use serde_json::json;

use qix::{QiPluginDetail, QiPluginRegistry};

#[test]
fn test_register_stores_detail_once() {
    let mut registry = QiPluginRegistry::new();

    let first = QiPluginDetail::new().default_options(json!({"color": "red"}));
    let second = QiPluginDetail::new().default_options(json!({"color": "green"}));

    assert!(registry.register("color.text", first));
    assert!(!registry.register("color.text", second));

    // The collision must not mutate the stored detail.
    let stored = registry.detail("color.text").unwrap();
    assert_eq!(stored.options.get("color"), Some(&json!("red")));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_re_register_always_replaces() {
    let mut registry = QiPluginRegistry::new();

    registry.register(
        "color.text",
        QiPluginDetail::new().default_options(json!({"color": "red"})),
    );
    registry.re_register(
        "color.text",
        QiPluginDetail::new().default_options(json!({"color": "green"})),
    );

    let stored = registry.detail("color.text").unwrap();
    assert_eq!(stored.options.get("color"), Some(&json!("green")));

    // Re-registering an absent name behaves like a plain insert.
    registry.re_register("color.background", QiPluginDetail::new());
    assert!(registry.is_registered("color.background"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_detail_defaults_are_filled() {
    let detail = QiPluginDetail::new();

    assert!(detail.options.is_empty());
    assert!(detail.selector.is_none());
    assert!(detail.except_selector.is_none());

    // The default handler is a no-op reporting success.
    let mut doc = qix::QiDocument::new();
    let scope = qix::QiScope::default();
    assert!((detail.handler)(&mut doc, &scope, &detail.options));

    // Default availability is a static true.
    assert!(detail
        .available
        .is_available(&doc, &scope, &detail.options));
}

#[test]
fn test_lookup_of_unknown_name() {
    let registry = QiPluginRegistry::new();

    assert!(!registry.is_registered("missing"));
    assert!(registry.detail("missing").is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_names_preserve_insertion_order() {
    let mut registry = QiPluginRegistry::new();

    registry.register("c", QiPluginDetail::new());
    registry.register("a", QiPluginDetail::new());
    registry.register("b", QiPluginDetail::new());

    assert_eq!(registry.names(), vec!["c", "a", "b"]);

    // Replacement is delete-then-insert, so the name moves to the end.
    registry.re_register("c", QiPluginDetail::new());
    assert_eq!(registry.names(), vec!["a", "b", "c"]);
}
