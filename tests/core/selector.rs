//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Qi.
//! The Qi project belongs to the Dunimd Team.

use qix::{QiDocument, QiSelector};

fn sample_document() -> (QiDocument, qix::QiElementId) {
    let mut doc = QiDocument::new();
    let root = doc.create_element("div");

    let intro = doc.create_child(root, "p");
    doc.element_mut(intro).unwrap().id = Some("intro".into());

    let note = doc.create_child(root, "p");
    doc.element_mut(note).unwrap().classes.push("note".into());

    let aside = doc.create_child(root, "aside");
    let nested = doc.create_child(aside, "p");
    doc.element_mut(nested).unwrap().classes.push("note".into());

    (doc, root)
}

#[test]
fn test_parse_accepts_tag_class_id_and_compounds() {
    assert!(QiSelector::parse("p").is_ok());
    assert!(QiSelector::parse(".note").is_ok());
    assert!(QiSelector::parse("#intro").is_ok());
    assert!(QiSelector::parse("p.note#intro").is_ok());
    assert!(QiSelector::parse("p, .note").is_ok());

    let compound = QiSelector::parse("p.note#intro").unwrap();
    let parts = compound.alternatives();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].tag.as_deref(), Some("p"));
    assert_eq!(parts[0].id.as_deref(), Some("intro"));
    assert_eq!(parts[0].classes, vec!["note"]);
}

#[test]
fn test_parse_rejects_malformed_expressions() {
    assert!(QiSelector::parse("").is_err());
    assert!(QiSelector::parse("p,").is_err());
    assert!(QiSelector::parse("p.").is_err());
    assert!(QiSelector::parse("#a#b").is_err());
    assert!(QiSelector::parse("p[title]").is_err());
    assert!(QiSelector::parse("1digit").is_err());
}

#[test]
fn test_tag_match_is_case_insensitive() {
    let (doc, root) = sample_document();
    let selector = QiSelector::parse("P").unwrap();

    assert_eq!(doc.select_within(root, &selector).len(), 3);
}

#[test]
fn test_select_matches_in_document_order() {
    let (doc, _root) = sample_document();

    let paragraphs = doc.select(&QiSelector::parse("p").unwrap());
    assert_eq!(paragraphs.len(), 3);
    assert!(paragraphs.windows(2).all(|pair| pair[0] < pair[1]));

    let notes = doc.select(&QiSelector::parse(".note").unwrap());
    assert_eq!(notes.len(), 2);
}

#[test]
fn test_select_within_excludes_the_root() {
    let (mut doc, root) = sample_document();
    doc.element_mut(root).unwrap().classes.push("note".into());

    let selector = QiSelector::parse(".note").unwrap();
    let matches = doc.select_within(root, &selector);

    assert_eq!(matches.len(), 2);
    assert!(!matches.contains(&root));
}

#[test]
fn test_alternation_matches_any_branch() {
    let (doc, root) = sample_document();
    let selector = QiSelector::parse("aside, #intro").unwrap();

    let matches = doc.select_within(root, &selector);
    assert_eq!(matches.len(), 2);
}

#[test]
fn test_compound_requires_every_part() {
    let (doc, root) = sample_document();
    let selector = QiSelector::parse("p.note").unwrap();

    // Only the two paragraphs carrying the class match; the plain ones and
    // the aside do not.
    assert_eq!(doc.select_within(root, &selector).len(), 2);
    assert_eq!(
        doc.select_within(root, &QiSelector::parse("aside.note").unwrap())
            .len(),
        0
    );
}
