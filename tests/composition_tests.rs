//! Composition forest tests
//!
//! Builds forests from in-memory catalog listings and checks the shape,
//! query and rendering guarantees callers rely on.

use kubecompose::composition::{
    CatalogEntry, CompositionForest, NamespaceScope, ResourceRef, build_forest, query_node,
    query_subtrees, render,
};
use std::collections::HashSet;

fn ns() -> NamespaceScope {
    NamespaceScope::Named("default".to_string())
}

fn res(kind: &str, name: &str) -> ResourceRef {
    ResourceRef::new(kind, name, "default", &format!("uid-{}", name))
}

fn owned(kind: &str, name: &str, owner_kind: &str, owner_name: &str) -> CatalogEntry {
    CatalogEntry::owned(res(kind, name), owner_kind, &format!("uid-{}", owner_name))
}

/// A platform stack with a few levels of ownership, listed children-first
fn stack_catalog() -> Vec<CatalogEntry> {
    vec![
        owned("PostgresUser", "u1", "Postgres", "pg1"),
        owned("PostgresUser", "u2", "Postgres", "pg1"),
        owned("Postgres", "pg1", "Platform", "shop"),
        owned("Moodle", "m1", "Platform", "shop"),
        CatalogEntry::root(res("Platform", "shop")),
        CatalogEntry::root(res("Postgres", "pg2")),
        owned("MysqlCluster", "orphan", "Operator", "gone"),
    ]
}

fn all_uids(forest: &CompositionForest) -> Vec<String> {
    forest
        .walk()
        .map(|(_, node)| node.resource.uid.clone())
        .collect()
}

#[test]
fn test_acyclic_catalog_keeps_every_resource_once() {
    let catalog = stack_catalog();
    let expected = catalog.len();

    let forest = build_forest(&ns(), catalog);

    assert_eq!(forest.node_count(), expected);
    let uids = all_uids(&forest);
    let unique: HashSet<&String> = uids.iter().collect();
    assert_eq!(unique.len(), expected);
    assert_eq!(forest.stats.cycles_broken, 0);
    assert_eq!(forest.stats.orphans, 1);
}

#[test]
fn test_long_chain_is_one_tree() {
    let mut catalog = vec![CatalogEntry::root(res("Level", "n0"))];
    for i in 1..200 {
        catalog.push(owned(
            "Level",
            &format!("n{}", i),
            "Level",
            &format!("n{}", i - 1),
        ));
    }
    catalog.reverse();

    let forest = build_forest(&ns(), catalog);

    assert_eq!(forest.roots.len(), 1);
    assert_eq!(forest.node_count(), 200);
    let deepest = forest.walk().map(|(depth, _)| depth).max();
    assert_eq!(deepest, Some(199));
}

#[test]
fn test_chain_thousands_deep_does_not_exhaust_the_stack() {
    let depth = 8000;
    let mut catalog = vec![CatalogEntry::root(res("Level", "n0"))];
    for i in 1..depth {
        catalog.push(owned(
            "Level",
            &format!("n{}", i),
            "Level",
            &format!("n{}", i - 1),
        ));
    }

    let forest = build_forest(&ns(), catalog);

    assert_eq!(forest.roots.len(), 1);
    assert_eq!(forest.node_count(), depth);
    let leaf = query_subtrees(&forest, "Level", "n7999");
    assert_eq!(render(&leaf), "Level/n7999");
    drop(forest);
}

#[test]
fn test_long_owner_ring_is_broken_once() {
    let size = 4000;
    let catalog: Vec<CatalogEntry> = (0..size)
        .map(|i| {
            let owner = format!("n{}", (i + 1) % size);
            owned("Level", &format!("n{}", i), "Level", &owner)
        })
        .collect();

    let forest = build_forest(&ns(), catalog);

    assert_eq!(forest.stats.cycles_broken, 1);
    assert_eq!(forest.roots.len(), 1);
    assert_eq!(forest.node_count(), size);
}

#[test]
fn test_two_node_cycle_terminates_without_duplicates() {
    let catalog = vec![owned("A", "a", "B", "b"), owned("B", "b", "A", "a")];

    let forest = build_forest(&ns(), catalog);

    assert_eq!(forest.node_count(), 2);
    assert_eq!(forest.roots.len(), 1);
    assert_eq!(forest.stats.cycles_broken, 1);
    let uids = all_uids(&forest);
    assert_eq!(uids, vec!["uid-a".to_string(), "uid-b".to_string()]);
}

#[test]
fn test_disjoint_cycles_each_broken_once() {
    let catalog = vec![
        owned("A", "a", "B", "b"),
        owned("B", "b", "A", "a"),
        owned("C", "c", "D", "d"),
        owned("D", "d", "E", "e"),
        owned("E", "e", "C", "c"),
        CatalogEntry::root(res("F", "f")),
    ];

    let forest = build_forest(&ns(), catalog);

    assert_eq!(forest.node_count(), 6);
    assert_eq!(forest.roots.len(), 3);
    assert_eq!(forest.stats.cycles_broken, 2);
}

#[test]
fn test_render_is_deterministic() {
    let first = build_forest(&ns(), stack_catalog());
    let second = build_forest(&ns(), stack_catalog());

    let a = render(&query_subtrees(&first, "Postgres", ""));
    let b = render(&query_subtrees(&second, "Postgres", ""));
    assert_eq!(a, b);
    assert_eq!(
        a,
        "Postgres/pg1\n  PostgresUser/u1\n  PostgresUser/u2\n\nPostgres/pg2"
    );
}

#[test]
fn test_roots_follow_listing_order() {
    let forest = build_forest(&ns(), stack_catalog());
    let roots: Vec<String> = forest
        .roots
        .iter()
        .map(|node| node.resource.to_string())
        .collect();
    assert_eq!(
        roots,
        vec!["Platform/shop", "Postgres/pg2", "MysqlCluster/orphan"]
    );
}

#[test]
fn test_postgres_example() {
    let catalog = vec![
        CatalogEntry::root(res("Postgres", "pg1")),
        owned("PostgresUser", "u1", "Postgres", "pg1"),
    ];
    let forest = build_forest(&ns(), catalog);

    let node = query_node(&forest, "Postgres", "").unwrap();
    assert_eq!(node.resource.name, "pg1");

    let rendered = render(&query_subtrees(&forest, "Postgres", ""));
    assert!(rendered.contains("PostgresUser/u1"));
    assert_eq!(rendered, "Postgres/pg1\n  PostgresUser/u1");
}

#[test]
fn test_unknown_kind_is_not_found() {
    let forest = build_forest(&ns(), stack_catalog());

    assert!(query_node(&forest, "NoSuchKind", "x").is_none());
    assert!(query_subtrees(&forest, "NoSuchKind", "x").is_empty());
    assert_eq!(render(&[]), "");
}

#[test]
fn test_instance_match_returns_only_that_subtree() {
    let forest = build_forest(&ns(), stack_catalog());

    let matches = query_subtrees(&forest, "PostgresUser", "u2");
    assert_eq!(render(&matches), "PostgresUser/u2");
}

#[test]
fn test_empty_kind_matches_nothing() {
    let forest = build_forest(&ns(), stack_catalog());
    assert!(query_node(&forest, "", "pg1").is_none());
    assert!(query_subtrees(&forest, "", "").is_empty());
}

#[test]
fn test_every_node_matches_forest_namespace() {
    let mut catalog = stack_catalog();
    catalog.push(CatalogEntry::root(ResourceRef::new(
        "Postgres", "elsewhere", "team-b", "uid-elsewhere",
    )));

    let forest = build_forest(&ns(), catalog);

    assert!(
        forest
            .walk()
            .all(|(_, node)| node.resource.namespace == "default")
    );
    assert_eq!(forest.stats.foreign_dropped, 1);
}
