//! Built-in sanity checks behind the `t` command.
//!
//! The suite is a plain function from nothing to a list of results; it builds
//! its own trees and shares no state with the interpreter that runs it.

use crate::record::Record;
use crate::tree::{InsertOutcome, Node, Tree};
use anyhow::{Context, Result, ensure};

/// Outcome of one self-test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: &'static str,
    /// `None` when the case passed, otherwise the first failed assertion.
    pub failure: Option<String>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

type Case = fn() -> Result<()>;

const CASES: &[(&str, Case)] = &[
    ("new container is empty", new_container_is_empty),
    ("insert, contains and erase one record", single_record),
    ("erase node with one child", erase_with_one_child),
    ("erase two-child node, root and non-root", erase_two_children_twice),
    ("erase root whose successor is deeper", erase_root_deep_successor),
    ("erase non-root two-child node", erase_non_root_deep_successor),
    ("duplicates are ignored", duplicates_are_ignored),
];

/// Run every case and collect the results in order.
pub fn run() -> Vec<CaseResult> {
    CASES
        .iter()
        .map(|&(name, case)| CaseResult {
            name,
            failure: case().err().map(|e| format!("{e:#}")),
        })
        .collect()
}

fn rec(key: i32, label: &str) -> Result<Record> {
    Record::try_new(key, label).with_context(|| format!("bad test record {key} {label}"))
}

fn build(items: &[(i32, &str)]) -> Result<Tree> {
    let mut tree = Tree::new();
    for &(key, label) in items {
        ensure!(
            tree.insert(rec(key, label)?) == InsertOutcome::Inserted,
            "{key} {label} was not inserted"
        );
    }
    Ok(tree)
}

/// Follow a path of `l`/`r` steps from the root.
fn at<'t>(tree: &'t Tree, path: &str) -> Option<&'t Node> {
    path.chars().try_fold(tree.root()?, |node, step| match step {
        'l' => node.left(),
        _ => node.right(),
    })
}

fn expect_key(tree: &Tree, path: &str, key: i32) -> Result<()> {
    let node = at(tree, path).with_context(|| format!("no node at {path:?}"))?;
    ensure!(
        node.record().key() == key,
        "node at {path:?} is {}, expected key {key}",
        node.record()
    );
    Ok(())
}

fn expect_empty(tree: &Tree, path: &str) -> Result<()> {
    ensure!(at(tree, path).is_none(), "node at {path:?} should be absent");
    Ok(())
}

fn expect_contains(tree: &Tree, items: &[(i32, &str)]) -> Result<()> {
    for &(key, label) in items {
        ensure!(tree.contains(&rec(key, label)?), "{key} {label} is missing");
    }
    Ok(())
}

fn new_container_is_empty() -> Result<()> {
    let tree = Tree::new();
    ensure!(tree.root().is_none(), "root is not empty");
    ensure!(tree.is_empty(), "tree reports contents");
    Ok(())
}

fn single_record() -> Result<()> {
    let mut tree = build(&[(10, "aap")])?;
    ensure!(at(&tree, "").is_some(), "root is empty");
    expect_empty(&tree, "l")?;
    expect_empty(&tree, "r")?;

    let different = rec(20, "noot")?;
    let copy = rec(10, "aap")?;
    ensure!(tree.contains(&copy), "record is not in the container");
    ensure!(!tree.contains(&different), "record should not be in the container");

    ensure!(!tree.erase(&different), "erased a missing record");
    ensure!(tree.contains(&copy), "record wrongly erased");

    ensure!(tree.erase(&copy), "record not erased");
    ensure!(tree.root().is_none(), "root not cleared");
    ensure!(!tree.contains(&copy), "erased record still present");
    Ok(())
}

fn erase_with_one_child() -> Result<()> {
    let mut tree = build(&[(10, "aap"), (20, "noot"), (15, "mies")])?;
    expect_key(&tree, "", 10)?;
    expect_key(&tree, "r", 20)?;
    expect_key(&tree, "rl", 15)?;

    ensure!(tree.erase(&rec(20, "noot")?), "noot not erased");
    expect_key(&tree, "", 10)?;
    expect_key(&tree, "r", 15)?;
    expect_empty(&tree, "rl")?;
    expect_empty(&tree, "rr")?;
    expect_contains(&tree, &[(10, "aap"), (15, "mies")])
}

fn erase_two_children_twice() -> Result<()> {
    let mut tree = build(&[(15, "b"), (10, "a"), (25, "d"), (20, "c"), (30, "e")])?;

    ensure!(tree.erase(&rec(25, "d")?), "d not erased");
    expect_key(&tree, "", 15)?;
    expect_key(&tree, "l", 10)?;
    expect_key(&tree, "r", 30)?;
    expect_key(&tree, "rl", 20)?;
    expect_empty(&tree, "rr")?;
    expect_contains(&tree, &[(10, "a"), (15, "b"), (20, "c"), (30, "e")])?;

    ensure!(tree.erase(&rec(15, "b")?), "b not erased");
    expect_key(&tree, "", 20)?;
    expect_key(&tree, "l", 10)?;
    expect_key(&tree, "r", 30)?;
    expect_empty(&tree, "rl")?;
    expect_empty(&tree, "rr")?;
    expect_contains(&tree, &[(10, "a"), (20, "c"), (30, "e")])
}

const BALANCED: &[(i32, &str)] = &[
    (25, "d"),
    (15, "b"),
    (35, "f"),
    (10, "a"),
    (20, "c"),
    (30, "e"),
    (40, "g"),
];

fn erase_root_deep_successor() -> Result<()> {
    let mut tree = build(BALANCED)?;

    ensure!(tree.erase(&rec(25, "d")?), "d not erased");
    expect_key(&tree, "", 30)?;
    expect_key(&tree, "l", 15)?;
    expect_key(&tree, "r", 35)?;
    expect_key(&tree, "ll", 10)?;
    expect_key(&tree, "lr", 20)?;
    expect_key(&tree, "rr", 40)?;
    expect_empty(&tree, "rl")?;
    expect_contains(
        &tree,
        &[(10, "a"), (15, "b"), (20, "c"), (30, "e"), (35, "f"), (40, "g")],
    )
}

fn erase_non_root_deep_successor() -> Result<()> {
    let mut items = vec![(45, "h")];
    items.extend_from_slice(BALANCED);
    let mut tree = build(&items)?;

    ensure!(tree.erase(&rec(25, "d")?), "d not erased");
    expect_key(&tree, "", 45)?;
    expect_key(&tree, "l", 30)?;
    expect_key(&tree, "ll", 15)?;
    expect_key(&tree, "lr", 35)?;
    expect_key(&tree, "lll", 10)?;
    expect_key(&tree, "llr", 20)?;
    expect_key(&tree, "lrr", 40)?;
    expect_empty(&tree, "lrl")?;
    expect_contains(
        &tree,
        &[(10, "a"), (15, "b"), (20, "c"), (30, "e"), (35, "f"), (40, "g"), (45, "h")],
    )
}

fn duplicates_are_ignored() -> Result<()> {
    let mut tree = build(&[(10, "aap"), (5, "noot")])?;
    ensure!(
        tree.insert(rec(10, "aap")?) == InsertOutcome::Duplicate,
        "duplicate was accepted"
    );
    ensure!(tree.len() == 2, "length changed to {}", tree.len());
    let keys: Vec<i32> = tree.iter().map(Record::key).collect();
    ensure!(keys == [5, 10], "in-order keys are {keys:?}");
    Ok(())
}
