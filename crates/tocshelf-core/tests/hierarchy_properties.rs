//! Structural invariants of [`build_hierarchy`] over randomly generated
//! outlines, including arbitrary level jumps.

use std::collections::{HashMap, HashSet};

use tocshelf_core::{SequentialIds, TocEntry, TocNode, TocTree, UuidGenerator, build_hierarchy};

fn random_entries(rng: &mut fastrand::Rng) -> Vec<TocEntry> {
    let len = rng.usize(0..60);
    (0..len)
        .map(|i| TocEntry::new(rng.u32(1..=6), format!("Entry {i}"), 1 + i as u32 / 3))
        .collect()
}

fn check_invariants(tree: &TocTree) {
    let nodes = tree.nodes();
    let position: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    assert_eq!(position.len(), nodes.len(), "ids must be unique");

    for (i, node) in nodes.iter().enumerate() {
        if let Some(parent_id) = &node.parent_id {
            let p = position[parent_id.as_str()];
            assert!(p < i, "parent must be created first");
            assert!(nodes[p].level < node.level, "parent must be shallower");
        }

        // childIds is exactly the ordered list of nodes naming this parent.
        let expected: Vec<&str> = nodes
            .iter()
            .filter(|c| c.parent_id.as_deref() == Some(node.id.as_str()))
            .map(|c| c.id.as_str())
            .collect();
        let actual: Vec<&str> = node.child_ids.iter().map(String::as_str).collect();
        assert_eq!(actual, expected);
    }

    let roots: Vec<&TocNode> = tree.roots().collect();
    let parentless: Vec<&TocNode> = nodes.iter().filter(|n| n.parent_id.is_none()).collect();
    assert_eq!(roots, parentless);

    // Every node is reachable from a root through childIds.
    let mut seen = HashSet::new();
    let mut pending: Vec<&str> = roots.iter().map(|n| n.id.as_str()).collect();
    while let Some(id) = pending.pop() {
        assert!(seen.insert(id));
        pending.extend(tree.get(id).unwrap().child_ids.iter().map(String::as_str));
    }
    assert_eq!(seen.len(), nodes.len());
}

fn ancestor_levels_decrease(tree: &TocTree) {
    for node in tree.nodes() {
        let mut level = node.level;
        let mut cursor = node.parent_id.as_deref();
        while let Some(id) = cursor {
            let ancestor = tree.get(id).unwrap();
            assert!(ancestor.level < level);
            level = ancestor.level;
            cursor = ancestor.parent_id.as_deref();
        }
    }
}

#[test]
fn invariants_hold_for_random_outlines() {
    let mut rng = fastrand::Rng::with_seed(0x70c5_4e1f);
    for _ in 0..500 {
        let entries = random_entries(&mut rng);
        let tree = build_hierarchy(entries, "random.pdf", &mut UuidGenerator);
        check_invariants(&tree);
        ancestor_levels_decrease(&tree);
    }
}

#[test]
fn deterministic_ids_give_identical_trees() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..100 {
        let entries = random_entries(&mut rng);
        let first = build_hierarchy(entries.clone(), "a.pdf", &mut SequentialIds::new("n"));
        let second = build_hierarchy(entries, "a.pdf", &mut SequentialIds::new("n"));
        assert_eq!(first.nodes(), second.nodes());
    }
}

#[test]
fn random_ids_give_isomorphic_trees() {
    let entries = vec![
        TocEntry::new(1, "Ch1", 1),
        TocEntry::new(2, "S1", 1),
        TocEntry::new(2, "S2", 2),
        TocEntry::new(1, "Ch2", 3),
    ];
    let a = build_hierarchy(entries.clone(), "a.pdf", &mut UuidGenerator);
    let b = build_hierarchy(entries, "a.pdf", &mut UuidGenerator);

    let shape = |tree: &TocTree| -> Vec<(String, Option<String>, usize)> {
        tree.nodes()
            .iter()
            .map(|n| {
                let parent_title = n
                    .parent_id
                    .as_deref()
                    .map(|id| tree.get(id).unwrap().title.clone());
                (n.title.clone(), parent_title, n.child_ids.len())
            })
            .collect()
    };
    assert_eq!(shape(&a), shape(&b));
    assert_ne!(a.nodes()[0].id, b.nodes()[0].id);
}

#[test]
fn flat_entries_round_trip_through_nodes() {
    let entries = vec![
        TocEntry::new(1, "Intro", 1),
        TocEntry::new(3, "Detail", 2),
        TocEntry::new(2, "Section", 4),
    ];
    let tree = build_hierarchy(entries.clone(), "a.pdf", &mut SequentialIds::default());
    let flat: Vec<TocEntry> = tree.nodes().iter().map(TocNode::to_entry).collect();
    assert_eq!(flat, entries);
}
