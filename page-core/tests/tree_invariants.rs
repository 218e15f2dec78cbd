//! Property tests: arbitrary edit sequences keep the document a valid forest.

use std::collections::HashSet;

use page_core::{BuilderError, ElementDraft, ElementId, PageSchema, PageStore, StoreConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add {
        parent: Option<usize>,
        index: Option<usize>,
        children: usize,
    },
    Remove(usize),
    Move {
        target: usize,
        parent: Option<usize>,
        index: usize,
    },
    Duplicate(usize),
    Save,
    Undo,
    Redo,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (
            proptest::option::of(0usize..64),
            proptest::option::of(0usize..8),
            0usize..3
        )
            .prop_map(|(parent, index, children)| Op::Add {
                parent,
                index,
                children
            }),
        1 => (0usize..64).prop_map(Op::Remove),
        3 => (0usize..64, proptest::option::of(0usize..64), 0usize..8)
            .prop_map(|(target, parent, index)| Op::Move {
                target,
                parent,
                index
            }),
        1 => (0usize..64).prop_map(Op::Duplicate),
        2 => Just(Op::Save),
        1 => Just(Op::Undo),
        1 => Just(Op::Redo),
    ]
}

fn pick(ids: &[ElementId], n: usize) -> Option<ElementId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[n % ids.len()].clone())
    }
}

fn ids(store: &PageStore) -> Vec<ElementId> {
    store.layers().into_iter().map(|layer| layer.id).collect()
}

fn apply(store: &mut PageStore, op: &Op) -> Result<(), TestCaseError> {
    let current = ids(store);
    match op {
        Op::Add {
            parent,
            index,
            children,
        } => {
            let parent = parent.and_then(|n| pick(&current, n));
            let mut draft = ElementDraft::new("Box");
            for _ in 0..*children {
                draft = draft.with_child(ElementDraft::new("Text"));
            }
            let added = store.add_element(draft, parent.as_ref(), *index);
            prop_assert!(added.is_some());
        }
        Op::Remove(n) => {
            if let Some(id) = pick(&current, *n) {
                prop_assert!(store.remove_element(&id));
                prop_assert!(store.element(&id).is_none());
            }
        }
        Op::Move {
            target,
            parent,
            index,
        } => {
            let Some(id) = pick(&current, *target) else {
                return Ok(());
            };
            let parent = parent.and_then(|n| pick(&current, n));
            let cyclic = parent.as_ref().is_some_and(|p| {
                store
                    .tree()
                    .is_some_and(|tree| tree.is_within(p, &id))
            });
            let before = store.schema();
            let result = store.move_element(&id, parent.as_ref(), *index);
            if cyclic {
                let rejected = matches!(result, Err(BuilderError::CyclicMove { .. }));
                prop_assert!(rejected);
                prop_assert_eq!(store.schema(), before);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(store.parent_of(&id), parent.as_ref());
            }
        }
        Op::Duplicate(n) => {
            if let Some(id) = pick(&current, *n) {
                let copy = store.duplicate_element(&id);
                prop_assert!(copy.is_some_and(|copy| copy != id));
            }
        }
        Op::Save => store.save_to_history(),
        Op::Undo => {
            store.undo();
        }
        Op::Redo => {
            store.redo();
        }
    }
    Ok(())
}

fn check_forest(store: &PageStore) -> Result<(), TestCaseError> {
    let tree = store.tree().expect("loaded");
    let layers = store.layers();
    prop_assert_eq!(layers.len(), tree.len());

    let mut seen = HashSet::new();
    for layer in &layers {
        prop_assert!(seen.insert(layer.id.clone()), "duplicate id {}", layer.id);
        match tree.parent_of(&layer.id) {
            None => {
                prop_assert_eq!(layer.depth, 0);
                prop_assert!(tree.roots().contains(&layer.id));
            }
            Some(parent) => {
                let node = tree.get(parent).expect("parent exists");
                prop_assert!(node.children().contains(&layer.id));
                prop_assert!(!tree.is_within(parent, &layer.id));
            }
        }
    }

    prop_assert!(store.history_index() < store.history_len());
    if let Some(selected) = store.selected_id() {
        prop_assert!(tree.contains(selected));
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_edits_keep_a_valid_forest(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut store = PageStore::with_config(StoreConfig { max_history: 8 });
        store
            .set_schema(PageSchema::blank("prop", "prop", "Prop"))
            .expect("load");

        for op in &ops {
            apply(&mut store, op)?;
            check_forest(&store)?;
        }

        // The assembled document survives a JSON round trip unchanged.
        let json = store.to_json().expect("serialize");
        let mut reloaded = PageStore::new();
        reloaded.load_json(&json).expect("reload");
        prop_assert_eq!(reloaded.schema(), store.schema());
    }

    #[test]
    fn prop_history_stays_bounded(saves in 0usize..120, cap in 1usize..60) {
        let mut store = PageStore::with_config(StoreConfig { max_history: cap });
        store
            .set_schema(PageSchema::blank("prop", "prop", "Prop"))
            .expect("load");
        for _ in 0..saves {
            store.add_element(ElementDraft::new("Box"), None, None);
            store.save_to_history();
        }
        prop_assert!(store.history_len() <= cap);
        prop_assert_eq!(store.history_index(), store.history_len() - 1);
    }
}
