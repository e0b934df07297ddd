//! Structural guarantees of the call-graph builder and cost queries.

mod common;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use bloq_count::{
    CallGraphBuilder, CountError, GeneralizeRotationAngle, Generalizer, GeneralizerChain,
    IgnoreAllocFree, IgnoreSplitJoin, TCount, get_bloq_call_graph, get_cost_value, identity,
};
use bloq_ir::gates::{Allocate, Hadamard, Join, Rx, Rz, Split, TGate, ZPowGate};
use bloq_ir::{
    Bloq, BloqCount, BloqRef, DecomposeResult, QDType, Signature, SymbolAllocator, SymbolicInt,
};
use common::{Synthetic, a, b, c, d};
use proptest::prelude::*;

static SHARED_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Counts how often it is asked for its callees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Shared;

impl fmt::Display for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared")
    }
}

impl Bloq for Shared {
    fn signature(&self) -> Signature {
        Signature::build(&[("q", QDType::QBit)])
    }

    fn build_call_graph(&self, _ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        SHARED_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(vec![BloqCount::of(TGate::default(), 2)])
    }
}

/// Calls [`Shared`] `times` times.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Parent {
    id: u8,
    times: i64,
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parent{}", self.id)
    }
}

impl Bloq for Parent {
    fn signature(&self) -> Signature {
        Signature::build(&[("q", QDType::QBit)])
    }

    fn build_call_graph(&self, _ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        Ok(vec![BloqCount::of(Shared, self.times)])
    }
}

fn int(n: i64) -> SymbolicInt {
    SymbolicInt::from(n)
}

#[test]
fn test_shared_callee_decomposed_once() {
    let parents = [
        BloqRef::new(Parent { id: 1, times: 1000 }),
        BloqRef::new(Parent { id: 2, times: 1000 }),
    ];

    let before = SHARED_CALLS.load(Ordering::SeqCst);
    let graph = CallGraphBuilder::new().build(&parents).unwrap();
    assert_eq!(SHARED_CALLS.load(Ordering::SeqCst) - before, 1);

    let t = BloqRef::new(TGate::default());
    assert_eq!(graph.root_sigma()[&t], int(4000));
    assert_eq!(graph.sigma(&parents[0]).unwrap()[&t], int(2000));

    let before = SHARED_CALLS.load(Ordering::SeqCst);
    let cost = get_cost_value(&parents[1], &TCount, &identity()).unwrap();
    assert_eq!(cost, int(2000));
    assert_eq!(SHARED_CALLS.load(Ordering::SeqCst) - before, 1);
}

#[test]
fn test_depth_beyond_height_changes_nothing() {
    let (_, full) = get_bloq_call_graph(&d(), &identity(), None).unwrap();
    for depth in [2, 3, 7] {
        let (_, sigma) = get_bloq_call_graph(&d(), &identity(), Some(depth)).unwrap();
        assert_eq!(sigma, full, "max_depth {depth}");
    }

    let (graph, shallow) = get_bloq_call_graph(&d(), &identity(), Some(1)).unwrap();
    assert_eq!(shallow.len(), 2);
    assert_eq!(shallow[&b()], int(1));
    assert_eq!(shallow[&a()], int(2));
    assert!(graph.is_leaf(&b()));
    assert!(!graph.contains(&c()));
}

#[test]
fn test_every_depth_preserves_total_cost() {
    for depth in 0..5 {
        let (_, sigma) = get_bloq_call_graph(&d(), &identity(), Some(depth)).unwrap();
        let total: SymbolicInt = sigma
            .iter()
            .map(|(leaf, n)| get_cost_value(leaf, &TCount, &identity()).unwrap() * n)
            .sum();
        assert_eq!(total, int(13), "max_depth {depth}");
    }
}

#[test]
fn test_dropped_root_is_costed_raw() {
    let drop_all = |_: &BloqRef, _: &mut SymbolAllocator| -> Option<BloqRef> { None };
    assert_eq!(get_cost_value(&d(), &TCount, &drop_all).unwrap(), int(13));
    let err = get_bloq_call_graph(&d(), &drop_all, None).unwrap_err();
    assert!(matches!(err, CountError::RootGeneralizedAway(_)));
}

fn synthetic_tree() -> impl Strategy<Value = Synthetic> {
    let leaf = (0u8..4, 0i64..6).prop_map(|(i, t)| Synthetic::leaf(format!("L{i}"), t));
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop::collection::vec((inner, 1i64..4), 1..4)
            .prop_map(|callees| Synthetic::node(format!("N{}", callees.len()), callees))
    })
}

fn rotation_or_bookkeeping() -> impl Strategy<Value = BloqRef> {
    prop_oneof![
        (-10.0f64..10.0).prop_map(|x| BloqRef::new(Rz::new(x))),
        (-10.0f64..10.0).prop_map(|x| BloqRef::new(Rx::new(x))),
        (-4.0f64..4.0).prop_map(|x| BloqRef::new(ZPowGate::new(x))),
        (1usize..5).prop_map(|n| BloqRef::new(Split { n })),
        (1usize..5).prop_map(|n| BloqRef::new(Join { n })),
        Just(BloqRef::new(TGate::default())),
        Just(BloqRef::new(Hadamard)),
        Just(BloqRef::new(Allocate { dtype: QDType::QBit })),
    ]
}

proptest! {
    #[test]
    fn prop_cost_matches_path_enumeration(tree in synthetic_tree()) {
        let expected = int(tree.naive_t());
        let root = BloqRef::new(tree);
        let cost = get_cost_value(&root, &TCount, &identity()).unwrap();
        prop_assert_eq!(&cost, &expected);

        let (graph, sigma) = get_bloq_call_graph(&root, &identity(), None).unwrap();
        let from_sigma: i64 = sigma
            .iter()
            .map(|(leaf, n)| {
                let leaf = leaf.downcast_ref::<Synthetic>().unwrap();
                n.as_i64().unwrap() * leaf.t
            })
            .sum();
        prop_assert_eq!(int(from_sigma), expected);
        for leaf in sigma.keys() {
            prop_assert!(graph.is_leaf(leaf));
        }
    }

    #[test]
    fn prop_generalizers_are_idempotent(
        bloqs in prop::collection::vec(rotation_or_bookkeeping(), 1..8)
    ) {
        let chain = GeneralizerChain::new()
            .with(IgnoreSplitJoin)
            .with(IgnoreAllocFree)
            .with(GeneralizeRotationAngle);
        let mut ssa = SymbolAllocator::new();
        for bloq in &bloqs {
            if let Some(once) = chain.generalize(bloq, &mut ssa) {
                let twice = chain.generalize(&once, &mut ssa);
                prop_assert_eq!(twice, Some(once.clone()));
                prop_assert_eq!(once.my_gate_counts(), bloq.my_gate_counts());
            } else {
                prop_assert!(bloq.is::<Split>() || bloq.is::<Join>() || bloq.is::<Allocate>());
            }
        }
    }
}
