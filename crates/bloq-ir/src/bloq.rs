//! The `Bloq` trait and value-semantics handles to bloqs.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::allocator::SymbolAllocator;
use crate::composite::CompositeBloq;
use crate::error::{DecomposeError, DecomposeResult};
use crate::gate_counts::GateCounts;
use crate::signature::Signature;
use crate::symbolic::SymbolicInt;

/// A quantum operation: a primitive gate or a composite of other bloqs.
///
/// Implementors are immutable values. Deriving `PartialEq`, `Eq` and `Hash`
/// is enough to get structural equality on `dyn Bloq`, which the call-graph
/// machinery uses to memoize work per distinct bloq.
///
/// Every hook except [`signature`](Bloq::signature) has a default:
/// primitives override nothing and are leaves, composites override
/// [`decompose_bloq`](Bloq::decompose_bloq), and bloqs whose full circuit
/// is too large (or needs concrete data) override
/// [`build_call_graph`](Bloq::build_call_graph) directly.
pub trait Bloq: BloqEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Typed ports of this bloq.
    fn signature(&self) -> Signature;

    /// Build this bloq out of smaller bloqs.
    fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
        Err(DecomposeError::NotImplemented(self.to_string()))
    }

    /// Direct callees with their multiplicities.
    ///
    /// The default counts the children of [`decompose_bloq`](Bloq::decompose_bloq).
    fn build_call_graph(&self, ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        let _ = ssa;
        Ok(self.decompose_bloq()?.callee_counts())
    }

    /// Gate counts this bloq contributes when it is a leaf of the call graph.
    fn my_gate_counts(&self) -> Option<GateCounts> {
        None
    }

    /// Short name for diagrams and debug text.
    fn pretty_name(&self) -> String {
        self.to_string()
    }
}

/// Object-safe structural equality and hashing for bloqs.
///
/// Implemented automatically for every `Bloq` that is `Eq + Hash`.
pub trait BloqEq {
    /// Upcast for downcasting to the concrete bloq type.
    fn as_any(&self) -> &dyn Any;

    /// Compare with another bloq of possibly different concrete type.
    fn dyn_eq(&self, other: &dyn Any) -> bool;

    /// Hash the concrete type together with the value.
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T: Bloq + Eq + Hash> BloqEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

impl PartialEq for dyn Bloq {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

impl Eq for dyn Bloq {}

impl Hash for dyn Bloq {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dyn_hash(state);
    }
}

/// Shared handle to a bloq with value semantics.
///
/// Cloning is cheap; equality and hashing look through the pointer at the
/// bloq's fields and concrete type.
#[derive(Clone)]
pub struct BloqRef(Arc<dyn Bloq>);

impl BloqRef {
    /// Wrap a bloq.
    pub fn new<B: Bloq>(bloq: B) -> Self {
        BloqRef(Arc::new(bloq))
    }

    /// The bloq as `Any`.
    pub fn as_any(&self) -> &dyn Any {
        self.0.as_ref().as_any()
    }

    /// Borrow the concrete bloq if it has type `B`.
    pub fn downcast_ref<B: Bloq>(&self) -> Option<&B> {
        self.as_any().downcast_ref::<B>()
    }

    /// True if the concrete bloq has type `B`.
    pub fn is<B: Bloq>(&self) -> bool {
        self.as_any().is::<B>()
    }
}

impl From<Arc<dyn Bloq>> for BloqRef {
    fn from(bloq: Arc<dyn Bloq>) -> Self {
        BloqRef(bloq)
    }
}

impl Deref for BloqRef {
    type Target = dyn Bloq;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for BloqRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Eq for BloqRef {}

impl Hash for BloqRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state);
    }
}

impl fmt::Debug for BloqRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_ref(), f)
    }
}

impl fmt::Display for BloqRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0.as_ref(), f)
    }
}

/// `count` calls to `bloq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BloqCount {
    /// The callee.
    pub bloq: BloqRef,
    /// How many times it is called, possibly symbolic.
    pub count: SymbolicInt,
}

impl BloqCount {
    /// Pair an already wrapped bloq with a multiplicity.
    pub fn new(bloq: BloqRef, count: impl Into<SymbolicInt>) -> Self {
        Self {
            bloq,
            count: count.into(),
        }
    }

    /// Wrap `bloq` and pair it with a multiplicity.
    pub fn of<B: Bloq>(bloq: B, count: impl Into<SymbolicInt>) -> Self {
        Self::new(BloqRef::new(bloq), count)
    }
}

impl fmt::Display for BloqCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.count, self.bloq)
    }
}
