//! Call-graph construction and leaf-count aggregation (sigma).

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use bloq_ir::{Bloq, BloqRef, SymbolAllocator, SymbolicInt};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::callees::CalleeResolver;
use crate::error::{CountError, CountResult};
use crate::generalizer::{Generalizer, Identity};

/// Leaf bloq to number of calls.
pub type Sigma = FxHashMap<BloqRef, SymbolicInt>;

/// Predicate marking bloqs that must stay leaves.
pub type KeepFn = Arc<dyn Fn(&BloqRef) -> bool + Send + Sync>;

/// Options for a call-graph build.
#[derive(Clone, Default)]
pub struct CallGraphOptions {
    /// Nodes at this depth are not expanded. `None` expands everything.
    pub max_depth: Option<usize>,
    /// Bloqs for which this returns `true` are not expanded.
    pub keep: Option<KeepFn>,
}

impl CallGraphOptions {
    fn keeps(&self, bloq: &BloqRef) -> bool {
        self.keep.as_ref().is_some_and(|keep| keep(bloq))
    }
}

impl fmt::Debug for CallGraphOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallGraphOptions")
            .field("max_depth", &self.max_depth)
            .field("keep", &self.keep.is_some())
            .finish()
    }
}

/// A directed graph of caller-to-callee edges weighted by call counts.
///
/// Nodes are generalized bloqs. Every node knows its sigma: how many times
/// each leaf is called per invocation of the node.
#[derive(Debug)]
pub struct CallGraph {
    graph: DiGraph<BloqRef, SymbolicInt>,
    index: FxHashMap<BloqRef, NodeIndex>,
    roots: Vec<NodeIndex>,
    leaves: FxHashSet<NodeIndex>,
    sigma: FxHashMap<NodeIndex, Sigma>,
}

impl CallGraph {
    /// Number of distinct nodes.
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of caller/callee edges.
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// The generalized roots, in the order they were given.
    pub fn roots(&self) -> impl Iterator<Item = &BloqRef> {
        self.roots.iter().map(|&n| &self.graph[n])
    }

    /// All nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &BloqRef> {
        self.graph.node_weights()
    }

    /// All edges as `(caller, callee, count)`.
    pub fn edges(&self) -> impl Iterator<Item = (&BloqRef, &BloqRef, &SymbolicInt)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    /// True if `bloq` is a node.
    pub fn contains(&self, bloq: &BloqRef) -> bool {
        self.index.contains_key(bloq)
    }

    /// True if `bloq` is a node that was not expanded.
    pub fn is_leaf(&self, bloq: &BloqRef) -> bool {
        self.index.get(bloq).is_some_and(|n| self.leaves.contains(n))
    }

    /// The count on the edge `caller -> callee`, if there is one.
    pub fn edge_count(&self, caller: &BloqRef, callee: &BloqRef) -> Option<&SymbolicInt> {
        let (a, b) = (self.index.get(caller)?, self.index.get(callee)?);
        self.graph.find_edge(*a, *b).map(|e| &self.graph[e])
    }

    /// Direct callees of `bloq` with their counts.
    pub fn callees(&self, bloq: &BloqRef) -> CountResult<Vec<(&BloqRef, &SymbolicInt)>> {
        let node = self.node(bloq)?;
        let mut out: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (&self.graph[e.target()], e.weight()))
            .collect();
        out.reverse();
        Ok(out)
    }

    /// Leaf counts of any node.
    pub fn sigma(&self, bloq: &BloqRef) -> CountResult<&Sigma> {
        let node = self.node(bloq)?;
        Ok(&self.sigma[&node])
    }

    /// Leaf counts summed over all roots.
    pub fn root_sigma(&self) -> Sigma {
        let mut total = Sigma::default();
        for root in &self.roots {
            add_scaled(&mut total, &self.sigma[root], &SymbolicInt::one());
        }
        total
    }

    fn node(&self, bloq: &BloqRef) -> CountResult<NodeIndex> {
        self.index
            .get(bloq)
            .copied()
            .ok_or_else(|| CountError::UnknownNode(bloq.to_string()))
    }

    /// Nodes grouped by topological generation: roots of the DAG first, then
    /// nodes whose callers all appear in earlier generations.
    fn generations(&self) -> Vec<Vec<NodeIndex>> {
        let mut indegree: FxHashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|n| (n, self.graph.edges_directed(n, Direction::Incoming).count()))
            .collect();
        let mut current: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|n| indegree[n] == 0)
            .collect();
        let mut generations = Vec::new();
        while !current.is_empty() {
            let mut next = Vec::new();
            for &n in &current {
                for e in self.graph.edges_directed(n, Direction::Outgoing) {
                    let d = indegree.entry(e.target()).or_default();
                    *d -= 1;
                    if *d == 0 {
                        next.push(e.target());
                    }
                }
            }
            generations.push(current);
            current = next;
        }
        generations
    }

    /// One `caller -- n -> callee` line per edge, grouped by topological
    /// generation and sorted by display text within each group.
    pub fn format_debug_text(&self) -> String {
        let mut lines = Vec::new();
        for generation in self.generations() {
            let mut nodes: Vec<(String, NodeIndex)> = generation
                .into_iter()
                .map(|n| (self.graph[n].to_string(), n))
                .collect();
            nodes.sort();
            for (name, n) in nodes {
                let mut callees: Vec<(String, &SymbolicInt)> = self
                    .graph
                    .edges_directed(n, Direction::Outgoing)
                    .map(|e| (self.graph[e.target()].to_string(), e.weight()))
                    .collect();
                callees.sort_by(|a, b| a.0.cmp(&b.0));
                for (callee, count) in callees {
                    lines.push(format!("{name} -- {count} -> {callee}"));
                }
            }
        }
        lines.join("\n")
    }

    /// Nodes, edges and root sigma as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        #[derive(Serialize)]
        struct Node {
            id: usize,
            bloq: String,
            leaf: bool,
        }
        #[derive(Serialize)]
        struct Edge<'a> {
            caller: usize,
            callee: usize,
            count: &'a SymbolicInt,
        }
        #[derive(Serialize)]
        struct Graph<'a> {
            roots: Vec<usize>,
            nodes: Vec<Node>,
            edges: Vec<Edge<'a>>,
            sigma: Vec<(String, SymbolicInt)>,
        }

        let graph = Graph {
            roots: self.roots.iter().map(|n| n.index()).collect(),
            nodes: self
                .graph
                .node_indices()
                .map(|n| Node {
                    id: n.index(),
                    bloq: self.graph[n].to_string(),
                    leaf: self.leaves.contains(&n),
                })
                .collect(),
            edges: self
                .graph
                .edge_references()
                .map(|e| Edge {
                    caller: e.source().index(),
                    callee: e.target().index(),
                    count: e.weight(),
                })
                .collect(),
            sigma: sorted_sigma(&self.root_sigma()),
        };
        serde_json::json!(graph)
    }
}

/// Sigma entries as `(display, count)` sorted by display text.
pub fn sorted_sigma(sigma: &Sigma) -> Vec<(String, SymbolicInt)> {
    let mut entries: Vec<_> = sigma
        .iter()
        .map(|(b, n)| (b.to_string(), n.clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

fn add_scaled(into: &mut Sigma, from: &Sigma, factor: &SymbolicInt) {
    for (bloq, n) in from {
        let entry = into.entry(bloq.clone()).or_default();
        *entry += &(n * factor);
    }
}

/// Build the call graph of `roots`.
///
/// Nodes are expanded breadth first, so each is expanded once, at the
/// smallest depth at which it is reached. A node becomes a leaf when it is
/// kept, sits at `max_depth`, cannot be decomposed, or has no callees.
#[instrument(skip_all, fields(roots = roots.len(), generalizer = generalizer.name()))]
pub fn build_call_graph(
    roots: &[BloqRef],
    options: &CallGraphOptions,
    generalizer: &dyn Generalizer,
) -> CountResult<CallGraph> {
    let mut ssa = SymbolAllocator::new();
    let mut resolver = CalleeResolver::new(generalizer, &mut ssa);

    let mut graph: DiGraph<BloqRef, SymbolicInt> = DiGraph::new();
    let mut index: FxHashMap<BloqRef, NodeIndex> = FxHashMap::default();
    let mut leaves = FxHashSet::default();
    let mut root_nodes = Vec::with_capacity(roots.len());
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();

    for root in roots {
        let g = resolver
            .generalize(root)
            .ok_or_else(|| CountError::RootGeneralizedAway(root.to_string()))?;
        let node = *index.entry(g.clone()).or_insert_with(|| {
            let n = graph.add_node(g);
            queue.push_back((n, 0));
            n
        });
        root_nodes.push(node);
    }

    while let Some((node, depth)) = queue.pop_front() {
        let bloq = graph[node].clone();
        let at_cutoff = options.max_depth.is_some_and(|max| depth >= max);
        if at_cutoff || options.keeps(&bloq) {
            debug!(bloq = %bloq, depth, "leaf: kept or at max depth");
            leaves.insert(node);
            continue;
        }
        let callees = match resolver.callees(&bloq)? {
            Some(callees) if !callees.is_empty() => callees,
            _ => {
                leaves.insert(node);
                continue;
            }
        };
        for callee in callees {
            let target = match index.get(&callee.bloq) {
                Some(&n) => n,
                None => {
                    let n = graph.add_node(callee.bloq.clone());
                    index.insert(callee.bloq.clone(), n);
                    queue.push_back((n, depth + 1));
                    n
                }
            };
            trace!(caller = %bloq, callee = %callee.bloq, count = %callee.count, "edge");
            graph.add_edge(node, target, callee.count);
        }
    }

    let order = petgraph::algo::toposort(&graph, None)
        .map_err(|cycle| CountError::CyclicGraph(graph[cycle.node_id()].to_string()))?;

    let mut sigma: FxHashMap<NodeIndex, Sigma> = FxHashMap::default();
    for &node in order.iter().rev() {
        let mut s = Sigma::default();
        if leaves.contains(&node) {
            s.insert(graph[node].clone(), SymbolicInt::one());
        } else {
            for e in graph.edges_directed(node, Direction::Outgoing) {
                add_scaled(&mut s, &sigma[&e.target()], e.weight());
            }
        }
        sigma.insert(node, s);
    }

    info!(
        "Built call graph: {} nodes, {} edges, {} leaves, {} decompositions",
        graph.node_count(),
        graph.edge_count(),
        leaves.len(),
        resolver.decompositions()
    );

    Ok(CallGraph {
        graph,
        index,
        roots: root_nodes,
        leaves,
        sigma,
    })
}

/// Call graph of one bloq together with its sigma.
pub fn get_bloq_call_graph(
    bloq: &BloqRef,
    generalizer: &dyn Generalizer,
    max_depth: Option<usize>,
) -> CountResult<(CallGraph, Sigma)> {
    let options = CallGraphOptions {
        max_depth,
        keep: None,
    };
    let graph = build_call_graph(std::slice::from_ref(bloq), &options, generalizer)?;
    let sigma = graph.root_sigma();
    Ok((graph, sigma))
}

/// Configures and runs call-graph builds.
///
/// ```rust
/// use bloq_count::{CallGraphBuilder, IgnoreSplitJoin};
/// use bloq_ir::gates::{Qrom, TGate};
/// use bloq_ir::BloqRef;
///
/// let qrom = BloqRef::new(Qrom::symbolic("N", "s", 4));
/// let graph = CallGraphBuilder::new()
///     .with_generalizer(IgnoreSplitJoin)
///     .with_keep(|b| b.is::<TGate>())
///     .build(&[qrom.clone()])
///     .unwrap();
/// assert_eq!(graph.sigma(&qrom).unwrap().len(), 3);
/// ```
pub struct CallGraphBuilder {
    options: CallGraphOptions,
    generalizer: Box<dyn Generalizer>,
}

impl CallGraphBuilder {
    /// Unlimited depth, nothing kept, identity generalizer.
    pub fn new() -> Self {
        Self {
            options: CallGraphOptions::default(),
            generalizer: Box::new(Identity),
        }
    }

    /// Stop expanding at `depth`.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }

    /// Keep bloqs matching `keep` as leaves.
    #[must_use]
    pub fn with_keep(mut self, keep: impl Fn(&BloqRef) -> bool + Send + Sync + 'static) -> Self {
        self.options.keep = Some(Arc::new(keep));
        self
    }

    /// Use `generalizer` for every node.
    #[must_use]
    pub fn with_generalizer(mut self, generalizer: impl Generalizer + 'static) -> Self {
        self.generalizer = Box::new(generalizer);
        self
    }

    /// Use an already boxed generalizer.
    #[must_use]
    pub fn with_boxed_generalizer(mut self, generalizer: Box<dyn Generalizer>) -> Self {
        self.generalizer = generalizer;
        self
    }

    /// Current options.
    pub fn options(&self) -> &CallGraphOptions {
        &self.options
    }

    /// The generalizer in use.
    pub fn generalizer(&self) -> &dyn Generalizer {
        self.generalizer.as_ref()
    }

    /// Build the call graph of `roots`.
    pub fn build(&self, roots: &[BloqRef]) -> CountResult<CallGraph> {
        build_call_graph(roots, &self.options, self.generalizer.as_ref())
    }

    /// Build the call graph of a single bloq value.
    pub fn build_for<B: Bloq>(&self, bloq: B) -> CountResult<CallGraph> {
        self.build(&[BloqRef::new(bloq)])
    }
}

impl Default for CallGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
