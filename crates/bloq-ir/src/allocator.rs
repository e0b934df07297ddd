//! Fresh-symbol allocation scoped to one call-graph build.

use rustc_hash::FxHashMap;

/// Hands out uniquely named symbols.
///
/// One allocator lives for exactly one call-graph build and is threaded
/// through every decomposition and generalizer call, so names never leak
/// between builds.
///
/// ```rust
/// use bloq_ir::SymbolAllocator;
///
/// let mut ssa = SymbolAllocator::new();
/// assert_eq!(ssa.new_symbol("theta"), "_theta0");
/// assert_eq!(ssa.new_symbol("theta"), "_theta1");
/// assert_eq!(ssa.shared_symbol("rz"), ssa.shared_symbol("rz"));
/// ```
#[derive(Debug, Default)]
pub struct SymbolAllocator {
    counters: FxHashMap<String, usize>,
    shared: FxHashMap<String, String>,
}

impl SymbolAllocator {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// A symbol name that this allocator has never returned before.
    pub fn new_symbol(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        let name = format!("_{prefix}{counter}");
        *counter += 1;
        name
    }

    /// The symbol bound to `key`, allocating it on first use.
    ///
    /// Every caller asking for the same key gets the same name, which lets
    /// a generalizer map many bloqs onto one symbolic stand-in.
    pub fn shared_symbol(&mut self, key: &str) -> String {
        if let Some(name) = self.shared.get(key) {
            return name.clone();
        }
        let name = self.new_symbol(key);
        self.shared.insert(key.to_string(), name.clone());
        name
    }

    /// Number of symbols allocated so far.
    pub fn allocated(&self) -> usize {
        self.counters.values().sum()
    }
}
