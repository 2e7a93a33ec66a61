use crate::expression::ast::{Expr, ExprRef};

/// Nodes per chunk. A chunk is allocated once at full capacity and
/// never moves, so slots stay valid for the life of the pool.
const CHUNK_NODES: usize = 1 << 14;

/// Append-only node pool owned by one worker for one pass.
///
/// Publication is two-phase: `emplace` writes the next slot without
/// advancing, `commit` advances. A second `emplace` without a `commit`
/// overwrites the first, which makes a node that fails admission cost
/// nothing.
pub struct ExprPool {
    id: u32,
    full: Vec<Vec<Expr>>,
    tail: Vec<Expr>,
    uncommitted: bool,
}

impl ExprPool {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            full: Vec::new(),
            tail: Vec::with_capacity(CHUNK_NODES),
            uncommitted: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Writes `expr` into the next free slot, discarding any previously
    /// emplaced-but-uncommitted node.
    pub fn emplace(&mut self, expr: Expr) -> ExprRef {
        if self.uncommitted {
            self.tail.pop();
        }
        if self.tail.len() == CHUNK_NODES {
            let filled = std::mem::replace(&mut self.tail, Vec::with_capacity(CHUNK_NODES));
            self.full.push(filled);
        }
        self.tail.push(expr);
        self.uncommitted = true;
        let slot = self.full.len() * CHUNK_NODES + self.tail.len() - 1;
        ExprRef::new(self.id, slot as u32)
    }

    /// Advances the cursor past the most recently emplaced node.
    pub fn commit(&mut self) {
        self.uncommitted = false;
    }

    pub fn get(&self, slot: u32) -> &Expr {
        let index = slot as usize;
        let chunk = index / CHUNK_NODES;
        if chunk < self.full.len() {
            &self.full[chunk][index % CHUNK_NODES]
        } else {
            &self.tail[index % CHUNK_NODES]
        }
    }

    /// Committed node count.
    pub fn len(&self) -> usize {
        self.full.len() * CHUNK_NODES + self.tail.len() - usize::from(self.uncommitted)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pools frozen at the end of completed passes, indexed by pool id.
#[derive(Default)]
pub struct PoolSet {
    pools: Vec<ExprPool>,
}

impl PoolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Id the next per-pass pool must be created with.
    pub fn next_id(&self) -> u32 {
        self.pools.len() as u32
    }

    /// Freezes a pass's pools; ids must continue the existing sequence.
    pub fn absorb(&mut self, pools: Vec<ExprPool>) {
        for pool in pools {
            debug_assert_eq!(pool.id() as usize, self.pools.len());
            self.pools.push(pool);
        }
    }

    pub(crate) fn node(&self, expr: ExprRef) -> &Expr {
        self.pools[expr.pool() as usize].get(expr.slot())
    }

    pub fn view(&self) -> ExprView<'_> {
        ExprView {
            frozen: self,
            local: None,
        }
    }

    /// View that additionally resolves nodes from a worker's in-progress
    /// pool, for rendering a winner before the pass is frozen.
    pub fn view_with<'a>(&'a self, local: &'a ExprPool) -> ExprView<'a> {
        ExprView {
            frozen: self,
            local: Some(local),
        }
    }
}

/// Read-only resolver for expression handles.
#[derive(Clone, Copy)]
pub struct ExprView<'a> {
    frozen: &'a PoolSet,
    local: Option<&'a ExprPool>,
}

impl<'a> ExprView<'a> {
    pub fn node(&self, expr: ExprRef) -> &'a Expr {
        if (expr.pool() as usize) < self.frozen.pool_count() {
            self.frozen.node(expr)
        } else {
            match self.local {
                Some(pool) if pool.id() == expr.pool() => pool.get(expr.slot()),
                _ => panic!("expression handle {expr:?} is not resolvable from this view"),
            }
        }
    }
}
