//! The block store (§3, §4.2). Each participant owns one `Dag`. Blocks are
//! shared immutably between participants; acceptance is tracked locally
//! here rather than on the `Block` itself (§9, "Block sharing").
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::block::{Block, GENESIS_ID};
use super::{Error, Result};

#[derive(Debug)]
pub struct Dag {
    blocks: HashMap<u64, Rc<Block>>,
    /// Ids with no known child.
    roots: HashSet<u64>,
    accepted: HashSet<u64>,
}

impl Dag {
    /// A store seeded with the genesis block, already accepted.
    pub fn new() -> Self {
        let genesis = Block::genesis();
        let id = genesis.id;
        let mut blocks = HashMap::new();
        blocks.insert(id, Rc::new(genesis));
        let mut roots = HashSet::new();
        roots.insert(id);
        let mut accepted = HashSet::new();
        accepted.insert(id);
        Dag { blocks, roots, accepted }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&Rc<Block>> {
        self.blocks.get(&id)
    }

    pub fn is_accepted(&self, id: u64) -> bool {
        self.accepted.contains(&id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &u64> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Marks `id` accepted. A monotone latch: re-accepting is a no-op.
    pub fn accept(&mut self, id: u64) {
        self.accepted.insert(id);
    }

    /// Admits a block whose parents must already be locally known.
    /// Idempotent: a re-admitted id is a no-op (§8).
    pub fn on_receive(&mut self, block: Block) -> Result<()> {
        if self.contains(block.id) {
            return Ok(());
        }
        for parent in &block.parents {
            if !self.contains(*parent) {
                return Err(Error::MissingParent(*parent));
            }
        }
        for parent in &block.parents {
            self.roots.remove(parent);
        }
        self.roots.insert(block.id);
        self.blocks.insert(block.id, Rc::new(block));
        Ok(())
    }

    /// Depth-first iteration over the sub-DAG reachable from `start`: the
    /// search is pruned *at* an accepted ancestor, so an accepted block is
    /// never yielded at all, only `start` itself plus the non-accepted
    /// frontier beneath it.
    pub fn dag_head(&self, start: u64) -> Vec<u64> {
        let mut visited = HashSet::new();
        visited.insert(start);
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(block) = self.blocks.get(&id) {
                for parent in &block.parents {
                    if self.is_accepted(*parent) {
                        continue;
                    }
                    if visited.insert(*parent) {
                        stack.push(*parent);
                    }
                }
            }
        }
        out
    }

    /// Count of blocks latched accepted, genesis included — the reporting
    /// view of liveness/safety (§8 scenario 4/5).
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Children-first order: every block appears before its parents.
    /// Kahn's algorithm over the reversed (parent) edges, seeded from
    /// `roots`.
    pub fn topological_order(&self) -> Vec<u64> {
        let mut remaining: HashMap<u64, usize> = self
            .blocks
            .keys()
            .map(|id| (*id, self.blocks[id].parents.len()))
            .collect();
        let mut children: HashMap<u64, Vec<u64>> = HashMap::new();
        for (id, block) in &self.blocks {
            for parent in &block.parents {
                children.entry(*parent).or_insert_with(Vec::new).push(*id);
            }
        }
        let mut ready: Vec<u64> = self.roots.iter().copied().collect();
        ready.sort_unstable();
        let mut order = Vec::with_capacity(self.blocks.len());
        let mut i = 0;
        while i < ready.len() {
            let id = ready[i];
            i += 1;
            order.push(id);
            if let Some(block) = self.blocks.get(&id) {
                for parent in &block.parents {
                    if let Some(count) = remaining.get_mut(parent) {
                        *count -= 1;
                        if *count == 0 {
                            ready.push(*parent);
                        }
                    }
                }
            }
        }
        order
    }

    /// Parents-first order: the reverse of [`Dag::topological_order`],
    /// used for acceptance re-evaluation passes (§4.5 step 4).
    pub fn parents_first_order(&self) -> Vec<u64> {
        let mut order = self.topological_order();
        order.reverse();
        order
    }
}

impl Default for Dag {
    fn default() -> Self {
        Dag::new()
    }
}
