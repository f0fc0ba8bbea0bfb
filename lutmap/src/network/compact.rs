use std::mem;

use crate::{
    network::{Lit, Network, NodeId, NodeKind},
    Error,
};

/// The renumbering produced by [Network::compact], indexed by the old id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compaction {
    pub map: Vec<Option<NodeId>>,
}

impl Compaction {
    pub fn get(&self, id: NodeId) -> Option<NodeId> {
        self.map.get(id.inx()).copied().flatten()
    }

    /// Maps a signal of the old network to the new one, keeping polarity
    pub fn lit(&self, lit: Lit) -> Option<Lit> {
        self.get(lit.id()).map(|id| Lit::new(id, lit.sign()))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnStack,
    Done,
}

impl Network {
    /// Drops everything that does not contribute to a sink. The constant, all
    /// sources, all sinks, and everything reachable from sinks survive. The
    /// survivors are renumbered in a depth first post order, so the result is
    /// canonical even if the input was not.
    pub fn compact(&mut self) -> Result<Compaction, Error> {
        let len = self.len();
        let mut visit = vec![Visit::New; len];
        let mut order: Vec<NodeId> = vec![];
        let mut stack: Vec<(NodeId, usize)> = vec![];
        for root in self.ids() {
            let kind = self.kind(root);
            if !(kind.is_source() || kind.is_sink()) || (visit[root.inx()] != Visit::New) {
                continue
            }
            visit[root.inx()] = Visit::OnStack;
            stack.push((root, 0));
            while let Some((id, i)) = stack.last_mut() {
                let id = *id;
                let operands = self.kind(id).operands();
                if let Some(lit) = operands.get(*i) {
                    *i += 1;
                    let next = lit.id();
                    match self.get(next) {
                        None | Some(NodeKind::Removed) => {
                            return Err(Error::DanglingOperand(id, next))
                        }
                        Some(_) => (),
                    }
                    match visit[next.inx()] {
                        Visit::New => {
                            visit[next.inx()] = Visit::OnStack;
                            stack.push((next, 0));
                        }
                        Visit::OnStack => {
                            return Err(Error::OtherString(format!(
                                "combinational cycle through {id:?} and {next:?}"
                            )))
                        }
                        Visit::Done => (),
                    }
                } else {
                    stack.pop();
                    visit[id.inx()] = Visit::Done;
                    order.push(id);
                }
            }
        }

        let mut map = vec![None; len];
        for (new_inx, old) in order.iter().enumerate() {
            map[old.inx()] = Some(NodeId::new(new_inx));
        }
        let compaction = Compaction { map };
        let mut old_nodes = mem::take(self.nodes_mut());
        let mut new_nodes = Vec::with_capacity(order.len());
        for old in order {
            let mut kind = mem::replace(&mut old_nodes[old.inx()], NodeKind::Removed);
            for lit in kind.operands_mut() {
                // every operand was visited before its consumer
                *lit = compaction
                    .lit(*lit)
                    .ok_or(Error::OtherStr("operand missing from compaction"))?;
            }
            new_nodes.push(kind);
        }
        *self.nodes_mut() = new_nodes;
        log::debug!(
            "compacted network from {} to {} nodes",
            len,
            self.len()
        );
        debug_assert!(self.is_canonical());
        Ok(compaction)
    }
}
