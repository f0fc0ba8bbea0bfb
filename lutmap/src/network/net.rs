use awint::awint_dag::smallvec::SmallVec;

use crate::{
    network::{Lit, NodeId, NodeKind},
    Error,
};

/// A combinational network of gates with sequential boundaries cut at `Ff`
/// (outputs) and `Seq` (next state inputs).
///
/// Nodes live in a dense arena so that every per-node estimate of the mapper
/// can be a plain `Vec` indexed by `NodeId::inx`. Removing a node only leaves
/// a tombstone, [Network::compact] is what actually renumbers the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    nodes: Vec<NodeKind>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Creates a network with only the constant node
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeKind::Const],
        }
    }

    /// The number of slots in the arena, including removed nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A network is never truly empty because of the constant node, this
    /// returns if there is nothing besides it
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.inx()]
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.inx())
    }

    /// Iterates over all slots in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeKind)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, kind)| (NodeId::new(i), kind))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Replaces the kind of `id`. The caller is responsible for keeping the
    /// network acyclic and canonical.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.inx()] = kind;
    }

    /// Leaves a tombstone at `id`
    pub fn remove(&mut self, id: NodeId) {
        self.nodes[id.inx()] = NodeKind::Removed;
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<NodeKind> {
        &mut self.nodes
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(kind);
        id
    }

    pub fn add_pi(&mut self) -> Lit {
        self.push(NodeKind::Pi).lit()
    }

    pub fn add_ff(&mut self) -> Lit {
        self.push(NodeKind::Ff).lit()
    }

    pub fn add_box(&mut self) -> Lit {
        self.push(NodeKind::Box).lit()
    }

    pub fn add_and(&mut self, a: Lit, b: Lit) -> Lit {
        self.push(NodeKind::And([a, b])).lit()
    }

    /// Adds a four input LUT. Unused inputs should be tied to `Lit::FALSE`.
    pub fn add_lut4(&mut self, inputs: [Lit; 4], table: u16) -> Lit {
        self.push(NodeKind::Lut4(inputs, table)).lit()
    }

    pub fn add_bar(&mut self, a: Lit) -> Lit {
        self.push(NodeKind::Bar(a)).lit()
    }

    pub fn add_sel(&mut self, a: Lit) -> Lit {
        self.push(NodeKind::Sel(a)).lit()
    }

    /// Adds an explicit delay of `amount / DELAY_FRACTION` levels
    pub fn add_delay(&mut self, a: Lit, amount: u32) -> Lit {
        self.push(NodeKind::Delay(a, amount)).lit()
    }

    pub fn add_po(&mut self, a: Lit) -> NodeId {
        self.push(NodeKind::Po(a))
    }

    pub fn add_seq(&mut self, a: Lit) -> NodeId {
        self.push(NodeKind::Seq(a))
    }

    pub fn add_lut6(&mut self, inputs: &[Lit], table: u64) -> Lit {
        debug_assert!(inputs.len() <= 6);
        self.push(NodeKind::Lut6(SmallVec::from_slice(inputs), table))
            .lit()
    }

    pub fn add_mux(&mut self, sel: Lit, then: Lit, els: Lit) -> Lit {
        self.push(NodeKind::Mux([sel, then, els])).lit()
    }

    /// Counts the live nodes satisfying `f`
    pub fn count<F: FnMut(&NodeKind) -> bool>(&self, mut f: F) -> usize {
        self.nodes.iter().filter(|kind| f(kind)).count()
    }

    pub fn count_lut6(&self) -> usize {
        self.count(|kind| matches!(kind, NodeKind::Lut6(..)))
    }

    pub fn count_mux(&self) -> usize {
        self.count(|kind| matches!(kind, NodeKind::Mux(_)))
    }

    /// Returns if every operand refers to a live node with a smaller id, which
    /// makes ascending id order a topological order
    pub fn is_canonical(&self) -> bool {
        for (id, kind) in self.iter() {
            for lit in kind.operands() {
                if (lit.id() >= id) || self.nodes[lit.id().inx()].is_removed() {
                    return false
                }
            }
        }
        true
    }

    /// Checks that operands refer to live nodes
    pub fn verify_integrity(&self) -> Result<(), Error> {
        for (id, kind) in self.iter() {
            for lit in kind.operands() {
                match self.nodes.get(lit.id().inx()) {
                    None | Some(NodeKind::Removed) => {
                        return Err(Error::DanglingOperand(id, lit.id()))
                    }
                    Some(_) => (),
                }
            }
        }
        Ok(())
    }

    /// Topological order from sources to sinks over live nodes. The network
    /// must be canonical.
    pub fn up_order(&self) -> Vec<NodeId> {
        debug_assert!(self.is_canonical());
        self.iter()
            .filter(|(_, kind)| !kind.is_removed())
            .map(|(id, _)| id)
            .collect()
    }

    /// Reverse topological order from sinks to sources. The network must be
    /// canonical.
    pub fn down_order(&self) -> Vec<NodeId> {
        let mut order = self.up_order();
        order.reverse();
        order
    }

    /// The number of structural references to every node, sinks included
    pub fn fanout_counts(&self) -> Vec<u32> {
        let mut fanouts = vec![0u32; self.nodes.len()];
        for kind in &self.nodes {
            for lit in kind.operands() {
                fanouts[lit.id().inx()] += 1;
            }
        }
        fanouts
    }

    /// All sink nodes in ascending order
    pub fn sinks(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, kind)| kind.is_sink())
            .map(|(id, _)| id)
            .collect()
    }

    /// All source nodes in ascending order, including the constant
    pub fn sources(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, kind)| kind.is_source())
            .map(|(id, _)| id)
            .collect()
    }
}
