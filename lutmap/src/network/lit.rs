use std::{fmt, ops::BitXor, ops::Not};

/// Dense index of a node in a [crate::network::Network]. Ids are stable until
/// the network is compacted.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The constant node, which always exists at index 0 and is logic true
    pub const TRUE: NodeId = NodeId(0);

    pub fn new(inx: usize) -> Self {
        debug_assert!(inx <= (u32::MAX as usize));
        Self(inx as u32)
    }

    pub fn inx(self) -> usize {
        self.0 as usize
    }

    /// The non-inverted signal of this node
    pub fn lit(self) -> Lit {
        Lit::new(self, false)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A signal: a node plus a polarity, packed as `(id << 1) | sign`
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Lit(u32);

impl Lit {
    pub const TRUE: Lit = Lit(0);
    pub const FALSE: Lit = Lit(1);

    pub fn new(id: NodeId, sign: bool) -> Self {
        Self((id.0 << 1) | (sign as u32))
    }

    pub fn id(self) -> NodeId {
        NodeId(self.0 >> 1)
    }

    /// If this signal is inverted
    pub fn sign(self) -> bool {
        (self.0 & 1) != 0
    }

    /// The same node without inversion
    pub fn unsigned(self) -> Self {
        Self(self.0 & !1)
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        Lit(self.0 ^ 1)
    }
}

impl BitXor<bool> for Lit {
    type Output = Lit;

    fn bitxor(self, rhs: bool) -> Lit {
        Lit(self.0 ^ (rhs as u32))
    }
}

impl From<NodeId> for Lit {
    fn from(id: NodeId) -> Self {
        id.lit()
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign() {
            write!(f, "~{:?}", self.id())
        } else {
            write!(f, "{:?}", self.id())
        }
    }
}
