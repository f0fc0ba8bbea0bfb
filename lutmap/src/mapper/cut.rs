use std::fmt;

use crate::network::NodeId;

/// The maximum number of leaves of a cut
pub const MAX_CUT: usize = 6;

/// A set of at most 6 node ids stored in strictly ascending order, along with
/// an abstraction mask that has bit `id & 31` set for every leaf.
///
/// `mux_depth == 0` is an ordinary LUT cut, otherwise the cut realizes a
/// multiplexer chain of that depth with its leaves being the select and data
/// signals.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cut {
    leaves: [NodeId; MAX_CUT],
    size: u8,
    abstr: u32,
    pub mux_depth: u8,
}

fn abstr_bit(id: NodeId) -> u32 {
    1 << (id.0 & 31)
}

impl Cut {
    /// The cut with no leaves, which is what constants reduce to
    pub fn empty() -> Self {
        Self {
            leaves: [NodeId::TRUE; MAX_CUT],
            size: 0,
            abstr: 0,
            mux_depth: 0,
        }
    }

    /// The cut consisting of only `id`
    pub fn trivial(id: NodeId) -> Self {
        let mut res = Self::empty();
        res.push(id);
        res
    }

    /// Creates a cut from arbitrary leaves, sorting and deduplicating them.
    /// Returns `None` if there are more than 6 distinct leaves.
    pub fn from_leaves(leaves: &[NodeId]) -> Option<Self> {
        let mut res = Self::empty();
        for leaf in leaves {
            res = res.combine(&Self::trivial(*leaf))?;
        }
        Some(res)
    }

    fn push(&mut self, id: NodeId) {
        debug_assert!((self.size as usize) < MAX_CUT);
        self.leaves[self.size as usize] = id;
        self.size += 1;
        self.abstr |= abstr_bit(id);
    }

    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves[..(self.size as usize)]
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn abstr(&self) -> u32 {
        self.abstr
    }

    pub fn is_mux(&self) -> bool {
        self.mux_depth > 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        ((self.abstr & abstr_bit(id)) != 0) && self.leaves().binary_search(&id).is_ok()
    }

    /// The union of two cuts, or `None` if it would have more than 6 leaves.
    /// The result is a LUT cut.
    pub fn combine(&self, other: &Cut) -> Option<Cut> {
        if (self.abstr | other.abstr).count_ones() as usize > MAX_CUT {
            return None
        }
        let lhs = self.leaves();
        let rhs = other.leaves();
        let mut res = Cut::empty();
        let mut i = 0;
        let mut j = 0;
        while (i < lhs.len()) && (j < rhs.len()) {
            if res.size() == MAX_CUT {
                return None
            }
            let (a, b) = (lhs[i], rhs[j]);
            if a < b {
                res.push(a);
                i += 1;
            } else if a > b {
                res.push(b);
                j += 1;
            } else {
                res.push(a);
                i += 1;
                j += 1;
            }
        }
        let rest = if i < lhs.len() { &lhs[i..] } else { &rhs[j..] };
        if (res.size() + rest.len()) > MAX_CUT {
            return None
        }
        for leaf in rest {
            res.push(*leaf);
        }
        Some(res)
    }

    /// Returns if every leaf of `self` is also a leaf of `other`
    pub fn subsumes(&self, other: &Cut) -> bool {
        if other.size < self.size {
            return false
        }
        if (self.abstr & !other.abstr) != 0 {
            return false
        }
        let sup = other.leaves();
        if self.size == other.size {
            return self.leaves() == sup
        }
        let mut j = 0;
        for leaf in self.leaves() {
            loop {
                if j == sup.len() {
                    return false
                }
                j += 1;
                if sup[j - 1] == *leaf {
                    break
                }
            }
        }
        true
    }
}

impl fmt::Debug for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mux_depth > 0 {
            write!(f, "mux{}", self.mux_depth)?;
        }
        f.debug_set().entries(self.leaves()).finish()
    }
}
