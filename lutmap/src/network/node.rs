use std::slice;

use awint::awint_dag::smallvec::SmallVec;

use crate::network::Lit;

/// The explicit delay of a `NodeKind::Delay` is stored in units of
/// `1 / DELAY_FRACTION` LUT levels
pub const DELAY_FRACTION: f32 = 8.0;

/// The kind of a node along with its operands.
///
/// `Lut6` and `Mux` are only produced by mapping. Truth tables index their
/// inputs such that input `i` is bit `i` of the row index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The constant at `NodeId::TRUE`
    Const,
    /// Primary input
    Pi,
    /// Flip-flop output
    Ff,
    /// Output of a boxed primitive, treated as a global source
    Box,
    /// Two input AND gate
    And([Lit; 2]),
    /// Four input lookup table, unused inputs are tied to `Lit::FALSE`
    Lut4([Lit; 4], u16),
    /// Barrier
    Bar(Lit),
    /// Pin selector of a multi-output primitive
    Sel(Lit),
    /// Explicit delay element, the amount is in `DELAY_FRACTION` units
    Delay(Lit, u32),
    /// Primary output
    Po(Lit),
    /// Next state input of a flip-flop
    Seq(Lit),
    /// Six input lookup table
    Lut6(SmallVec<[Lit; 6]>, u64),
    /// Multiplexer of the form `(select, then, else)`
    Mux([Lit; 3]),
    /// Tombstone left by `Network::remove` until the next compaction
    Removed,
}

impl NodeKind {
    pub fn operands(&self) -> &[Lit] {
        match self {
            NodeKind::Const | NodeKind::Pi | NodeKind::Ff | NodeKind::Box | NodeKind::Removed => {
                &[]
            }
            NodeKind::And(inp) => inp,
            NodeKind::Lut4(inp, _) => inp,
            NodeKind::Bar(inp)
            | NodeKind::Sel(inp)
            | NodeKind::Delay(inp, _)
            | NodeKind::Po(inp)
            | NodeKind::Seq(inp) => slice::from_ref(inp),
            NodeKind::Lut6(inp, _) => inp,
            NodeKind::Mux(inp) => inp,
        }
    }

    pub fn operands_mut(&mut self) -> &mut [Lit] {
        match self {
            NodeKind::Const | NodeKind::Pi | NodeKind::Ff | NodeKind::Box | NodeKind::Removed => {
                &mut []
            }
            NodeKind::And(inp) => inp,
            NodeKind::Lut4(inp, _) => inp,
            NodeKind::Bar(inp)
            | NodeKind::Sel(inp)
            | NodeKind::Delay(inp, _)
            | NodeKind::Po(inp)
            | NodeKind::Seq(inp) => slice::from_mut(inp),
            NodeKind::Lut6(inp, _) => inp,
            NodeKind::Mux(inp) => inp,
        }
    }

    /// Gates that the mapper covers with cuts
    pub fn is_logic(&self) -> bool {
        matches!(self, NodeKind::And(_) | NodeKind::Lut4(..))
    }

    /// Combinational inputs: global sources with no operands relevant to
    /// mapping
    pub fn is_source(&self) -> bool {
        matches!(
            self,
            NodeKind::Const | NodeKind::Pi | NodeKind::Ff | NodeKind::Box
        )
    }

    /// Combinational outputs
    pub fn is_sink(&self) -> bool {
        matches!(self, NodeKind::Po(_) | NodeKind::Seq(_))
    }

    /// Nodes with a single predecessor that only influence timing
    pub fn is_pass_through(&self) -> bool {
        matches!(
            self,
            NodeKind::Bar(_) | NodeKind::Sel(_) | NodeKind::Delay(..)
        )
    }

    /// Kinds produced by mapping
    pub fn is_mapped(&self) -> bool {
        matches!(self, NodeKind::Lut6(..) | NodeKind::Mux(_))
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, NodeKind::Removed)
    }

    /// The delay that a value picks up going through this node from its
    /// operands, for non-logic nodes
    pub fn edge_delay(&self) -> f32 {
        if let NodeKind::Delay(_, amount) = self {
            (*amount as f32) / DELAY_FRACTION
        } else {
            0.0
        }
    }
}
