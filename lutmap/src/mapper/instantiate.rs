use std::mem;

use awint::awint_dag::smallvec::SmallVec;

use crate::{
    mapper::{check_muxes, Cut, LutMapper},
    network::{Lit, Network, NodeId, NodeKind},
    utils::{compact_support, expand, in_support, mux_form, table_lookup, PROJ},
    Error,
};

/// Memoization of function tables during extraction. Only the entries touched
/// by an extraction are reset afterwards.
#[derive(Debug, Clone, Default)]
pub struct FtbMemo {
    memo: Vec<Option<u64>>,
    touched: Vec<NodeId>,
    stack: Vec<(NodeId, usize)>,
}

impl FtbMemo {
    pub fn new(len: usize) -> Self {
        Self {
            memo: vec![None; len],
            touched: vec![],
            stack: vec![],
        }
    }

    fn clear(&mut self) {
        for id in self.touched.drain(..) {
            self.memo[id.inx()] = None;
        }
    }

    /// The table of `id` if it is the constant, a leaf, or already extracted
    fn known(&self, id: NodeId, cut: &Cut) -> Option<u64> {
        if id == NodeId::TRUE {
            return Some(u64::MAX)
        }
        if let Some(i) = cut.leaves().iter().position(|leaf| *leaf == id) {
            return Some(PROJ[i])
        }
        self.memo[id.inx()]
    }

    fn known_lit(&self, lit: Lit, cut: &Cut) -> Result<u64, Error> {
        match self.known(lit.id(), cut) {
            Some(ftb) => Ok(if lit.sign() { !ftb } else { ftb }),
            None => Err(Error::OtherString(format!(
                "function table of {lit:?} was not extracted before its consumer"
            ))),
        }
    }
}

/// Computes the function table of `lit` in terms of the leaves of `cut`, where
/// leaf `i` is variable `i`
pub fn compute_ftb(
    net: &Network,
    lit: Lit,
    cut: &Cut,
    memo: &mut FtbMemo,
) -> Result<u64, Error> {
    if memo.memo.len() < net.len() {
        memo.memo.resize(net.len(), None);
    }
    let mut stack = mem::take(&mut memo.stack);
    let res = extract(net, lit, cut, memo, &mut stack);
    stack.clear();
    memo.stack = stack;
    memo.clear();
    res
}

/// Bits of the operands the table of `kind` depends on
fn support_mask(kind: &NodeKind) -> Option<u8> {
    match kind {
        NodeKind::And(_) => Some(0b11),
        NodeKind::Lut4(_, table) => {
            let full = expand(u64::from(*table), 4);
            // inputs the table ignores may lie outside of the cone
            Some((0..4).fold(0, |acc, i| {
                if in_support(full, i) {
                    acc | (1 << i)
                } else {
                    acc
                }
            }))
        }
        _ => None,
    }
}

// post order traversal with an explicit stack, cones can be arbitrarily deep
fn extract(
    net: &Network,
    lit: Lit,
    cut: &Cut,
    memo: &mut FtbMemo,
    stack: &mut Vec<(NodeId, usize)>,
) -> Result<u64, Error> {
    stack.push((lit.id(), 0));
    while let Some((id, i)) = stack.last_mut() {
        let id = *id;
        if memo.known(id, cut).is_some() {
            stack.pop();
            continue
        }
        let kind = net.kind(id);
        let Some(support) = support_mask(kind) else {
            return Err(Error::OtherString(format!(
                "function table extraction reached {id:?} which is not in the cone of {cut:?}"
            )))
        };
        let operands = kind.operands();
        let mut pending = None;
        while *i < operands.len() {
            let j = *i;
            *i += 1;
            if ((support >> j) & 1) != 0 && memo.known(operands[j].id(), cut).is_none() {
                pending = Some(operands[j].id());
                break
            }
        }
        if let Some(next) = pending {
            stack.push((next, 0));
            continue
        }
        stack.pop();
        let ftb = match kind {
            NodeKind::And([a, b]) => memo.known_lit(*a, cut)? & memo.known_lit(*b, cut)?,
            NodeKind::Lut4(inp, table) => {
                let mut words = [0u64; 4];
                for (j, word) in words.iter_mut().enumerate() {
                    if ((support >> j) & 1) != 0 {
                        *word = memo.known_lit(inp[j], cut)?;
                    }
                }
                table_lookup(u64::from(*table), &words)
            }
            _ => return Err(Error::OtherStr("function table extraction of a non-logic node")),
        };
        memo.memo[id.inx()] = Some(ftb);
        memo.touched.push(id);
    }
    memo.known_lit(lit, cut)
}

/// The mapped node implementing `ftb` over the leaves of `cut`
fn mapped_kind(cut: &Cut, ftb: u64) -> NodeKind {
    let (ftb, kept) = compact_support(ftb, cut.size());
    let inputs: SmallVec<[Lit; 6]> = kept.iter().map(|i| cut.leaves()[*i].lit()).collect();
    if cut.is_mux() {
        // a multiplexer cut can degenerate into something simpler
        if let Some(form) = mux_form(ftb as u16) {
            let len = inputs.len();
            if ((form.sel as usize) < len)
                && ((form.then as usize) < len)
                && ((form.els as usize) < len)
            {
                return NodeKind::Mux([
                    inputs[form.sel as usize],
                    inputs[form.then as usize] ^ form.then_neg,
                    inputs[form.els as usize] ^ form.else_neg,
                ])
            }
        }
    }
    NodeKind::Lut6(inputs, ftb)
}

impl<'a> LutMapper<'a> {
    /// Rewrites every active logic node into the `Lut6` or `Mux` of its winner
    /// and removes everything else that does not contribute to a sink
    pub(crate) fn instantiate(&mut self) -> Result<(), Error> {
        let mut ftbs: Vec<(NodeId, Cut, u64)> = vec![];
        for i in 0..self.order.len() {
            let id = self.order[i];
            if self.active[id.inx()] && self.net.kind(id).is_logic() {
                let cut = self.winner_of(id)?;
                let ftb = compute_ftb(self.net, id.lit(), &cut, &mut self.memo)?;
                ftbs.push((id, cut, ftb));
            }
        }
        // all tables are extracted before any node changes
        for (id, cut, ftb) in ftbs {
            self.net.set_kind(id, mapped_kind(&cut, ftb));
        }
        for i in 0..self.order.len() {
            let id = self.order[i];
            if self.net.kind(id).is_logic() {
                self.net.remove(id);
            }
        }
        self.compact()?;

        let n_mux = self.net.count_mux();
        if n_mux > 0 {
            let n_lut6 = self.net.count_lut6();
            let demoted = self.legalizer.legalize(self.net)?;
            self.stats.n_demoted = demoted;
            if !self.params.quiet {
                log::info!(
                    "legalizing muxes: {} of {} demoted, #Mux={} #Lut6={}",
                    demoted,
                    n_mux,
                    self.net.count_mux(),
                    n_lut6 + demoted
                );
            }
            self.compact()?;
        }

        if self.params.use_fmux && !self.params.quiet {
            let report = check_muxes(self.net);
            if !report.is_clean() {
                log::warn!("mux rule violations after mapping: {report:?}");
            }
        }
        Ok(())
    }

    fn compact(&mut self) -> Result<(), Error> {
        let compaction = self.net.compact()?;
        if let Some(remap) = self.remap.as_deref_mut() {
            remap.apply(&compaction);
        }
        Ok(())
    }
}
