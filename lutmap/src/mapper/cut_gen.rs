use std::mem;

use crate::{
    mapper::{Cut, LutMapper},
    network::{Lit, NodeId, NodeKind},
    utils::mux_form,
    Error,
};

/// Adds `cut` to `cuts` while keeping the set free of cuts that are subsets of
/// other cuts. Returns `false` if `cut` has at most one leaf, in which case it
/// replaces the whole set and enumeration for the node should stop.
///
/// Multiplexer cuts already in the set do not take part in subsumption.
pub fn insert_cut(cuts: &mut Vec<Cut>, cut: Cut) -> bool {
    if cut.size() <= 1 {
        cuts.clear();
        cuts.push(cut);
        return false
    }
    let mut k = 0;
    while k < cuts.len() {
        if cuts[k].is_mux() {
            k += 1;
            continue
        }
        if cuts[k].subsumes(&cut) {
            return true
        }
        if cut.subsumes(&cuts[k]) {
            cuts[k] = cut;
            k += 1;
            while k < cuts.len() {
                if !cuts[k].is_mux() && cut.subsumes(&cuts[k]) {
                    cuts.swap_remove(k);
                } else {
                    k += 1;
                }
            }
            return true
        }
        k += 1;
    }
    cuts.push(cut);
    true
}

// The implicit trivial cut of an operand, constants have no leaves
fn trivial_cut(lit: Lit) -> Cut {
    if lit.id() == NodeId::TRUE {
        Cut::empty()
    } else {
        Cut::trivial(lit.id())
    }
}

/// Combines one candidate of every operand starting at `operands[0]` with
/// `acc` and inserts the results. Returns `false` when enumeration stops.
fn cross_product(cutmap: &[Vec<Cut>], operands: &[Lit], acc: Cut, out: &mut Vec<Cut>) -> bool {
    let Some((first, rest)) = operands.split_first() else {
        return insert_cut(out, acc)
    };
    let candidates = Some(trivial_cut(*first))
        .into_iter()
        .chain(cutmap[first.id().inx()].iter().copied());
    for candidate in candidates {
        // `None` is an overflow, not an error
        if let Some(acc) = acc.combine(&candidate) {
            if !cross_product(cutmap, rest, acc, out) {
                return false
            }
        }
    }
    true
}

impl<'a> LutMapper<'a> {
    /// Computes the cuts, `arrival`, and `area_est` of a single node. Operands
    /// must have been handled before.
    pub fn generate_cuts(&mut self, id: NodeId) -> Result<(), Error> {
        let inx = id.inx();
        match self.net.kind(id) {
            NodeKind::Const | NodeKind::Pi | NodeKind::Ff | NodeKind::Box => {
                // global sources only have their trivial cut
                self.cutmap[inx].clear();
                self.area_est[inx] = 0.0;
                self.arrival[inx] = 0.0;
            }
            NodeKind::And(_) | NodeKind::Lut4(..) => {
                if self.cutmap[inx].is_empty() {
                    self.generate_logic_cuts(id);
                } else {
                    let mut cuts = mem::take(&mut self.cutmap[inx]);
                    self.prioritize_cuts(id, &mut cuts);
                    self.cutmap[inx] = cuts;
                }
            }
            NodeKind::Po(_) | NodeKind::Seq(_) => (),
            NodeKind::Bar(lit) | NodeKind::Sel(lit) | NodeKind::Delay(lit, _) => {
                // like sources except for timing
                let delay = self.net.kind(id).edge_delay();
                let arrival = self.arrival[lit.id().inx()] + delay;
                self.cutmap[inx].clear();
                self.area_est[inx] = 0.0;
                self.arrival[inx] = arrival;
            }
            NodeKind::Lut6(..) | NodeKind::Mux(_) => return Err(Error::UnmappableNode(id)),
            NodeKind::Removed => return Err(Error::InvalidNode(id)),
        }
        Ok(())
    }

    fn generate_logic_cuts(&mut self, id: NodeId) {
        let inx = id.inx();
        let mut cuts = mem::take(&mut self.tmp_cuts);
        cuts.clear();
        if let Some(winner) = self.winner[inx] {
            cuts.push(winner);
        }
        let kind = self.net.kind(id);
        cross_product(&self.cutmap, kind.operands(), Cut::empty(), &mut cuts);
        if self.params.use_fmux {
            if let Some(mux) = self.mux_cut(id) {
                let degenerate = (cuts.len() == 1) && (cuts[0].size() <= 1);
                if !degenerate && !cuts.iter().any(|cut| cut.is_mux()) {
                    cuts.push(mux);
                }
            }
        }

        self.cuts_enumerated += cuts.len() as u64;
        self.prioritize_cuts(id, &mut cuts);

        if self.is_probe_round() {
            // keep only the cuts as fast as the best one
            let arrival = &self.arrival;
            let unit_delay = |cut: &Cut| {
                cut.leaves()
                    .iter()
                    .fold(0.0f32, |acc, leaf| acc.max(arrival[leaf.inx()]))
                    + 1.0
            };
            if let Some(first) = cuts.first() {
                let best = unit_delay(first);
                if let Some(i) = cuts.iter().skip(1).position(|cut| unit_delay(cut) > best) {
                    cuts.truncate(i + 1);
                }
            }
            cuts.truncate(2 * self.params.cuts_per_node);
        } else {
            cuts.truncate(self.params.cuts_per_node);
        }
        self.cutmap[inx].clear();
        self.cutmap[inx].extend_from_slice(&cuts);
        self.tmp_cuts = cuts;
    }

    /// The cut of the select and data operands of a `Lut4` whose table is a
    /// 2:1 multiplexer
    fn mux_cut(&self, id: NodeId) -> Option<Cut> {
        let NodeKind::Lut4(inp, table) = self.net.kind(id) else {
            return None
        };
        let form = mux_form(*table)?;
        let leaves: Vec<NodeId> = [form.sel, form.then, form.els]
            .iter()
            .map(|i| inp[*i as usize].id())
            .filter(|leaf| *leaf != NodeId::TRUE)
            .collect();
        let mut cut = Cut::from_leaves(&leaves)?;
        if cut.size() < 2 {
            return None
        }
        cut.mux_depth = 1;
        Some(cut)
    }
}
