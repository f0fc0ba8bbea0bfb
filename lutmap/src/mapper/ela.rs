use std::mem;

use crate::{
    mapper::{Cut, LutMapper, MapParams, ELA_GLOBAL_LIM},
    network::{Network, NodeId},
    Error,
};

/// Reference counting over the maximal fanout free cones of winning cuts.
///
/// Every fanout change is logged so that it can be rolled back exactly with
/// [RefDeref::undo_deref] or [RefDeref::undo_ref]. The log is borrowed from
/// the mapper and reused between calls.
pub struct RefDeref<'m> {
    net: &'m Network,
    cutmap: &'m [Vec<Cut>],
    params: &'m MapParams,
    fanouts: &'m mut [u32],
    active: &'m mut [bool],
    undo: &'m mut Vec<NodeId>,
    acc: f32,
    lim: f32,
}

impl<'m> RefDeref<'m> {
    pub fn new(
        net: &'m Network,
        cutmap: &'m [Vec<Cut>],
        params: &'m MapParams,
        fanouts: &'m mut [u32],
        active: &'m mut [bool],
        undo: &'m mut Vec<NodeId>,
    ) -> Self {
        Self {
            net,
            cutmap,
            params,
            fanouts,
            active,
            undo,
            acc: 0.0,
            lim: f32::INFINITY,
        }
    }

    fn start(&mut self, lim: f32) {
        self.acc = 0.0;
        self.lim = lim;
        self.undo.clear();
    }

    /// Removes the contribution of `cut` from the mapping. Returns the area of
    /// the cone that is freed, or `None` if it would exceed `lim`.
    pub fn deref_cut(&mut self, cut: &Cut, lim: f32) -> Option<f32> {
        self.start(lim);
        if self.deref(cut) {
            Some(self.acc)
        } else {
            None
        }
    }

    /// Adds the contribution of `cut` to the mapping. Returns the area of the
    /// cone that becomes active, or `None` if it would exceed `lim`.
    pub fn ref_cut(&mut self, cut: &Cut, lim: f32) -> Option<f32> {
        self.start(lim);
        if self.reference(cut) {
            Some(self.acc)
        } else {
            None
        }
    }

    /// The cost `ref_cut` would return, without any lasting effect
    pub fn try_cut(&mut self, cut: &Cut, lim: f32) -> Option<f32> {
        let res = self.ref_cut(cut, lim);
        self.undo_ref();
        res
    }

    /// Rolls back the last `deref_cut`
    pub fn undo_deref(&mut self) {
        for v in self.undo.drain(..).rev() {
            if self.fanouts[v.inx()] == 0 {
                self.active[v.inx()] = true;
            }
            self.fanouts[v.inx()] += 1;
        }
    }

    /// Rolls back the last `ref_cut`
    pub fn undo_ref(&mut self) {
        for v in self.undo.drain(..).rev() {
            self.fanouts[v.inx()] -= 1;
            if self.fanouts[v.inx()] == 0 {
                self.active[v.inx()] = false;
            }
        }
    }

    fn deref(&mut self, cut: &Cut) -> bool {
        self.acc += self.params.cut_area(cut.size(), cut.mux_depth);
        if self.acc > self.lim {
            return false
        }
        for leaf in cut.leaves() {
            let v = leaf.inx();
            if !self.net.kind(*leaf).is_logic() {
                continue
            }
            debug_assert!(self.fanouts[v] > 0);
            debug_assert!(self.active[v]);
            self.fanouts[v] -= 1;
            self.undo.push(*leaf);
            if self.fanouts[v] == 0 {
                self.active[v] = false;
                let Some(next) = self.cutmap[v].first() else {
                    return false
                };
                if !self.deref(next) {
                    return false
                }
            }
        }
        true
    }

    fn reference(&mut self, cut: &Cut) -> bool {
        self.acc += self.params.cut_area(cut.size(), cut.mux_depth);
        if self.acc > self.lim {
            return false
        }
        for leaf in cut.leaves() {
            let v = leaf.inx();
            let kind = self.net.kind(*leaf);
            if !kind.is_logic() {
                // the cone behind a dangling pass-through is not mapped
                if kind.is_pass_through() && !self.active[v] {
                    return false
                }
                continue
            }
            self.fanouts[v] += 1;
            self.undo.push(*leaf);
            if self.fanouts[v] == 1 {
                self.active[v] = true;
                let Some(next) = self.cutmap[v].first() else {
                    return false
                };
                if !self.reference(next) {
                    return false
                }
            }
        }
        true
    }
}

impl<'a> LutMapper<'a> {
    /// Reference counting over the current mapping and exact fanouts
    pub fn ref_deref(&mut self) -> RefDeref<'_> {
        RefDeref::new(
            &*self.net,
            &self.cutmap,
            &self.params,
            &mut self.fanouts,
            &mut self.active,
            &mut self.undo,
        )
    }

    /// Re-selects winners of active nodes by the exact area of their cones,
    /// visiting nodes from sinks to sources. Departures are recomputed along
    /// the way so that alternatives can be checked against the target.
    pub(crate) fn exact_local_area(&mut self) -> Result<(), Error> {
        self.depart.fill(0.0);
        for i in (0..self.order.len()).rev() {
            let id = self.order[i];
            let inx = id.inx();
            if self.active[inx] && self.net.kind(id).is_logic() && (self.cutmap[inx].len() > 1) {
                self.refine_winner(id)?;
            }
            self.propagate_departure(id, false)?;
        }
        Ok(())
    }

    fn refine_winner(&mut self, id: NodeId) -> Result<(), Error> {
        let inx = id.inx();
        let mut cuts = mem::take(&mut self.cutmap[inx]);
        for cut in &mut cuts[1..] {
            self.refresh_mux_depth(cut);
        }
        self.cutmap[inx] = cuts;

        let winner = self.cutmap[inx][0];
        let candidates = &self.cutmap[inx];
        let arrival = &self.arrival;
        let depart = self.depart[inx];
        let target_arrival = self.target_arrival;
        let mut rd = RefDeref::new(
            &*self.net,
            &self.cutmap,
            &self.params,
            &mut self.fanouts,
            &mut self.active,
            &mut self.undo,
        );
        let mut best = match rd.deref_cut(&winner, ELA_GLOBAL_LIM) {
            Some(best) if best > 1.0 => best,
            _ => {
                rd.undo_deref();
                return Ok(())
            }
        };
        let mut best_i = 0;
        for (i, cut) in candidates.iter().enumerate().skip(1) {
            if cut.mux_depth > winner.mux_depth {
                continue
            }
            let arr = cut
                .leaves()
                .iter()
                .fold(0.0f32, |acc, leaf| acc.max(arrival[leaf.inx()] + 1.0));
            if (arr > arrival[inx]) && ((arr + depart) > target_arrival) {
                continue
            }
            if let Some(cost) = rd.try_cut(cut, best) {
                if cost < best {
                    best = cost;
                    best_i = i;
                }
            }
        }
        drop(rd);

        self.cutmap[inx].swap(0, best_i);
        let winner = self.cutmap[inx][0];
        if self.ref_deref().ref_cut(&winner, f32::INFINITY).is_none() {
            return Err(Error::OtherString(format!(
                "could not reference the refined winner of {id:?}"
            )))
        }
        Ok(())
    }
}
