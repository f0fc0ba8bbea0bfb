use std::time::{Duration, Instant};

use awint::awint_dag::triple_arena::OrdArena;

use crate::{
    mapper::{
        instantiate::FtbMemo, CostOrder, Cut, DemoteMuxes, InstKey, MapParams, MuxLegalizer,
        PInst,
    },
    network::{Network, NodeId, NodeKind, Remap},
    utils::mux_form,
    Error,
};

/// Statistics of one mapping round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundStats {
    pub round: u32,
    /// Sum of the cut costs of all winners in the mapping
    pub mapped_area: f32,
    /// Largest departure time over all sources
    pub mapped_delay: f32,
    /// Number of cuts that went through prioritization after enumeration
    pub cuts_enumerated: u64,
    pub enum_time: Duration,
    pub blend_time: Duration,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapStats {
    pub rounds: Vec<RoundStats>,
    /// The smallest mapped delay over all rounds
    pub best_arrival: f32,
    /// Number of `Lut6` nodes in the final network
    pub n_lut6: usize,
    /// Number of `Mux` nodes in the final network
    pub n_mux: usize,
    /// Number of multiplexers the legalizer turned back into LUTs
    pub n_demoted: usize,
}

impl MapStats {
    /// The stats of the last completed round
    pub fn last(&self) -> Option<&RoundStats> {
        self.rounds.last()
    }
}

/// Maps `net` in place onto 6 input LUTs and multiplexers.
///
/// If `remap` is given and empty, it is initialized to the identity of the
/// input and afterwards maps every node of the input to its signal in the
/// mapped network (or `None` if it no longer exists). If it is nonempty, it is
/// assumed to map some earlier network onto `net` and is composed with the
/// renumbering done here.
pub fn map(
    net: &mut Network,
    params: &MapParams,
    remap: Option<&mut Remap>,
) -> Result<MapStats, Error> {
    LutMapper::new(net, params, remap)?.run()
}

/// The state of one mapping run. All per node estimates are dense `Vec`s
/// indexed by `NodeId::inx`.
///
/// [LutMapper::run] does everything, the lower level functions are public so
/// that rounds can be stepped and inspected individually.
pub struct LutMapper<'a> {
    pub(crate) net: &'a mut Network,
    pub(crate) remap: Option<&'a mut Remap>,
    pub params: MapParams,
    pub legalizer: Box<dyn MuxLegalizer>,
    /// Prioritized cut lists of logic nodes, rank 0 is the current winner
    pub cutmap: Vec<Vec<Cut>>,
    /// Winners retained from the last round in which cuts were regenerated
    pub winner: Vec<Option<Cut>>,
    pub area_est: Vec<f32>,
    pub fanout_est: Vec<f32>,
    pub arrival: Vec<f32>,
    /// Departure times, `f32::INFINITY` marks nodes not reachable from any
    /// active output
    pub depart: Vec<f32>,
    pub active: Vec<bool>,
    /// Exact fanouts of the current mapping. Exact local area refinement only
    /// maintains the counts of logic nodes, the counts of other nodes stay
    /// those of the mapping before refinement.
    pub fanouts: Vec<u32>,
    pub round: u32,
    pub target_arrival: f32,
    pub best_arrival: f32,
    pub mapped_area: f32,
    pub mapped_delay: f32,
    pub cuts_enumerated: u64,
    pub stats: MapStats,
    pub(crate) order: Vec<NodeId>,
    pub(crate) queue: OrdArena<PInst, InstKey, ()>,
    pub(crate) undo: Vec<NodeId>,
    pub(crate) memo: FtbMemo,
    pub(crate) tmp_cuts: Vec<Cut>,
    pub(crate) tmp_order: CostOrder,
    finished: bool,
}

impl<'a> LutMapper<'a> {
    /// Checks the input and sets up the estimates. If `net` is not canonical
    /// it is compacted first, which is reflected in `remap`.
    pub fn new(
        net: &'a mut Network,
        params: &MapParams,
        mut remap: Option<&'a mut Remap>,
    ) -> Result<Self, Error> {
        if params.n_rounds == 0 {
            return Err(Error::OtherStr("`MapParams::n_rounds` must be at least 1"))
        }
        if params.cuts_per_node == 0 {
            return Err(Error::OtherStr(
                "`MapParams::cuts_per_node` must be at least 1",
            ))
        }
        if let Some(remap) = remap.as_deref_mut() {
            if remap.is_empty() {
                *remap = Remap::identity(net.len());
            }
        }
        net.verify_integrity()?;
        if !net.is_canonical() {
            let compaction = net.compact()?;
            if let Some(remap) = remap.as_deref_mut() {
                remap.apply(&compaction);
            }
        }
        for (id, kind) in net.iter() {
            if kind.is_mapped() {
                return Err(Error::UnmappableNode(id))
            }
        }

        let len = net.len();
        let fanout_est = net
            .fanout_counts()
            .into_iter()
            .map(|f| f.max(1) as f32)
            .collect();
        let order = net.up_order();
        Ok(Self {
            net,
            remap,
            params: params.clone(),
            legalizer: Box::new(DemoteMuxes),
            cutmap: vec![vec![]; len],
            winner: vec![None; len],
            area_est: vec![0.0; len],
            fanout_est,
            arrival: vec![0.0; len],
            depart: vec![f32::INFINITY; len],
            active: vec![true; len],
            fanouts: vec![0; len],
            round: 0,
            target_arrival: 0.0,
            best_arrival: f32::INFINITY,
            mapped_area: 0.0,
            mapped_delay: 0.0,
            cuts_enumerated: 0,
            stats: MapStats::default(),
            order,
            queue: OrdArena::new(),
            undo: vec![],
            memo: FtbMemo::new(len),
            tmp_cuts: vec![],
            tmp_order: CostOrder::default(),
            finished: false,
        })
    }

    pub fn net(&self) -> &Network {
        &*self.net
    }

    /// The round that instantiates the mapping
    pub fn last_round(&self) -> u32 {
        self.params.n_rounds - 1 + u32::from(self.params.map_for_delay)
    }

    /// If this is the round that only optimizes delay and keeps extra cuts
    pub fn is_probe_round(&self) -> bool {
        self.params.map_for_delay && (self.round == 0)
    }

    /// If this is the round that selects cuts without a timing window
    pub fn is_delay_round(&self) -> bool {
        if self.params.map_for_delay {
            self.round == 1
        } else {
            self.round == 0
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Runs all remaining rounds
    pub fn run(mut self) -> Result<MapStats, Error> {
        while self.step()? {}
        Ok(self.stats)
    }

    /// Runs one round. Returns `false` after the final round instantiated the
    /// mapping into the network.
    pub fn step(&mut self) -> Result<bool, Error> {
        if self.finished {
            return Err(Error::OtherStr("the mapping has already been instantiated"))
        }
        let t0 = Instant::now();
        self.cuts_enumerated = 0;
        self.generate_all()?;
        let t1 = Instant::now();
        let instantiate = self.round == self.last_round();
        self.update_fanout_est(instantiate)?;
        let t2 = Instant::now();

        if self.round == 0 {
            self.target_arrival = self.mapped_delay * self.params.delay_factor;
        }
        self.best_arrival = self.best_arrival.min(self.mapped_delay);
        let round_stats = RoundStats {
            round: self.round,
            mapped_area: self.mapped_area,
            mapped_delay: self.mapped_delay,
            cuts_enumerated: self.cuts_enumerated,
            enum_time: t1 - t0,
            blend_time: t2 - t1,
        };
        if !self.params.quiet {
            log::info!(
                "round={} mapped_area={} mapped_delay={} cuts={} [enum: {:?}, blend: {:?}]",
                round_stats.round,
                round_stats.mapped_area,
                round_stats.mapped_delay,
                round_stats.cuts_enumerated,
                round_stats.enum_time,
                round_stats.blend_time
            );
        }
        self.stats.rounds.push(round_stats);
        self.stats.best_arrival = self.best_arrival;

        self.end_round(instantiate);
        if instantiate {
            self.finished = true;
            self.stats.n_lut6 = self.net.count_lut6();
            self.stats.n_mux = self.net.count_mux();
            if !self.params.quiet {
                log::info!(
                    "mapped into {} LUT6s and {} muxes, delay {}",
                    self.stats.n_lut6,
                    self.stats.n_mux,
                    self.mapped_delay
                );
            }
            return Ok(false)
        }
        self.round += 1;
        Ok(true)
    }

    /// Generates or re-prioritizes cuts for every node in topological order
    pub fn generate_all(&mut self) -> Result<(), Error> {
        for i in 0..self.order.len() {
            let id = self.order[i];
            self.generate_cuts(id)?;
        }
        Ok(())
    }

    /// Retains winners and drops the cut lists if they are not recycled into
    /// the next round
    fn end_round(&mut self, instantiate: bool) {
        let regenerate = (self.round == 0)
            || !self.params.recycle_cuts
            || (self.params.map_for_delay && (self.round == 1));
        if !regenerate || instantiate {
            return
        }
        for (id, winner) in self.winner.iter_mut().enumerate() {
            *winner = None;
            if let Some(cut) = self.cutmap[id].first() {
                if self.net.kind(NodeId::new(id)).is_logic() {
                    *winner = Some(*cut);
                }
            }
        }
        for cuts in &mut self.cutmap {
            cuts.clear();
        }
    }

    /// The winning cut of a logic node
    pub(crate) fn winner_of(&self, id: NodeId) -> Result<Cut, Error> {
        self.cutmap[id.inx()].first().copied().ok_or_else(|| {
            Error::OtherString(format!("logic node {id:?} has no cuts"))
        })
    }

    /// The id of the selector of a `Lut4` node mapped by a multiplexer cut
    pub(crate) fn mux_selector(&self, id: NodeId) -> Option<NodeId> {
        if let NodeKind::Lut4(inp, table) = self.net.kind(id) {
            mux_form(*table).map(|form| inp[form.sel as usize].id())
        } else {
            None
        }
    }
}
