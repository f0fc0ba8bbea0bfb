use crate::network::{Compaction, Lit, NodeId};

/// Maps node ids of some earlier network to signals of the current one.
/// `None` means that the node no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Remap {
    pub map: Vec<Option<Lit>>,
}

impl Remap {
    pub fn identity(len: usize) -> Self {
        Self {
            map: (0..len).map(|i| Some(NodeId::new(i).lit())).collect(),
        }
    }

    pub fn from_compaction(compaction: &Compaction) -> Self {
        Self {
            map: compaction.map.iter().map(|id| id.map(NodeId::lit)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<Lit> {
        self.map.get(id.inx()).copied().flatten()
    }

    /// Maps a signal of the earlier network, composing polarities
    pub fn lit(&self, lit: Lit) -> Option<Lit> {
        self.get(lit.id()).map(|res| res ^ lit.sign())
    }

    /// Redirects `id` to a new signal of the current network
    pub fn set(&mut self, id: NodeId, lit: Option<Lit>) {
        if self.map.len() <= id.inx() {
            self.map.resize(id.inx() + 1, None);
        }
        self.map[id.inx()] = lit;
    }

    /// Follows this remap with a compaction of the current network
    pub fn apply(&mut self, compaction: &Compaction) {
        for entry in &mut self.map {
            if let Some(lit) = *entry {
                *entry = compaction.lit(lit);
            }
        }
    }

    /// Follows this remap with a later one
    pub fn compose(&mut self, later: &Remap) {
        for entry in &mut self.map {
            if let Some(lit) = *entry {
                *entry = later.lit(lit);
            }
        }
    }
}
