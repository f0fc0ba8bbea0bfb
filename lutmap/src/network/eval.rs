use crate::{
    network::{Lit, Network, NodeId, NodeKind},
    utils::table_lookup,
    Error,
};

/// The value of a signal given the simulated words of all nodes
pub fn lit_value(values: &[u64], lit: Lit) -> u64 {
    let v = values[lit.id().inx()];
    if lit.sign() {
        !v
    } else {
        v
    }
}

impl Network {
    /// Simulates 64 patterns in parallel. `source` is called for every `Pi`,
    /// `Ff`, and `Box` node to get its word. Returns the words of all nodes
    /// indexed by id, removed nodes get zero.
    pub fn simulate<F: FnMut(NodeId) -> u64>(&self, mut source: F) -> Result<Vec<u64>, Error> {
        if !self.is_canonical() {
            return Err(Error::OtherStr(
                "`Network::simulate` requires a canonical network",
            ))
        }
        let mut values = vec![0u64; self.len()];
        for (id, kind) in self.iter() {
            let v = match kind {
                NodeKind::Const => u64::MAX,
                NodeKind::Pi | NodeKind::Ff | NodeKind::Box => source(id),
                NodeKind::And([a, b]) => lit_value(&values, *a) & lit_value(&values, *b),
                NodeKind::Lut4(inp, table) => {
                    let mut words = [0u64; 4];
                    for (word, lit) in words.iter_mut().zip(inp.iter()) {
                        *word = lit_value(&values, *lit);
                    }
                    table_lookup(u64::from(*table), &words)
                }
                NodeKind::Lut6(inp, table) => {
                    let words: Vec<u64> = inp.iter().map(|lit| lit_value(&values, *lit)).collect();
                    table_lookup(*table, &words)
                }
                NodeKind::Mux([s, t, e]) => {
                    let s = lit_value(&values, *s);
                    (s & lit_value(&values, *t)) | (!s & lit_value(&values, *e))
                }
                NodeKind::Bar(a)
                | NodeKind::Sel(a)
                | NodeKind::Delay(a, _)
                | NodeKind::Po(a)
                | NodeKind::Seq(a) => lit_value(&values, *a),
                NodeKind::Removed => 0,
            };
            values[id.inx()] = v;
        }
        Ok(values)
    }
}
