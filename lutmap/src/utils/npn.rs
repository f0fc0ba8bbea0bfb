use once_cell::sync::Lazy;

use crate::utils::PROJ;

/// How a four input table realizes a 2:1 multiplexer: the output is
/// `if in[sel] { in[then] ^ then_neg } else { in[els] ^ else_neg }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxForm {
    pub sel: u8,
    pub then: u8,
    pub els: u8,
    pub then_neg: bool,
    pub else_neg: bool,
}

impl MuxForm {
    /// The 16 bit table this form represents
    pub fn table(self) -> u16 {
        let s = PROJ[self.sel as usize] as u16;
        let mut t = PROJ[self.then as usize] as u16;
        let mut e = PROJ[self.els as usize] as u16;
        if self.then_neg {
            t = !t;
        }
        if self.else_neg {
            e = !e;
        }
        (s & t) | (!s & e)
    }
}

// sorted by table, inversion of the output and of the selector are covered by
// the data negations and the exchange of `then` and `els`
static MUX_TABLE: Lazy<Vec<(u16, MuxForm)>> = Lazy::new(|| {
    let mut v = vec![];
    for sel in 0..4u8 {
        for then in 0..4u8 {
            if then == sel {
                continue
            }
            for els in 0..4u8 {
                if (els == sel) || (els == then) {
                    continue
                }
                for negs in 0..4u8 {
                    let form = MuxForm {
                        sel,
                        then,
                        els,
                        then_neg: (negs & 1) != 0,
                        else_neg: (negs & 2) != 0,
                    };
                    v.push((form.table(), form));
                }
            }
        }
    }
    v.sort_by_key(|(table, _)| *table);
    v.dedup_by_key(|(table, _)| *table);
    v
});

/// If the four input table is in the 2:1 multiplexer NPN class, returns the
/// way it realizes one
pub fn mux_form(table: u16) -> Option<MuxForm> {
    MUX_TABLE
        .binary_search_by_key(&table, |(t, _)| *t)
        .ok()
        .map(|i| MUX_TABLE[i].1)
}

/// Returns if the four input table is a 2:1 multiplexer up to input and output
/// negation and input permutation
pub fn is_mux_class(table: u16) -> bool {
    mux_form(table).is_some()
}
