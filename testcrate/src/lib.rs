//! Network generators and checks shared by the tests and benches

use lutmap::{
    network::Remap,
    utils::{mux_form, MuxForm},
    Lit, Network, NodeId,
};
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro128StarStar,
};

/// A deterministic psuedo-random-number-generator. Is a wrapper around
/// `Xoshiro128StarStar` that buffers rng calls down to the bit level
#[derive(Debug)]
pub struct StarRng {
    rng: Xoshiro128StarStar,
    buf: u64,
    // invariant: `used < 64` and indicates the number of bits used out of `buf`
    used: u8,
}

impl StarRng {
    pub fn new(seed: u64) -> Self {
        let mut rng = Xoshiro128StarStar::seed_from_u64(seed);
        let buf = rng.next_u64();
        Self { rng, buf, used: 0 }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    pub fn next_bool(&mut self) -> bool {
        let res = (self.buf >> self.used) & 1 != 0;
        self.used += 1;
        if self.used >= 64 {
            self.buf = self.rng.next_u64();
            self.used = 0;
        }
        res
    }

    /// Fractional chance of the output being true.
    ///
    /// If `num` is zero, it will always return `false`.
    /// If `num` is equal to or larger than 8, it will always return `true`.
    pub fn out_of_8(&mut self, num: u8) -> bool {
        let mut tmp = 0u8;
        for i in 0..3 {
            tmp |= u8::from(self.next_bool()) << i;
        }
        num > tmp
    }

    /// A uniform index into a collection of length `len`, which must be
    /// nonzero
    pub fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % (len as u64)) as usize
    }
}

/// Configuration of [random_network]
#[derive(Debug, Clone, Copy)]
pub struct NetConfig {
    pub n_pi: usize,
    pub n_ff: usize,
    pub n_gates: usize,
    pub n_po: usize,
    /// Out of 8 chance of a gate being a `Lut4` instead of an `And`
    pub lut4_chance: u8,
    /// Out of 8 chance of a `Lut4` having a multiplexer table
    pub mux_chance: u8,
    /// Out of 8 chance of putting a `Bar`, `Sel`, or `Delay` after a gate
    pub pass_chance: u8,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            n_pi: 8,
            n_ff: 2,
            n_gates: 60,
            n_po: 6,
            lut4_chance: 2,
            mux_chance: 4,
            pass_chance: 1,
        }
    }
}

/// Generates a random canonical network. Operands are biased toward recent
/// signals so that the depth grows with the number of gates.
pub fn random_network(rng: &mut StarRng, config: &NetConfig) -> Network {
    let mut net = Network::new();
    let mut signals: Vec<Lit> = vec![];
    for _ in 0..config.n_pi {
        signals.push(net.add_pi());
    }
    for _ in 0..config.n_ff {
        signals.push(net.add_ff());
    }
    let mut pick = |rng: &mut StarRng, signals: &[Lit]| -> Lit {
        let len = signals.len();
        let i = if rng.next_bool() {
            len - 1 - rng.index(len.min(8))
        } else {
            rng.index(len)
        };
        signals[i] ^ rng.next_bool()
    };
    for _ in 0..config.n_gates {
        let lit = if rng.out_of_8(config.lut4_chance) {
            let mut inp = [Lit::FALSE; 4];
            // sometimes leave an input tied off
            let n = if rng.next_bool() { 4 } else { 3 };
            for lit in inp.iter_mut().take(n) {
                *lit = pick(rng, &signals);
            }
            let table = if rng.out_of_8(config.mux_chance) {
                random_mux_table(rng, n)
            } else {
                rng.next_u32() as u16
            };
            net.add_lut4(inp, table)
        } else {
            let a = pick(rng, &signals);
            let b = pick(rng, &signals);
            net.add_and(a, b)
        };
        let lit = if rng.out_of_8(config.pass_chance) {
            match rng.index(3) {
                0 => net.add_bar(lit),
                1 => net.add_sel(lit),
                _ => net.add_delay(lit, (rng.next_u32() % 16) + 1),
            }
        } else {
            lit
        };
        signals.push(lit);
    }
    let n_signals = signals.len();
    for i in 0..config.n_po {
        // the last gates are always used so not too much is dangling
        let lit = if i < 2 {
            signals[n_signals - 1 - i]
        } else {
            pick(rng, &signals)
        };
        net.add_po(lit);
    }
    for _ in 0..config.n_ff {
        let lit = pick(rng, &signals);
        net.add_seq(lit);
    }
    net
}

/// A random multiplexer table over the first `n` inputs
pub fn random_mux_table(rng: &mut StarRng, n: usize) -> u16 {
    loop {
        let sel = rng.index(n) as u8;
        let then = rng.index(n) as u8;
        let els = rng.index(n) as u8;
        if (sel == then) || (sel == els) || (then == els) {
            continue
        }
        let form = MuxForm {
            sel,
            then,
            els,
            then_neg: rng.next_bool(),
            else_neg: rng.next_bool(),
        };
        let table = form.table();
        debug_assert!(mux_form(table).is_some());
        return table
    }
}

/// A chain of `n_and` ANDs over `n_and + 1` inputs, with a single output.
/// Returns the network and the AND outputs in order.
pub fn and_chain(n_and: usize) -> (Network, Vec<Lit>) {
    let mut net = Network::new();
    let inputs: Vec<Lit> = (0..=n_and).map(|_| net.add_pi()).collect();
    let mut ands = vec![];
    let mut acc = inputs[0];
    for inp in &inputs[1..] {
        acc = net.add_and(acc, *inp);
        ands.push(acc);
    }
    net.add_po(acc);
    (net, ands)
}

/// Checks that `mapped` computes the same sink values as `orig` for random
/// source assignments, with `remap` mapping ids of `orig` to `mapped`
pub fn check_equivalence(
    orig: &Network,
    mapped: &Network,
    remap: &Remap,
    rng: &mut StarRng,
    n_words: usize,
) -> Result<(), String> {
    for _ in 0..n_words {
        let mut words = vec![0u64; orig.len()];
        let mut mapped_words = vec![0u64; mapped.len()];
        for (id, kind) in orig.iter() {
            if kind.is_source() && (id != NodeId::TRUE) {
                let word = rng.next_u64();
                words[id.inx()] = word;
                let lit = remap
                    .get(id)
                    .ok_or_else(|| format!("source {id:?} was lost in mapping"))?;
                mapped_words[lit.id().inx()] = if lit.sign() { !word } else { word };
            }
        }
        let orig_values = orig
            .simulate(|id| words[id.inx()])
            .map_err(|e| e.to_string())?;
        let mapped_values = mapped
            .simulate(|id| mapped_words[id.inx()])
            .map_err(|e| e.to_string())?;
        for (id, kind) in orig.iter() {
            if !kind.is_sink() {
                continue
            }
            let lit = remap
                .get(id)
                .ok_or_else(|| format!("sink {id:?} was lost in mapping"))?;
            let expected = orig_values[id.inx()];
            let mut found = mapped_values[lit.id().inx()];
            if lit.sign() {
                found = !found;
            }
            if expected != found {
                return Err(format!(
                    "sink {id:?} (mapped to {lit:?}) differs: expected {expected:016x} found \
                     {found:016x}"
                ))
            }
        }
    }
    Ok(())
}
