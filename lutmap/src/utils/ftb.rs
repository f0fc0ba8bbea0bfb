//! Helpers for function tables ("FTBs") of up to 6 variables stored as full
//! 64 bit words. Row `r` of a table is the output for the assignment where
//! variable `i` is bit `i` of `r`. Functions of fewer variables are stored
//! with the unused upper variables being irrelevant, so no masking is ever
//! needed.

use awint::awint_dag::smallvec::SmallVec;

/// The projection tables, `PROJ[i]` is the function that returns variable `i`
pub const PROJ: [u64; 6] = [
    0xaaaa_aaaa_aaaa_aaaa,
    0xcccc_cccc_cccc_cccc,
    0xf0f0_f0f0_f0f0_f0f0,
    0xff00_ff00_ff00_ff00,
    0xffff_0000_ffff_0000,
    0xffff_ffff_0000_0000,
];

// the rows where variable `i` is zero
const M: [u64; 6] = [
    0x5555_5555_5555_5555,
    0x3333_3333_3333_3333,
    0x0f0f_0f0f_0f0f_0f0f,
    0x00ff_00ff_00ff_00ff,
    0x0000_ffff_0000_ffff,
    0x0000_0000_ffff_ffff,
];

const R0: [u64; 5] = [
    0x2222_2222_2222_2222,
    0x0a0a_0a0a_0a0a_0a0a,
    0x00aa_00aa_00aa_00aa,
    0x0000_aaaa_0000_aaaa,
    0x0000_0000_aaaa_aaaa,
];
const R1: [u64; 5] = [
    0x4444_4444_4444_4444,
    0x5050_5050_5050_5050,
    0x5500_5500_5500_5500,
    0x5555_0000_5555_0000,
    0x5555_5555_0000_0000,
];
const R2: [u64; 5] = [
    0x9999_9999_9999_9999,
    0xa5a5_a5a5_a5a5_a5a5,
    0xaa55_aa55_aa55_aa55,
    0xaaaa_5555_aaaa_5555,
    0xaaaa_aaaa_5555_5555,
];

/// Returns if the function depends on variable `i`
pub fn in_support(ftb: u64, i: usize) -> bool {
    debug_assert!(i < 6);
    ((ftb ^ (ftb >> (1 << i))) & M[i]) != 0
}

// Exchanges variable `i` with variable 0, assumes `0 < i < 6`
fn basis_swap(ftb: u64, i: usize) -> u64 {
    debug_assert!((i > 0) && (i < 6));
    let s = (1 << i) - 1;
    // rows move left, right, or stay in place
    ((ftb & R0[i - 1]) << s) | ((ftb & R1[i - 1]) >> s) | (ftb & R2[i - 1])
}

/// Exchanges variables `i` and `j` of the function
pub fn swap(ftb: u64, i: usize, j: usize) -> u64 {
    if i == j {
        return ftb
    }
    match (i == 0, j == 0) {
        (true, true) => ftb,
        (true, false) => basis_swap(ftb, j),
        (false, true) => basis_swap(ftb, i),
        (false, false) => basis_swap(basis_swap(basis_swap(ftb, i), j), i),
    }
}

/// Moves the variables among the first `n` that the function depends on down
/// to positions `0..k` while keeping their relative order. Returns the new
/// table and the original positions of the kept variables.
pub fn compact_support(mut ftb: u64, n: usize) -> (u64, SmallVec<[usize; 6]>) {
    debug_assert!(n <= 6);
    let mut kept = SmallVec::new();
    for i in 0..n {
        if in_support(ftb, i) {
            let k = kept.len();
            // positions `k..i` only contain irrelevant variables at this point
            ftb = swap(ftb, k, i);
            kept.push(i);
        }
    }
    (ftb, kept)
}

/// Looks up a row for every bit position of the inputs in parallel. `table`
/// has `1 << inputs.len()` significant bits.
pub fn table_lookup(table: u64, inputs: &[u64]) -> u64 {
    debug_assert!(inputs.len() <= 6);
    let mut res = 0u64;
    for bit in 0..64 {
        let mut row = 0usize;
        for (i, inp) in inputs.iter().enumerate() {
            row |= (((inp >> bit) & 1) as usize) << i;
        }
        res |= ((table >> row) & 1) << bit;
    }
    res
}

/// Replicates the low `1 << n` bits of a table across the full word
pub fn expand(table: u64, n: usize) -> u64 {
    debug_assert!(n <= 6);
    let mut res = table;
    let mut w = 1 << n;
    if w < 64 {
        res &= (1u64 << w) - 1;
    }
    while w < 64 {
        res |= res << w;
        w <<= 1;
    }
    res
}
