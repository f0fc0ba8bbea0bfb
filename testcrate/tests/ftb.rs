use lutmap::{
    mapper::{compute_ftb, FtbMemo},
    utils::{compact_support, expand, in_support, is_mux_class, mux_form, swap, table_lookup, PROJ},
    LutMapper, MapParams, NodeId,
};
use testcrate::{random_network, NetConfig, StarRng};

#[cfg(debug_assertions)]
const N: usize = 20;

#[cfg(not(debug_assertions))]
const N: usize = 200;

#[test]
fn ftb_projections() {
    for i in 0..6 {
        for j in 0..6 {
            assert_eq!(in_support(PROJ[i], j), i == j);
            assert_eq!(swap(PROJ[i], i, j), PROJ[j]);
            assert_eq!(swap(PROJ[j], i, j), PROJ[i]);
        }
    }
    assert_eq!(expand(0b10, 1), PROJ[0]);
    assert_eq!(expand(0b1000, 2), PROJ[0] & PROJ[1]);
    assert_eq!(expand(u64::MAX, 6), u64::MAX);
    assert!(!in_support(0, 3));
    assert!(!in_support(u64::MAX, 0));
}

#[test]
fn ftb_swap_and_compact() {
    let mut rng = StarRng::new(0);
    for _ in 0..(N * 50) {
        let ftb = rng.next_u64();
        let i = rng.index(6);
        let j = rng.index(6);
        let swapped = swap(ftb, i, j);
        assert_eq!(swap(swapped, i, j), ftb);
        // looking up with exchanged inputs gives the same function
        let mut inputs = PROJ;
        inputs.swap(i, j);
        assert_eq!(table_lookup(ftb, &inputs), swapped);

        // random functions of a few variables embedded among six
        let n = 1 + rng.index(6);
        let k = 1 + rng.index(n);
        let small = expand(rng.next_u64(), k);
        let mut positions: Vec<usize> = (0..n).collect();
        while positions.len() > k {
            positions.remove(rng.index(positions.len()));
        }
        let mut words = [0u64; 6];
        for (var, pos) in positions.iter().enumerate() {
            words[var] = PROJ[*pos];
        }
        let embedded = table_lookup(small, &words[..k]);
        let (compacted, kept) = compact_support(embedded, n);
        for var in kept.len()..6 {
            assert!(!in_support(compacted, var));
        }
        for pos in kept.iter() {
            assert!(positions.contains(pos));
            assert!(in_support(embedded, *pos));
        }
        // expanding the compacted function over the kept variables restores it
        let mut words = [0u64; 6];
        for (var, pos) in kept.iter().enumerate() {
            words[var] = PROJ[*pos];
        }
        assert_eq!(table_lookup(compacted, &words[..kept.len()]), embedded);
    }
}

#[test]
fn ftb_mux_class() {
    let mut n = 0;
    for table in 0..=u16::MAX {
        if let Some(form) = mux_form(table) {
            n += 1;
            assert_eq!(form.table(), table);
            assert!(is_mux_class(table));
            assert!((form.sel != form.then) && (form.sel != form.els) && (form.then != form.els));
        }
    }
    // 4 choices of select, 3 of then, 2 of else, and 4 negations
    assert_eq!(n, 96);
    // plain AND is not a multiplexer
    assert!(!is_mux_class((PROJ[0] & PROJ[1]) as u16));
    assert!(mux_form(0xcaca).is_some());
}

#[test]
fn ftb_matches_simulation() {
    let mut rng = StarRng::new(1);
    for i in 0..N {
        let mut net = random_network(&mut rng, &NetConfig::default());
        let params = MapParams {
            use_fmux: (i % 2) == 1,
            quiet: true,
            ..Default::default()
        };
        let mut mapper = LutMapper::new(&mut net, &params, None).unwrap();
        mapper.generate_all().unwrap();
        let net = mapper.net();
        let mut words = vec![0u64; net.len()];
        for word in words.iter_mut() {
            *word = rng.next_u64();
        }
        let values = net.simulate(|id| words[id.inx()]).unwrap();
        let mut memo = FtbMemo::new(net.len());
        let ids: Vec<NodeId> = net.ids().collect();
        for id in ids {
            if !net.kind(id).is_logic() {
                continue
            }
            for cut in &mapper.cutmap[id.inx()] {
                let ftb = compute_ftb(net, id.lit(), cut, &mut memo).unwrap();
                let leaf_words: Vec<u64> =
                    cut.leaves().iter().map(|leaf| values[leaf.inx()]).collect();
                assert_eq!(
                    table_lookup(ftb, &leaf_words),
                    values[id.inx()],
                    "{id:?} {cut:?}"
                );
                let inv = compute_ftb(net, !id.lit(), cut, &mut memo).unwrap();
                assert_eq!(inv, !ftb);
            }
        }
    }
}
