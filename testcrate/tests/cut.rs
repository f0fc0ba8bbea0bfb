use std::collections::BTreeSet;

use lutmap::{
    mapper::{insert_cut, Cut, MAX_CUT},
    LutMapper, MapParams, NodeId,
};
use testcrate::{random_network, NetConfig, StarRng};

#[cfg(debug_assertions)]
const N: usize = 30;

#[cfg(not(debug_assertions))]
const N: usize = 300;

fn random_cut(rng: &mut StarRng, max_id: usize) -> Cut {
    let size = 1 + rng.index(MAX_CUT);
    let leaves: Vec<NodeId> = (0..size).map(|_| NodeId::new(1 + rng.index(max_id))).collect();
    Cut::from_leaves(&leaves).unwrap()
}

fn leaf_set(cut: &Cut) -> BTreeSet<NodeId> {
    cut.leaves().iter().copied().collect()
}

fn assert_valid(cut: &Cut) {
    assert!(cut.size() <= MAX_CUT);
    for w in cut.leaves().windows(2) {
        assert!(w[0] < w[1], "{cut:?}");
    }
    let mut abstr = 0u32;
    for leaf in cut.leaves() {
        abstr |= 1 << (leaf.0 & 31);
        assert!(cut.contains(*leaf));
    }
    assert_eq!(cut.abstr(), abstr);
}

#[test]
fn cut_basics() {
    let cut = Cut::from_leaves(&[NodeId(7), NodeId(3), NodeId(7), NodeId(40)]).unwrap();
    assert_eq!(cut.leaves(), &[NodeId(3), NodeId(7), NodeId(40)]);
    assert_valid(&cut);
    // 40 and 8 share an abstraction bit
    assert!(!cut.contains(NodeId(8)));
    assert!(Cut::empty().is_empty());
    assert!(Cut::from_leaves(&(1..=7).map(NodeId).collect::<Vec<_>>()).is_none());
    assert!(Cut::from_leaves(&(1..=6).map(NodeId).collect::<Vec<_>>()).is_some());
    assert!(Cut::empty().subsumes(&cut));
    assert!(!cut.subsumes(&Cut::trivial(NodeId(3))));
}

#[test]
fn cut_combine() {
    let mut rng = StarRng::new(0);
    for _ in 0..(N * 100) {
        // small id ranges force overlaps, large ones exercise the abstraction
        let max_id = if rng.next_bool() { 10 } else { 100 };
        let a = random_cut(&mut rng, max_id);
        let b = random_cut(&mut rng, max_id);
        assert_valid(&a);
        assert_valid(&b);
        let union: BTreeSet<NodeId> = leaf_set(&a).union(&leaf_set(&b)).copied().collect();
        match a.combine(&b) {
            Some(c) => {
                assert_valid(&c);
                assert_eq!(leaf_set(&c), union);
                assert!(a.subsumes(&c));
                assert!(b.subsumes(&c));
                assert_eq!(c, b.combine(&a).unwrap());
            }
            None => assert!(union.len() > MAX_CUT, "{a:?} {b:?}"),
        }
        let is_subset = leaf_set(&a).is_subset(&leaf_set(&b));
        assert_eq!(a.subsumes(&b), is_subset, "{a:?} {b:?}");
    }
}

#[test]
fn cut_insert() {
    let mut rng = StarRng::new(1);
    for _ in 0..N {
        let mut cuts = vec![];
        let mut inserted = vec![];
        for _ in 0..40 {
            let mut cut = random_cut(&mut rng, 12);
            if cut.size() < 2 {
                cut = cut.combine(&Cut::trivial(NodeId(13))).unwrap();
            }
            assert!(insert_cut(&mut cuts, cut));
            inserted.push(cut);
            // no cut is a subset of another
            for i in 0..cuts.len() {
                for j in 0..cuts.len() {
                    if i != j {
                        assert!(!cuts[i].subsumes(&cuts[j]), "{:?} {:?}", cuts[i], cuts[j]);
                    }
                }
            }
        }
        // everything inserted is covered by a stored subset
        for cut in &inserted {
            assert!(cuts.iter().any(|c| c.subsumes(cut)), "{cut:?}");
        }
    }

    // at most one leaf replaces everything and stops enumeration
    let mut cuts = vec![
        Cut::from_leaves(&[NodeId(1), NodeId(2)]).unwrap(),
        Cut::from_leaves(&[NodeId(3), NodeId(4)]).unwrap(),
    ];
    assert!(!insert_cut(&mut cuts, Cut::trivial(NodeId(5))));
    assert_eq!(cuts, vec![Cut::trivial(NodeId(5))]);

    // multiplexer cuts do not take part in subsumption
    let mut mux = Cut::from_leaves(&[NodeId(1), NodeId(2), NodeId(3)]).unwrap();
    mux.mux_depth = 1;
    let mut cuts = vec![mux];
    assert!(insert_cut(
        &mut cuts,
        Cut::from_leaves(&[NodeId(1), NodeId(2)]).unwrap()
    ));
    assert!(insert_cut(
        &mut cuts,
        Cut::from_leaves(&[NodeId(1), NodeId(2), NodeId(3), NodeId(4)]).unwrap()
    ));
    assert_eq!(cuts.len(), 2);
    assert!(cuts[0].is_mux());
}

#[test]
fn cut_lists_after_enumeration() {
    let mut rng = StarRng::new(2);
    for i in 0..N {
        let mut net = random_network(&mut rng, &NetConfig::default());
        let params = MapParams {
            use_fmux: (i % 2) == 1,
            quiet: true,
            ..Default::default()
        };
        let mut mapper = LutMapper::new(&mut net, &params, None).unwrap();
        mapper.generate_all().unwrap();
        for (id, kind) in mapper.net().iter() {
            let cuts = &mapper.cutmap[id.inx()];
            if !kind.is_logic() {
                assert!(cuts.is_empty());
                continue
            }
            assert!(!cuts.is_empty());
            assert!(cuts.len() <= params.cuts_per_node);
            assert!(cuts.iter().filter(|cut| cut.is_mux()).count() <= 1);
            for cut in cuts {
                assert_valid(cut);
                assert!(!cut.contains(id));
                for leaf in cut.leaves() {
                    assert!(*leaf < id);
                    assert_ne!(*leaf, NodeId::TRUE);
                }
            }
            for a in cuts.iter().filter(|cut| !cut.is_mux()) {
                for b in cuts.iter().filter(|cut| !cut.is_mux()) {
                    if a != b {
                        assert!(!a.subsumes(b), "{id:?}: {a:?} {b:?}");
                    }
                }
            }
        }
    }
}
