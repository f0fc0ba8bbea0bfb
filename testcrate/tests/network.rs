use lutmap::{
    network::{lit_value, Remap},
    Error, Lit, Network, NodeId, NodeKind,
};
use testcrate::{check_equivalence, random_network, NetConfig, StarRng};

#[cfg(debug_assertions)]
const N: usize = 20;

#[cfg(not(debug_assertions))]
const N: usize = 200;

#[test]
fn network_lits() {
    let id = NodeId(3);
    let lit = id.lit();
    assert_eq!(lit.id(), id);
    assert!(!lit.sign());
    assert!((!lit).sign());
    assert_eq!(!!lit, lit);
    assert_eq!((!lit).unsigned(), lit);
    assert_eq!(lit ^ true, !lit);
    assert_eq!(!Lit::TRUE, Lit::FALSE);
    assert_eq!(Lit::FALSE.id(), NodeId::TRUE);
    assert_eq!(format!("{:?}", !lit), "~n3");
    assert_eq!(lit_value(&[0, 0, 0, 0b01], !lit) & 0b11, 0b10);
}

#[test]
fn network_construction() {
    let mut net = Network::new();
    assert_eq!(net.len(), 1);
    assert!(matches!(net.kind(NodeId::TRUE), NodeKind::Const));
    let a = net.add_pi();
    let f = net.add_ff();
    let x = net.add_and(a, !f);
    let d = net.add_delay(x, 12);
    net.add_seq(d);
    let po = net.add_po(!x);
    assert!(net.is_canonical());
    net.verify_integrity().unwrap();
    assert_eq!(net.sources(), vec![NodeId::TRUE, a.id(), f.id()]);
    assert_eq!(net.sinks().len(), 2);
    let fanouts = net.fanout_counts();
    assert_eq!(fanouts[x.id().inx()], 2);
    assert_eq!(fanouts[po.inx()], 0);
    assert_eq!(net.kind(d.id()).edge_delay(), 1.5);
    assert_eq!(net.down_order().first(), Some(&po));

    let values = net
        .simulate(|id| if id == a.id() { 0b1100 } else { 0b1010 })
        .unwrap();
    assert_eq!(values[po.inx()] & 0b1111, 0b1011);

    net.remove(x.id());
    assert!(!net.is_canonical());
    assert!(matches!(
        net.verify_integrity(),
        Err(Error::DanglingOperand(..))
    ));
    assert!(net.simulate(|_| 0).is_err());
}

#[test]
fn network_compaction() {
    let mut rng = StarRng::new(0);
    for _ in 0..N {
        let mut net = random_network(&mut rng, &NetConfig::default());
        let orig = net.clone();
        let compaction = net.compact().unwrap();
        assert!(net.is_canonical());
        assert!(net.len() <= orig.len());
        let remap = Remap::from_compaction(&compaction);
        check_equivalence(&orig, &net, &remap, &mut rng, 2).unwrap();
        // sources and sinks always survive, dangling logic never does
        let fanouts = net.fanout_counts();
        for (id, kind) in net.iter() {
            if kind.is_logic() || kind.is_pass_through() {
                assert!(fanouts[id.inx()] > 0);
            }
        }
        assert_eq!(net.sources().len(), orig.sources().len());
        assert_eq!(net.sinks().len(), orig.sinks().len());
        // compacting again changes nothing
        let again = net.clone();
        let compaction = net.compact().unwrap();
        assert_eq!(net, again);
        for (i, id) in compaction.map.iter().enumerate() {
            assert_eq!(*id, Some(NodeId::new(i)));
        }
    }

    // cycles are rejected
    let mut net = Network::new();
    let a = net.add_pi();
    let x = net.add_and(a, a);
    let y = net.add_and(x, a);
    net.add_po(y);
    net.set_kind(x.id(), NodeKind::And([a, y]));
    assert!(net.compact().is_err());
}

#[test]
fn network_remap() {
    let mut remap = Remap::identity(4);
    assert_eq!(remap.len(), 4);
    remap.set(NodeId(2), Some(!NodeId(1).lit()));
    remap.set(NodeId(3), None);
    remap.set(NodeId(5), Some(NodeId(2).lit()));
    assert_eq!(remap.len(), 6);
    assert_eq!(remap.get(NodeId(4)), None);
    assert_eq!(remap.lit(!NodeId(2).lit()), Some(NodeId(1).lit()));

    let mut later = Remap::default();
    later.set(NodeId(0), Some(NodeId(0).lit()));
    later.set(NodeId(1), Some(!NodeId(7).lit()));
    later.set(NodeId(2), Some(NodeId(8).lit()));
    remap.compose(&later);
    assert_eq!(remap.get(NodeId(0)), Some(NodeId(0).lit()));
    assert_eq!(remap.get(NodeId(1)), Some(!NodeId(7).lit()));
    // the inversions cancel
    assert_eq!(remap.get(NodeId(2)), Some(NodeId(7).lit()));
    assert_eq!(remap.get(NodeId(3)), None);
    assert_eq!(remap.get(NodeId(5)), Some(NodeId(8).lit()));
}
