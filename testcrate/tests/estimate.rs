use lutmap::{mapper::blend_alpha, Lit, LutMapper, MapParams, Network, NodeId};
use testcrate::{random_network, NetConfig, StarRng};

#[cfg(debug_assertions)]
const N: usize = 20;

#[cfg(not(debug_assertions))]
const N: usize = 200;

#[test]
fn blend_weights() {
    assert_eq!(blend_alpha(0, false), 1.0 - 1.0 / 3.0);
    assert_eq!(blend_alpha(1, false), 1.0 - 1.0 / 18.0);
    assert_eq!(blend_alpha(2, false), 1.0 - 1.0 / 83.0);
    // the probe round does not count
    assert_eq!(blend_alpha(1, true), blend_alpha(0, false));
    assert_eq!(blend_alpha(2, true), blend_alpha(1, false));
    for round in 0..10 {
        let alpha = blend_alpha(round, false);
        assert!((alpha > 0.0) && (alpha < 1.0));
        assert!(alpha <= blend_alpha(round + 1, false));
    }
}

// A 6 input AND tree `s` shared by two outputs
fn shared_network() -> (Network, Lit) {
    let mut net = Network::new();
    let inputs: Vec<Lit> = (0..8).map(|_| net.add_pi()).collect();
    let ab = net.add_and(inputs[0], inputs[1]);
    let cd = net.add_and(inputs[2], inputs[3]);
    let ef = net.add_and(inputs[4], inputs[5]);
    let abcd = net.add_and(ab, cd);
    let s = net.add_and(abcd, ef);
    let o1 = net.add_and(s, inputs[6]);
    let o2 = net.add_and(s, inputs[7]);
    net.add_po(o1);
    net.add_po(o2);
    (net, s)
}

#[test]
fn fanout_estimates_converge() {
    let _ = env_logger::builder().is_test(true).try_init();
    for seed in [1.0f32, 10.0] {
        let (mut net, s) = shared_network();
        let params = MapParams::default();
        let mut mapper = LutMapper::new(&mut net, &params, None).unwrap();
        mapper.fanout_est[s.id().inx()] = seed;
        for _ in 0..3 {
            assert!(mapper.step().unwrap());
        }
        assert_eq!(mapper.fanouts[s.id().inx()], 2);
        let est = mapper.fanout_est[s.id().inx()];
        assert!((est - 2.0).abs() < 0.01, "seed {seed} ended at {est}");
        assert!(!mapper.step().unwrap());
        assert_eq!(mapper.stats.n_lut6, 3);
    }
}

// checks the relations between the active set, exact fanouts, and departures
fn check_estimates(mapper: &LutMapper, refined: bool) {
    let net = mapper.net();
    let mut fanouts = vec![0u32; net.len()];
    let mut area = 0.0f32;
    let mut delay = 0.0f32;
    for (id, kind) in net.iter() {
        let inx = id.inx();
        if kind.is_sink() {
            assert!(mapper.active[inx]);
        }
        if kind.is_source() {
            delay = delay.max(mapper.depart[inx]);
            continue
        }
        if kind.is_logic() {
            if !mapper.active[inx] {
                continue
            }
            let cut = mapper.cutmap[inx][0];
            area += mapper.params.cut_area(cut.size(), cut.mux_depth);
            assert!(mapper.depart[inx].is_finite());
            for leaf in cut.leaves() {
                fanouts[leaf.inx()] += 1;
                assert!(mapper.active[leaf.inx()], "{id:?} {leaf:?}");
                if !cut.is_mux() {
                    assert!(mapper.depart[leaf.inx()] >= mapper.depart[inx] + 1.0);
                }
            }
        } else if mapper.active[inx] {
            for lit in kind.operands() {
                fanouts[lit.id().inx()] += 1;
            }
        }
    }
    for (id, kind) in net.iter() {
        // refinement leaves the counts of non-logic nodes as they were
        if kind.is_logic() || !refined {
            assert_eq!(fanouts[id.inx()], mapper.fanouts[id.inx()], "{id:?} {kind:?}");
        }
    }
    assert_eq!(delay, mapper.mapped_delay);
    assert!((area - mapper.mapped_area).abs() < 1e-3);
}

#[test]
fn active_set_and_departures() {
    let mut rng = StarRng::new(0);
    for i in 0..N {
        let mut net = random_network(&mut rng, &NetConfig::default());
        let params = MapParams {
            use_fmux: (i % 2) == 1,
            use_ela: (i % 4) < 2,
            quiet: true,
            ..Default::default()
        };
        let mut mapper = LutMapper::new(&mut net, &params, None).unwrap();
        for _ in 0..mapper.last_round() {
            mapper.generate_all().unwrap();
            mapper.update_fanout_est(false).unwrap();
            check_estimates(&mapper, (mapper.round > 0) && params.use_ela);
            // every mapped delay is at least the delay target of later rounds
            assert!(mapper.mapped_delay >= 0.0);
            for (id, kind) in mapper.net().iter() {
                if kind.is_logic() {
                    assert!(mapper.fanout_est[id.inx()] >= 1.0);
                    assert!(mapper.depart[id.inx()].is_finite() || !mapper.active[id.inx()]);
                }
            }
            mapper.round += 1;
            if mapper.round == 1 {
                mapper.target_arrival = mapper.mapped_delay;
            }
        }
    }
}

#[test]
fn inactive_logic_is_backfilled() {
    let mut net = Network::new();
    let a = net.add_pi();
    let b = net.add_pi();
    let c = net.add_pi();
    let x = net.add_and(a, b);
    let y = net.add_and(x, c);
    net.add_po(y);
    let params = MapParams {
        quiet: true,
        ..Default::default()
    };
    let mut mapper = LutMapper::new(&mut net, &params, None).unwrap();
    mapper.generate_all().unwrap();
    mapper.update_fanout_est(false).unwrap();
    // `y` covers `x` with the cut `{a, b, c}`
    assert_eq!(mapper.cutmap[y.id().inx()][0].size(), 3);
    assert!(!mapper.active[x.id().inx()]);
    assert_eq!(mapper.depart[x.id().inx()], mapper.depart[y.id().inx()]);
    assert_eq!(mapper.fanouts[x.id().inx()], 0);
    assert_eq!(mapper.mapped_delay, 1.0);
    assert_eq!(mapper.mapped_area, 1.0);
    assert_eq!(mapper.fanouts[NodeId::new(1).inx()], 1);
}
