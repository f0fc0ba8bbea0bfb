#![feature(test)]

extern crate test;
use lutmap::{map, LutMapper, MapParams};
use test::Bencher;
use testcrate::{and_chain, random_network, NetConfig, StarRng};

fn quiet() -> MapParams {
    MapParams {
        quiet: true,
        ..Default::default()
    }
}

#[bench]
fn map_and_chain(bencher: &mut Bencher) {
    let (net, _) = and_chain(200);
    let params = quiet();
    bencher.iter(|| {
        let mut net = net.clone();
        let stats = map(&mut net, &params, None).unwrap();
        assert_eq!(stats.n_mux, 0);
    })
}

#[bench]
fn map_random(bencher: &mut Bencher) {
    let mut rng = StarRng::new(0);
    let config = NetConfig {
        n_pi: 32,
        n_gates: 2000,
        n_po: 32,
        ..Default::default()
    };
    let net = random_network(&mut rng, &config);
    let params = quiet();
    bencher.iter(|| {
        let mut net = net.clone();
        map(&mut net, &params, None).unwrap();
    })
}

#[bench]
fn map_random_fmux(bencher: &mut Bencher) {
    let mut rng = StarRng::new(1);
    let config = NetConfig {
        n_pi: 32,
        n_gates: 2000,
        n_po: 32,
        lut4_chance: 4,
        mux_chance: 6,
        ..Default::default()
    };
    let net = random_network(&mut rng, &config);
    let params = MapParams {
        use_fmux: true,
        ..quiet()
    };
    bencher.iter(|| {
        let mut net = net.clone();
        map(&mut net, &params, None).unwrap();
    })
}

#[bench]
fn enumerate_cuts(bencher: &mut Bencher) {
    let mut rng = StarRng::new(2);
    let config = NetConfig {
        n_pi: 32,
        n_gates: 2000,
        n_po: 32,
        ..Default::default()
    };
    let net = random_network(&mut rng, &config);
    let params = quiet();
    bencher.iter(|| {
        let mut net = net.clone();
        let mut mapper = LutMapper::new(&mut net, &params, None).unwrap();
        mapper.generate_all().unwrap();
    })
}
