use proptest::prelude::*;
use rp_flow::{
    Heterogeneity, LorenzMethod, RadialFlow, darcy_gas, flow_fraction, gas_rate_radial,
    lorenz_from_b, lorenz_from_flow_fraction, lorenz_to_b, oil_rate_radial,
};
use rp_gas::{GasModel, ZMethod};

#[test]
fn gas_rate_sequence_keeps_order_and_sign() {
    let gas = GasModel::hydrocarbon(0.7).unwrap().resolve().unwrap();
    let flow = RadialFlow::new(2.0, 30.0, 0.35, 1200.0);
    let pwf = vec![500.0, 1000.0, 1500.0, 2000.0, 2500.0];
    let q = gas_rate_radial(&gas, &flow, 2000.0, pwf, 180.0).unwrap();
    let q = q.as_slice();
    assert_eq!(q.len(), 5);
    assert!(q.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(q[3], 0.0);
    assert!(q[4] < 0.0);
}

#[test]
fn gas_rate_uses_the_configured_z_engine() {
    let flow = RadialFlow::new(2.0, 30.0, 0.35, 1200.0);
    let dak = GasModel::hydrocarbon(0.7).unwrap().resolve().unwrap();
    let hy = dak.with_z_method(ZMethod::NewtonRaphson);
    let q_dak = gas_rate_radial(&dak, &flow, 3000.0, 1000.0, 180.0).unwrap();
    let q_hy = gas_rate_radial(&hy, &flow, 3000.0, 1000.0, 180.0).unwrap();
    let (a, b) = (q_dak.into_scalar().unwrap(), q_hy.into_scalar().unwrap());
    assert!(a != b);
    assert!((a - b).abs() / a < 0.02);
}

#[test]
fn vogel_never_exceeds_darcy() {
    let flow = RadialFlow::new(20.0, 20.0, 0.3, 1500.0).with_skin(1.0);
    let pwf: Vec<f64> = (0..15).map(|i| 100.0 * i as f64).collect();
    let darcy = oil_rate_radial(&flow, 1500.0, pwf.clone(), 0.5, 1.2, None).unwrap();
    let vogel = oil_rate_radial(&flow, 1500.0, pwf, 0.5, 1.2, Some(2000.0)).unwrap();
    for (d, v) in darcy.iter().zip(vogel.iter()) {
        assert!(v <= d, "vogel {v} darcy {d}");
    }
}

#[test]
fn non_darcy_rate_satisfies_its_quadratic() {
    let d = 5e-4;
    let flow = RadialFlow::new(3.0, 40.0, 0.3, 1500.0).with_non_darcy(d);
    let delta_mp = 3e8;
    let q = darcy_gas(delta_mp, &flow, 200.0);
    let b = 1422.0 * 660.0;
    let c = (1500.0f64 / 0.3).ln() - 0.75;
    let residual = b * d * q * q + b * c * q - 3.0 * 40.0 * delta_mp;
    assert!(residual.abs() < 1e-6 * 3.0 * 40.0 * delta_mp);
}

#[test]
fn lorenz_helpers_agree() {
    let method = LorenzMethod::Exponential;
    let b = lorenz_to_b(0.6, method).unwrap();
    let f = flow_fraction(0.25, method, Heterogeneity::B(b))
        .unwrap()
        .into_scalar()
        .unwrap();
    let l = lorenz_from_flow_fraction(f, 0.25, method).unwrap();
    assert!((l - 0.6).abs() < 1e-5, "L = {l}");
}

proptest! {
    #[test]
    fn lorenz_round_trip(lorenz in 0.001f64..0.99, lang in any::<bool>()) {
        let method = if lang { LorenzMethod::Langmuir } else { LorenzMethod::Exponential };
        let b = lorenz_to_b(lorenz, method).unwrap();
        prop_assert!((lorenz_from_b(b, method) - lorenz).abs() <= 1e-7);
    }

    #[test]
    fn flow_fraction_is_monotone(b in 0.01f64..100.0, lang in any::<bool>()) {
        let method = if lang { LorenzMethod::Langmuir } else { LorenzMethod::Exponential };
        let x: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        let f = flow_fraction(x, method, Heterogeneity::B(b)).unwrap();
        let f = f.as_slice();
        prop_assert!(f.windows(2).all(|w| w[1] > w[0]));
        prop_assert!(f.iter().all(|v| (-1e-12..=1.0 + 1e-9).contains(v)));
    }
}
