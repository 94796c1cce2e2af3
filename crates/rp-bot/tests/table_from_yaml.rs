//! Black-oil tables built from YAML requests.

use proptest::prelude::*;
use rp_bot::{BotRequest, COLUMNS, make_bot};
use rp_core::FailureKind;
use rp_oil::PbMethod;

const REQUEST: &str = r#"
pi: 4000
api: 35
degf: 200
sg_g: 0.75
pmax: 5000
pb: 3000
rsb: 800
"#;

#[test]
fn yaml_request_uses_defaults() {
    let request: BotRequest = serde_yaml::from_str(REQUEST).unwrap();
    assert_eq!(request.pmin, 14.7);
    assert_eq!(request.nrows, 20);
    assert_eq!(request.wt, 0.0);
    assert_eq!(request.ch4_sat, 0.0);

    let table = make_bot(&request).unwrap();
    assert_eq!(table.len(), 20);
    for header in COLUMNS {
        assert_eq!(table.column(header).unwrap().len(), 20, "{header}");
    }
}

#[test]
fn rsb_only_request_derives_bubble_point() {
    let request: BotRequest = serde_yaml::from_str(
        "pi: 4000\napi: 35\ndegf: 200\nsg_g: 0.75\npmax: 5000\nrsb: 800\n",
    )
    .unwrap();
    let table = make_bot(&request).unwrap();
    assert!((table.bubble_point.pb - 3292.964).abs() < 1e-2);
    assert_eq!(table.bubble_point.rsb_scale, 1.0);
    assert!(table.rows.iter().any(|row| row.pressure == table.bubble_point.pb));
}

#[test]
fn missing_bubble_point_data_is_rejected() {
    let request: BotRequest = serde_yaml::from_str(
        "pi: 4000\napi: 35\ndegf: 200\nsg_g: 0.75\npmax: 5000\npb: 0\n",
    )
    .unwrap();
    let err = make_bot(&request).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Configuration);
}

#[test]
fn unreachable_bubble_point_stops_at_iteration_limit() {
    let request = BotRequest::new(4000.0, 35.0, 200.0, 0.75, 9000.0)
        .with_bubble_point(8250.0)
        .with_solution_gor(800.0);
    let err = make_bot(&request).unwrap_err();
    assert_eq!(err.kind(), FailureKind::IterationLimit);
    assert!(!err.is_soft());
}

#[test]
fn saline_live_brine_changes_only_water_columns() {
    let base = BotRequest::new(4000.0, 35.0, 200.0, 0.75, 5000.0)
        .with_bubble_point(3000.0)
        .with_solution_gor(800.0);
    let fresh = make_bot(&base).unwrap();
    let saline = make_bot(&base.with_brine(3.0, 0.5)).unwrap();

    assert_eq!(fresh.column("Bo"), saline.column("Bo"));
    assert_eq!(fresh.column("ug"), saline.column("ug"));
    assert_ne!(fresh.column("Bw"), saline.column("Bw"));
    assert!((saline.water_density - 62.0123).abs() < 1e-2);
    assert!(saline.water_compressibility > fresh.water_compressibility);
}

#[test]
fn table_is_physically_ordered() {
    let request: BotRequest = serde_yaml::from_str(REQUEST).unwrap();
    let table = make_bot(&request).unwrap();
    let pb = table.bubble_point.pb;

    let saturated: Vec<_> = table.rows.iter().filter(|r| r.pressure <= pb).collect();
    assert!(saturated.windows(2).all(|w| w[1].rs > w[0].rs && w[1].bo > w[0].bo));
    assert!(saturated.windows(2).all(|w| w[1].uo < w[0].uo));
    assert!(saturated.iter().all(|r| r.rs_method.is_some()));

    let under: Vec<_> = table.rows.iter().filter(|r| r.pressure > pb).collect();
    assert!(under.windows(2).all(|w| w[1].bo < w[0].bo && w[1].uo > w[0].uo));
    assert!(under.iter().all(|r| r.rs == 800.0 && r.rs_method.is_none()));

    assert!(table.rows.iter().all(|r| r.co > 0.0 && r.cg > 0.0 && r.cw > 0.0));
    assert!(table.rows.iter().all(|r| r.bg > 0.0 && r.bw > 1.0));
    assert_eq!(
        table.rows[0].rs_method,
        Some(PbMethod::Velarde),
        "Valko-McCain has no answer at 14.7 psia"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn reconciled_table_honours_pb_and_rsb(
        pb in 1500.0f64..4000.0,
        rsb in 300.0f64..1200.0,
        api in 25.0f64..45.0,
    ) {
        let request = BotRequest::new(pb + 500.0, api, 200.0, 0.75, pb + 1000.0)
            .with_bubble_point(pb)
            .with_solution_gor(rsb);
        let table = make_bot(&request).unwrap();
        let at_pb = table
            .rows
            .iter()
            .find(|row| row.pressure == pb)
            .copied()
            .unwrap();
        prop_assert!((at_pb.rs - rsb).abs() / rsb < 1e-4);
        prop_assert_eq!(table.rows.last().map(|r| r.rs), Some(rsb));
    }
}
