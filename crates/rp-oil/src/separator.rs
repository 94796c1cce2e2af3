//! Separator and stock tank gas relations (McCain & Hill 1995, Valko & McCain 2003).

use rp_core::{AIR_MOLECULAR_WEIGHT, CUFT_PER_BBL, WATER_DENSITY, api_to_sg, nested_polynomial};

/// Standard cubic feet per lb-mol of ideal gas at 14.7 psia and 60 degF.
const SCF_PER_LBMOL: f64 = 379.482;

/// Specific gravity of gas evolved in situ below the bubble point.
///
/// Never lower than the separator gas gravity.
pub fn reservoir_gas_sg(p: f64, degf: f64, rsb: f64, api: f64, sg_sp: f64) -> f64 {
    // the 1995 paper gives separate fits above and below 314.7 psia
    let a: [f64; 9] = if p > 314.7 {
        [
            -208.0797, 22885.0, -0.000063641, 3.38346, -0.000992, -0.000081147, -0.001956,
            1.081956, 0.394035,
        ]
    } else {
        [
            -214.0887, 9971.0, -0.001303, 3.12715, -0.001495, -0.000085243, -0.003667, 1.47156,
            0.714002,
        ]
    };
    let one_on_sg = a[0] / p
        + a[1] / (p * p)
        + a[2] * p
        + a[3] / degf.sqrt()
        + a[4] * degf
        + a[5] * rsb
        + a[6] * api
        + a[7] / sg_sp
        + a[8] * sg_sp * sg_sp;
    (1.0 / one_on_sg).max(sg_sp)
}

/// Vaporised condensate (stb per MMscf of separator gas) implied by the
/// difference between reservoir and separator gas gravities.
pub fn vaporized_condensate_ratio(sg_res: f64, sg_sp: f64, api: f64) -> f64 {
    let sep_moles = 1e6 / SCF_PER_LBMOL;
    let raw_moles = sep_moles * sg_res / sg_sp;
    let condensate_mass = AIR_MOLECULAR_WEIGHT * (sg_res * raw_moles - sg_sp * sep_moles);
    let condensate_cuft = condensate_mass / (api_to_sg(api) * WATER_DENSITY);
    condensate_cuft / CUFT_PER_BBL
}

/// Specific gravity of the gas flashed off in the stock tank.
pub fn stock_tank_gas_sg(psp: f64, rsp: f64, api: f64, sg_sp: f64, degf_sp: f64) -> f64 {
    const C: [[f64; 5]; 5] = [
        [-17.275, -0.3354, 3.705, -155.52, 2.085],
        [7.9597, -0.3346, -0.4273, 629.61, -7.097e-2],
        [-1.1013, 0.1956, 1.818e-2, -957.38, 9.859e-4],
        [2.7735e-2, -3.4374e-2, -3.459e-4, 647.57, -6.312e-6],
        [3.2287e-3, 2.08e-3, 2.505e-6, -163.26, 1.4e-8],
    ];
    let z = nested_polynomial(&C, &[psp.ln(), rsp.ln(), api, sg_sp, degf_sp]);
    1.219 + 0.198 * z + 0.0845 * z.powi(2) + 0.03 * z.powi(3) + 0.003 * z.powi(4)
}

/// GOR-weighted surface gas gravity from separator and stock tank streams.
pub fn surface_gas_sg(sg_sp: f64, rsp: f64, sg_st: f64, rst: f64) -> f64 {
    (sg_sp * rsp + sg_st * rst) / (rsp + rst)
}

/// Stock tank GOR (scf/stb) to add to the separator GOR to obtain Rsb.
pub fn stock_tank_gor(psp: f64, degf_sp: f64, api: f64) -> f64 {
    const C: [[f64; 3]; 3] = [[-8.005, 1.224, -1.587], [2.7, -0.5, 0.0441], [-0.161, 0.0, -2.29e-5]];
    let z = nested_polynomial(&C, &[psp.ln(), degf_sp.ln(), api]);
    (3.955 + 0.83 * z - 0.024 * z * z + 0.075 * z.powi(3)).max(0.0)
}
