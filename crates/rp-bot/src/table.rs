//! Black-oil table generation.

use crate::nodes::pressure_nodes;
use crate::reconcile::{ReconciledBubblePoint, reconcile_bubble_point};
use rp_core::{
    CUFT_PER_BBL, PvtError, PvtResult, STANDARD_PRESSURE, STANDARD_TEMPERATURE, Samples,
    WATER_DENSITY,
};
use rp_gas::properties::{self, inverse_fvf, lee_gonzalez_eakin};
use rp_gas::{CriticalMethod, GasModel, ResolvedGas, ZMethod};
use rp_oil::{
    BoMethod, OilConditions, PbMethod, oil_compressibility, oil_fvf, oil_viscosity,
    solution_gor_at_bubble_point,
};
use rp_water::brine_properties;
use serde::{Deserialize, Serialize};

/// Below this Rs (scf/stb) the next, lower node is inverted with Velarde.
const VELARDE_SWITCH_RS: f64 = 10.0;

fn default_pmin() -> f64 {
    STANDARD_PRESSURE
}

fn default_nrows() -> usize {
    20
}

/// Inputs of a black-oil table.
///
/// At least one of `pb` and `rsb` must be known; non-positive values count
/// as unknown. When both are given the table honours both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotRequest {
    /// Initial reservoir pressure (psia); water properties are reported here.
    pub pi: f64,
    pub api: f64,
    pub degf: f64,
    /// Weighted average surface gas specific gravity.
    pub sg_g: f64,
    pub pmax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsb: Option<f64>,
    #[serde(default = "default_pmin")]
    pub pmin: f64,
    #[serde(default = "default_nrows")]
    pub nrows: usize,
    /// Brine salinity, NaCl wt%.
    #[serde(default)]
    pub wt: f64,
    /// Methane saturation of the brine, 0 to 1.
    #[serde(default)]
    pub ch4_sat: f64,
}

impl BotRequest {
    pub fn new(pi: f64, api: f64, degf: f64, sg_g: f64, pmax: f64) -> Self {
        Self {
            pi,
            api,
            degf,
            sg_g,
            pmax,
            pb: None,
            rsb: None,
            pmin: default_pmin(),
            nrows: default_nrows(),
            wt: 0.0,
            ch4_sat: 0.0,
        }
    }

    pub fn with_bubble_point(mut self, pb: f64) -> Self {
        self.pb = Some(pb);
        self
    }

    pub fn with_solution_gor(mut self, rsb: f64) -> Self {
        self.rsb = Some(rsb);
        self
    }

    pub fn with_rows(mut self, pmin: f64, nrows: usize) -> Self {
        self.pmin = pmin;
        self.nrows = nrows;
        self
    }

    pub fn with_brine(mut self, wt: f64, ch4_sat: f64) -> Self {
        self.wt = wt;
        self.ch4_sat = ch4_sat;
        self
    }
}

/// Column headers, in [`BotRow`] field order.
pub const COLUMNS: [&str; 12] = [
    "Pressure (psia)",
    "Rs (scf/stb)",
    "Bo (rb/stb)",
    "uo (cP)",
    "Gas Z (v/v)",
    "Bg (rb/mscf)",
    "ug (cP)",
    "Bw (rb/stb)",
    "uw (cP)",
    "co (1/psi)",
    "cg (1/psi)",
    "cw (1/psi)",
];

/// One table node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotRow {
    pub pressure: f64,
    pub rs: f64,
    /// Family that produced `rs`; `None` above the bubble point, where Rs is
    /// the reconciled Rsb.
    pub rs_method: Option<PbMethod>,
    pub bo: f64,
    pub uo: f64,
    pub gas_z: f64,
    pub bg: f64,
    pub ug: f64,
    pub bw: f64,
    pub uw: f64,
    pub co: f64,
    pub cg: f64,
    pub cw: f64,
}

impl BotRow {
    fn values(&self) -> [f64; 12] {
        [
            self.pressure,
            self.rs,
            self.bo,
            self.uo,
            self.gas_z,
            self.bg,
            self.ug,
            self.bw,
            self.uw,
            self.co,
            self.cg,
            self.cw,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackOilTable {
    pub bubble_point: ReconciledBubblePoint,
    pub rows: Vec<BotRow>,
    /// lb/cuft
    pub stock_tank_oil_density: f64,
    /// lb/cuft at 14.7 psia and 60 degF
    pub stock_tank_gas_density: f64,
    /// Brine density at the initial pressure (lb/cuft).
    pub water_density: f64,
    /// Brine compressibility at the initial pressure (1/psi).
    pub water_compressibility: f64,
    /// Brine viscosity at the initial pressure (cP).
    pub water_viscosity: f64,
}

impl BlackOilTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, looked up by full header or by the label before
    /// the unit, case-insensitively (`"Bo"` or `"Bo (rb/stb)"`).
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let name = name.trim();
        let position = COLUMNS.iter().position(|header| {
            let label = header.split(" (").next().unwrap_or(header);
            header.eq_ignore_ascii_case(name) || label.eq_ignore_ascii_case(name)
        })?;
        Some(self.rows.iter().map(|row| row.values()[position]).collect())
    }
}

/// Gas used for every gas column: DAK Z-factor on Piper-McCain-Corredor
/// critical properties.
fn table_gas(sg_g: f64) -> PvtResult<ResolvedGas> {
    GasModel::hydrocarbon(sg_g)?
        .with_z_method(ZMethod::IterativeFixedPoint)
        .with_critical_method(CriticalMethod::PiperMcCainCorredor)
        .resolve()
}

/// Correlation family used to invert the saturated node at `p`, given the
/// Rs values already assigned to the lower nodes.
///
/// Velarde takes over once at least two nodes are in and the last one has
/// dropped to [`VELARDE_SWITCH_RS`] or below. The bubble point row always
/// uses Valko-McCain so Rs is continuous across Pb.
fn inversion_family(p: f64, pb: f64, lower_rs: &[f64]) -> PbMethod {
    match lower_rs.last() {
        Some(&rs) if p != pb && lower_rs.len() > 1 && rs <= VELARDE_SWITCH_RS => {
            PbMethod::Velarde
        }
        _ => PbMethod::ValkoMcCain,
    }
}

/// Solution GOR at each node, in ascending pressure order.
///
/// Each node at or below the bubble point is treated as the bubble point of
/// a lighter oil.
fn solution_gors(
    oil: &OilConditions,
    bubble: &ReconciledBubblePoint,
    nodes: &[f64],
) -> PvtResult<Vec<(f64, f64, Option<PbMethod>)>> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut rss = Vec::with_capacity(nodes.len());
    for &p in nodes {
        let (rs, method) = if p > bubble.pb {
            (bubble.rsb, None)
        } else {
            let family = inversion_family(p, bubble.pb, &rss);
            let inversion = solution_gor_at_bubble_point(oil, p, family)?;
            (inversion.rsb * bubble.rsb_scale, Some(inversion.method_used))
        };
        rss.push(rs);
        out.push((p, rs, method));
    }
    Ok(out)
}

/// Put the table row on element failures raised at a single pressure.
fn at_row(index: usize) -> impl Fn(PvtError) -> PvtError {
    move |err| match err {
        PvtError::ElementConvergence {
            what, iterations, ..
        } => PvtError::ElementConvergence {
            what,
            index,
            iterations,
        },
        other => other,
    }
}

struct TableContext<'a> {
    request: &'a BotRequest,
    oil: OilConditions,
    gas: ResolvedGas,
    bubble: ReconciledBubblePoint,
}

impl TableContext<'_> {
    fn row(&self, index: usize, p: f64, rs: f64, rs_method: Option<PbMethod>) -> PvtResult<BotRow> {
        let degf = self.request.degf;
        let pb = self.bubble.pb;

        let bo = oil_fvf(&self.oil, p, pb, rs, BoMethod::Velarde)?;
        let uo = oil_viscosity(&self.oil, p, p.min(pb), rs)?;
        let co = oil_compressibility(&self.oil, p, pb, self.bubble.rsb, &self.gas)
            .map_err(at_row(index))?;

        let gas_z = self.gas.z_scalar(p, degf).map_err(at_row(index))?;
        let bg = 1000.0 / (inverse_fvf(p, degf, gas_z) * CUFT_PER_BBL);
        let ug = lee_gonzalez_eakin(p, degf, self.gas.sg(), gas_z);
        let cg = properties::compressibility(p, degf, &self.gas.critical()).map_err(at_row(index))?;

        let brine = brine_properties(p, degf, self.request.wt, self.request.ch4_sat)?;

        Ok(BotRow {
            pressure: p,
            rs,
            rs_method,
            bo,
            uo,
            gas_z,
            bg,
            ug,
            bw: brine.bw,
            uw: brine.viscosity,
            co,
            cg,
            cw: brine.compressibility,
        })
    }
}

/// Build a black-oil table from `pmin` to `pmax`.
///
/// The separator gas gravity is taken equal to the surface gas gravity and
/// treated as measured. Any failure aborts the whole table.
pub fn make_bot(request: &BotRequest) -> PvtResult<BlackOilTable> {
    if !(request.pi.is_finite() && request.pi > 0.0) {
        return Err(PvtError::configuration(format!(
            "initial pressure must be positive, got {}",
            request.pi
        )));
    }
    let oil = OilConditions::new(request.api, request.degf, request.sg_g, request.sg_g)?;
    let gas = table_gas(request.sg_g)?;
    let bubble = reconcile_bubble_point(&oil, request.pb, request.rsb)?;

    let nodes = pressure_nodes(request.pmin, request.pmax, request.nrows, bubble.pb, request.pi)?;
    let saturation = Samples::Sequence(solution_gors(&oil, &bubble, &nodes)?);

    let ctx = TableContext {
        request,
        oil,
        gas,
        bubble,
    };
    let rows = saturation
        .par_try_map(|index, &(p, rs, method)| ctx.row(index, p, rs, method))?
        .into_vec();

    let st_gas_z = gas.z_scalar(STANDARD_PRESSURE, STANDARD_TEMPERATURE)?;
    let initial_brine = brine_properties(request.pi, request.degf, request.wt, request.ch4_sat)?;

    Ok(BlackOilTable {
        bubble_point: bubble,
        rows,
        stock_tank_oil_density: oil.sg_o() * WATER_DENSITY,
        stock_tank_gas_density: properties::density(
            STANDARD_PRESSURE,
            STANDARD_TEMPERATURE,
            gas.sg(),
            st_gas_z,
        ),
        water_density: initial_brine.density_sg * WATER_DENSITY,
        water_compressibility: initial_brine.compressibility,
        water_viscosity: initial_brine.viscosity,
    })
}
