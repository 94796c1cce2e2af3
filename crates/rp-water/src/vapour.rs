//! Water vapour carried by natural gas.

use rp_core::degf_to_rankine;

/// Saturated water content of sweet natural gas (stb/MMscf), after the
/// correlation reproduced in Danesh's phase behaviour text.
pub fn saturated_water_content(p: f64, degf: f64) -> f64 {
    let t = degf_to_rankine(degf);
    let a = (69.103501 - 13064.76 / t - 7.3037 * t.ln() + 0.0000012856 * t * t).exp();
    let b = 10f64.powf(-3083.87 / t + 6.69449);
    // lb/MMscf to stb/MMscf
    (47484.0 * a / p + b) / 8.32 / 42.0
}
