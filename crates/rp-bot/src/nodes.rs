//! Pressure grid for black-oil tables.

use rp_core::{PvtError, PvtResult};

/// Nodes closer than this (psi) are treated as the same pressure.
const NODE_MERGE_TOLERANCE: f64 = 1e-9;

/// Ascending table pressures from `pmin` to `pmax`, with `pb` and `pi`
/// inserted.
///
/// The uniform spacing leaves room for the inserted nodes so the table ends
/// up close to `nrows` rows: three slots are reserved, one fewer for every
/// end point that already coincides with `pb` or `pi`, and one fewer when
/// `pb` equals `pi`.
pub fn pressure_nodes(pmin: f64, pmax: f64, nrows: usize, pb: f64, pi: f64) -> PvtResult<Vec<f64>> {
    if !(pmin.is_finite() && pmax.is_finite() && pmin > 0.0 && pmax > pmin) {
        return Err(PvtError::configuration(format!(
            "table pressures need 0 < pmin < pmax, got pmin={pmin} pmax={pmax}"
        )));
    }
    if !(pb.is_finite() && pi.is_finite()) {
        return Err(PvtError::configuration(format!(
            "table nodes need finite pb and pi, got pb={pb} pi={pi}"
        )));
    }

    let mut reserved = 3usize;
    if pmin == pb || pmin == pi {
        reserved -= 1;
    }
    if pmax == pb || pmax == pi {
        reserved -= 1;
    }
    if pb == pi {
        reserved = reserved.saturating_sub(1);
    }
    if nrows <= reserved {
        return Err(PvtError::configuration(format!(
            "a table with {nrows} rows leaves no room for uniform nodes ({reserved} reserved)"
        )));
    }

    let steps = nrows - reserved;
    let delta = (pmax - pmin) / steps as f64;
    let mut nodes: Vec<f64> = (0..=steps).map(|k| pmin + k as f64 * delta).collect();
    // exact endpoint
    nodes[steps] = pmax;
    nodes.push(pb);
    nodes.push(pi);

    nodes.sort_by(f64::total_cmp);
    nodes.dedup_by(|a, b| (*a - *b).abs() <= NODE_MERGE_TOLERANCE);
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_bubble_point_and_initial_pressure() {
        let nodes = pressure_nodes(14.7, 5000.0, 20, 3000.0, 4000.0).unwrap();
        assert_eq!(nodes.len(), 20);
        assert_eq!(nodes[0], 14.7);
        assert_eq!(*nodes.last().unwrap(), 5000.0);
        assert!(nodes.contains(&3000.0));
        assert!(nodes.contains(&4000.0));
        assert!(nodes.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn coincident_nodes_keep_row_count() {
        // pmax is pi and pb equals pi
        let nodes = pressure_nodes(14.7, 4000.0, 20, 4000.0, 4000.0).unwrap();
        assert_eq!(nodes.len(), 20);
        assert_eq!(*nodes.last().unwrap(), 4000.0);

        // pmin is pb
        let nodes = pressure_nodes(1000.0, 5000.0, 10, 1000.0, 3200.0).unwrap();
        assert_eq!(nodes.len(), 10);
        assert_eq!(nodes[0], 1000.0);
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert!(pressure_nodes(5000.0, 14.7, 20, 3000.0, 4000.0).is_err());
        assert!(pressure_nodes(0.0, 5000.0, 20, 3000.0, 4000.0).is_err());
        assert!(pressure_nodes(14.7, 5000.0, 3, 3000.0, 4000.0).is_err());
    }
}
