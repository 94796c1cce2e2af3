//! rp-bot: black-oil table generation.
//!
//! Contains:
//! - nodes (table pressure grid with the bubble point and initial pressure
//!   inserted)
//! - reconcile (honouring a user bubble point and solution GOR together)
//! - table (per-node oil, gas and water properties)
//!
//! # Example
//!
//! ```
//! use rp_bot::{BotRequest, make_bot};
//!
//! let request = BotRequest::new(4000.0, 35.0, 200.0, 0.75, 5000.0)
//!     .with_bubble_point(3000.0)
//!     .with_solution_gor(800.0);
//! let table = make_bot(&request).unwrap();
//! assert_eq!(table.len(), 20);
//! let rs = table.column("Rs").unwrap();
//! assert!(rs.windows(2).all(|w| w[1] >= w[0]));
//! ```

pub mod nodes;
pub mod reconcile;
pub mod table;

pub use nodes::pressure_nodes;
pub use reconcile::{
    RECONCILE_MAX_ITERATIONS, RECONCILE_TOLERANCE, ReconciledBubblePoint, reconcile_bubble_point,
};
pub use table::{BlackOilTable, BotRequest, BotRow, COLUMNS, make_bot};
