//! Bicycle fit geometry.
//!
//! Converts frame measurements (reach, stack, head-tube angle), stem
//! geometry and saddle offsets into rider contact points, and back. The
//! engine is a set of pure functions in [`geometry`]; [`request`] wraps
//! them in a JSON request/response contract.
//!
//! ```
//! let response = bikefit::handle_json(
//!     r#"{"calculationKind": "xy-position", "data": {"reach": 380, "stack": 560, "headTubeAngle": 73}}"#,
//! );
//! assert!(response.success);
//! let result = response.result.unwrap();
//! assert_eq!(result["handlebarX"], 464);
//! assert_eq!(result["handlebarY"], 627);
//! ```

mod log;

pub mod errors;
pub mod geometry;
pub mod lenient;
pub mod reading;
pub mod request;
pub mod types;

pub use errors::{CalcError, InsufficientData};
pub use geometry::{FrameGeometry, StemGeometry};
pub use reading::Reading;
pub use request::{Calculate, Calculation, CalculationKind, Request, Response, evaluate, handle, handle_json};
pub use types::{Degrees, Mm, Point, PtMm};
