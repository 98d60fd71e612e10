//! CBIO Report Common Library
//!
//! CLIとWeb(WASM)で共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod raster;
pub mod loader;
pub mod filter;
pub mod route;
pub mod fields;
pub mod map;
pub mod print;
pub mod cache;
pub mod guard;

pub use types::{Coordinates, ImageSource, Report, ReportListing, ReportStatus, SatelliteImage};
pub use error::{Error, Result};
pub use loader::{load_report_data, load_report_listing, AssetSource, LoaderConfig};
pub use filter::{filter_reports, Selection};
pub use route::{report_path, Route};
pub use print::{render_document, PrintOptions};
pub use cache::ReportCache;
pub use guard::{RequestGuard, RequestTicket};
