//! reportviz core library
//!
//! Plot descriptors, the Vega-Lite specification compiler, hexbin bin indices and
//! table serialization for interactive analytics reports.

pub mod descriptor;
pub mod scale;
pub mod compile;
pub mod bins;
pub mod table;
pub mod dataset;
pub mod error;

// Re-export commonly used types and functions
pub use descriptor::{PlotDescriptor, PlotKind, ImageFormat, Label};
pub use scale::ScaleMode;
pub use compile::{compile, CompileOptions, CompiledPlot, SpecDocument};
pub use bins::{BinIndex, BinIndexBuilder, OVERFLOW_SENTINEL, DEFAULT_OVERFLOW_CAP};
pub use table::{Cell, Table};
pub use dataset::ReportData;
pub use error::{CompileError, DescriptorError, LoadError};

/// Version information for the reportviz core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
