pub mod config;
pub mod output;
pub mod region;

pub use config::{ConfigError, ExtractConfig, RowErrorPolicy, TesseractConfig};
pub use output::{Content, OutputRecord, NO_TEXT_DETECTED, UNRECOGNIZED_REGION_TYPE};
pub use region::{AnnotationRow, RegionType, Shape};
