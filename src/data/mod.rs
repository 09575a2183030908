//! Data module - workbook loading, normalization, caching and filtering

mod cache;
pub mod columns;
mod loader;
mod processor;

pub use cache::{CacheKey, LoadCache};
pub use loader::{range_to_dataframe, DataLoader, LoaderError};
pub use processor::{
    DataProcessor, ProcessorError, RegionFilter, RepresentativeMetrics, ALL_REGIONS,
};
