pub mod acquire;
pub mod aggregate;
pub mod etl;
pub mod filter;
pub mod pipeline;
pub mod source;
pub mod summary;
pub mod top_n;

pub use crate::domain::model::{AggregationTable, CitationRecord, CitationSummary, TopSelection};
pub use crate::domain::ports::{ConfigProvider, DatasetFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
