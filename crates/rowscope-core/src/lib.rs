//! Rowscope Core - tabular processing for heterogeneous CSV datasets
//!
//! This crate holds the pure, I/O-free operations shared by every surface:
//! blank-row normalization, aliased field resolution, search and filtering,
//! unique-value extraction, grouped statistics and pagination.

pub mod aggregate;
pub mod field_resolver;
pub mod pager;
pub mod query;
pub mod record;

pub use aggregate::{statistics, unique_values, FilterOptions, GroupCount, Statistics};
pub use field_resolver::{resolve_field, LogicalField, EMAIL_FIELD, UNKNOWN_GROUP};
pub use pager::{cell, display_columns, paginate, Page, DEFAULT_DISPLAY_COLUMNS, DEFAULT_PAGE_SIZE};
pub use query::{filter_records, search_records, FilterCriteria, Query};
pub use record::{normalize_records, Dataset, Record};
