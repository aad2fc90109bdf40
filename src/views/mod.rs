pub mod chart;
pub mod filter;
pub mod table;

pub use filter::{select, PriceFilter, ViewState, DEFAULT_MAX_PRICE};
pub use table::{resort_tables, SortColumn};
