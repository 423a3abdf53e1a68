//! Photo Annotate Common Library
//!
//! CLIとセッション本体で共有される、IOを持たない型とユーティリティ

pub mod types;
pub mod history;
pub mod error;

pub use types::{GeoCoordinate, MapRegion, MapSpan, PhotoMetadata};
pub use history::{HistoryPicker, PickerEntry, TextHistory, DEFAULT_HISTORY_LIMIT, PLACEHOLDER_LABEL};
pub use error::{Error, Result};
