mod csv;
mod json;
mod layout;
mod text;

pub use csv::CsvMerger;
pub use json::JsonMerger;
pub use layout::LayoutFormatter;
pub use text::TextMerger;
