mod http_reader;
mod range_reader;

pub use http_reader::HttpRangeReader;
pub use range_reader::RangeReader;
