pub mod csv_source;

pub use csv_source::{parse_csv, parse_csv_line, CsvSource};
