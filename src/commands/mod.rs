pub mod analyze;
pub mod candle_file;
pub mod forecast;
