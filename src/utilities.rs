pub mod api_utils;
pub mod config;
pub mod line_stream;
pub mod logchamp;
pub mod stream_accumulator;
