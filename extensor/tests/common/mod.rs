#![allow(dead_code, unused_imports)]

pub mod log_capture;
pub mod recorder;

pub use log_capture::EventCollector;
pub use recorder::Recorder;
