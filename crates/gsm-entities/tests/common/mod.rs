#![allow(dead_code)]

pub mod component_test;
pub mod sink;

pub use component_test::{ComponentTest, data_req, default_test_config};
pub use sink::{Recorder, RecordingPhy, Upcall};
