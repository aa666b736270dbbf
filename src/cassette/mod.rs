//! YAML cassettes: recorded generator calls that tests replay offline.

pub mod format;
pub mod recorder;
pub mod replayer;
