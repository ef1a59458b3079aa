//! Chordnode: configuration, logging and reporting around a simulated Chord ring

pub mod config;
pub mod logging;
pub mod report;
pub mod scenario;
