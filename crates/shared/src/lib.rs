//! Process bootstrap shared by the cadence binaries

pub mod bootstrap;
