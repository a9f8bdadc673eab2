//! Personal time tracker. Projects get timers, finished timers become logs, and logs of a day
//! can be summed up, drawn as compact text timelines, or exported as `/track` lines.
//!

pub mod cli;
pub mod tracking;
pub mod utils;
