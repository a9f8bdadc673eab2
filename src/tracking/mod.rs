//! Time tracking core.
//!  - [entities] holds projects, logs and running timers.
//!  - [aggregation], [split] and [timeline] are pure computations over logs.
//!  - [service::Tracker] owns the collections and persists them through [storage].
//!  - [live] keeps a running total fresh while a timer is active.

pub mod aggregation;
pub mod config;
pub mod entities;
pub mod live;
pub mod service;
pub mod split;
pub mod storage;
pub mod timeline;
