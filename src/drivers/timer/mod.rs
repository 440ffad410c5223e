//! Fonte de ticks em hardware.

pub mod pit;
