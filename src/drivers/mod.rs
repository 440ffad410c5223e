//! Drivers mínimos usados pelo núcleo de threads.

pub mod serial;
pub mod timer;
