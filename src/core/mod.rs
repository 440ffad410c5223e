//! Infraestrutura do núcleo: logging, contexto de interrupção, tempo e pânico.

pub mod interrupt;
pub mod logging;
#[cfg(target_os = "none")]
pub mod panic;
pub mod time;
