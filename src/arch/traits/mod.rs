//! Traits do Hardware Abstraction Layer (HAL).
//! Interfaces que o núcleo de threads usa para falar com o hardware.

pub mod context;
pub mod cpu;

// Re-exportar para facilitar uso: `use crate::arch::traits::CpuOps;`
pub use context::ContextOps;
pub use cpu::CpuOps;
