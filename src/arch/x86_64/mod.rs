//! Plataforma x86_64 (bare metal).

pub mod context;
pub mod cpu;
pub mod interrupts;
pub mod ports;

pub use context::CpuContext;
pub use cpu::X64Cpu as Cpu;
