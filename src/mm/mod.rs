//! # Memory Management Subsystem (MM)
//!
//! Só o heap do kernel: TCBs, stacks de kernel e as filas do scheduler vêm
//! dele. Paginação e memória física ficam com os colaboradores.

pub mod heap;

pub use heap::{HeapStats, KERNEL_HEAP};
