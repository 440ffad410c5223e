//! Threads: TCB, estados, registro e ciclo de vida.

pub mod accounting;
pub mod entity;
pub mod lifecycle;
pub mod registry;
pub mod stack;
pub mod state;

pub use accounting::{Accounting, TickStats};
pub use entity::{QueueTag, Thread, ThreadBody, ThreadFlags, ThreadName, Tid};
pub use registry::{Registry, ThreadRef};
pub use stack::KernelStack;
pub use state::ThreadState;
