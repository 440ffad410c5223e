//! # Synchronization Primitives
//!
//! Primitivas de sincronização sobre o scheduler de uma CPU.
//!
//! ## Hierarquia de Uso
//!
//! ```text
//! Spinlock   → Seções críticas curtas (não pode dormir, serve em IRQ)
//! Semaphore  → Controle de recursos contáveis (pode dormir)
//! Lock       → Exclusão mútua com dono e doação de prioridade
//! CondVar    → Espera por condição, sempre com um Lock
//! ```
//!
//! ## Regras
//!
//! - **Spinlock**: nunca dormir segurando um.
//! - **Semaphore / Lock / CondVar**: nunca em contexto de interrupção, exceto
//!   `Semaphore::up`.
//! - **Ordem de Lock**: spinlock interno da primitiva e depois o do
//!   scheduler, nunca o contrário.

/// Spinlock (busy-wait com interrupções desligadas)
pub mod spinlock;

/// Semáforo (contagem de recursos)
pub mod semaphore;

/// Lock com dono e doação de prioridade
pub mod lock;

/// Condition Variable
pub mod condvar;


#[cfg(test)]
mod tests;

pub use crate::core::interrupt::IrqGuard;
pub use condvar::CondVar;
pub use lock::{Lock, LockGuard};
pub use semaphore::Semaphore;
pub use spinlock::{Spinlock, SpinlockGuard};
