//! Forge Threads.
//!
//! Núcleo de threads do kernel Forge para uma CPU: scheduler por prioridade,
//! fila de sleep, doação de prioridade e as primitivas de sincronização
//! construídas sobre eles.
//!
//! Chamadores externos (syscalls, gerência de processos) usam `sched` para
//! criar, bloquear, acordar e terminar threads e `sync` para semáforos, locks
//! e variáveis de condição. O handler do timer entra por
//! `core::time::timer::handle_interrupt`.

#![cfg_attr(target_os = "none", no_std)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Módulos de Baixo Nível (Hardware) ---
pub mod arch; // HAL (CPU, contexto)
pub mod drivers; // Serial, PIT

// --- Módulos Centrais ---
pub mod core; // Logging, interrupções, tempo, panic
pub mod klib; // Framework de self-test
pub mod mm; // Heap do kernel

// --- Threads ---
pub mod sched; // Scheduler e threads
pub mod sync; // Primitivas de sincronização

#[cfg(test)]
mod testing;

/// Roda os self-tests de scheduler e sincronização.
///
/// Pré-condição: `sched::init()` e `sched::start()` já chamados, na thread
/// inicial, com interrupções ligadas.
#[cfg(feature = "self_test")]
pub fn run_self_tests() -> klib::SuiteReport {
    let sched = sched::test::run_sched_tests();
    let sync = sync::test::run_sync_tests();
    sched.merge(sync)
}
