//! Thread ociosa
//!
//! Roda só quando a fila de prontas está vazia; o dispatcher a escolhe como
//! último recurso, sem que ela jamais entre na fila.

use crate::arch::{Cpu, CpuOps};
use crate::core::interrupt;
use crate::sync::Semaphore;
use alloc::sync::Arc;

/// Corpo da idle. `started` avisa `start()` que a idle já rodou.
pub(crate) fn idle_loop(started: Arc<Semaphore>) -> ! {
    crate::kinfo!("(Idle) Thread ociosa iniciada");
    started.up();
    drop(started);

    loop {
        // Bloqueia até não haver mais ninguém pronto.
        interrupt::disable();
        crate::sched::block_current();

        // Liga interrupções e espera a próxima, sem janela entre as duas.
        Cpu::wait_for_interrupt();
    }
}
