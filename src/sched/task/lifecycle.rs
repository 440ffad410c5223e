//! Início e fim de uma thread.
//!
//! Uma thread nova começa em `thread_entry`, que pega o corpo guardado na TCB,
//! religa as interrupções (o dispatcher sempre troca com elas desligadas) e
//! termina em `exit_current`.
//!
//! A destruição é em duas fases. `exit_current` só marca Dying: o código que
//! faz a troca ainda roda na stack da thread que está morrendo. O dispatcher
//! coloca a thread no `Reaper` ao sair dela e a próxima passada de
//! escalonamento (já em outra stack) remove a TCB do registro.

use super::registry::{Registry, ThreadRef};
use crate::sched::SchedError;
use alloc::vec::Vec;

/// Trampolim de entrada de toda thread criada por `spawn`.
pub(crate) extern "C" fn thread_entry() -> ! {
    let body = crate::sched::core::scheduler::take_current_body();

    crate::core::interrupt::enable();

    if let Some(body) = body {
        body();
    }

    crate::sched::exit_current()
}

/// Threads mortas esperando liberação.
pub struct Reaper {
    pending: Vec<ThreadRef>,
}

impl Reaper {
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Garante espaço para `threads` zumbis, para `defer` não alocar.
    pub fn reserve(&mut self, threads: usize) -> Result<(), SchedError> {
        self.pending
            .try_reserve(threads.saturating_sub(self.pending.len()))
            .map_err(|_| SchedError::OutOfMemory)
    }

    /// Marca para liberação na próxima passada.
    pub fn defer(&mut self, thread: ThreadRef) {
        self.pending.push(thread);
    }

    /// Libera TCB, stack e contexto de todas as threads pendentes.
    pub fn reap(&mut self, registry: &mut Registry) -> usize {
        let count = self.pending.len();
        for thread in self.pending.drain(..) {
            if let Some(dead) = registry.remove(thread) {
                crate::ktrace!("(Sched) Liberando TID:", dead.tid.as_u32());
            }
        }
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
