//! Dispatcher e troca de contexto.
//!
//! `schedule` é o único ponto em que a CPU muda de thread. Pré-condições:
//! interrupções desligadas e o estado da thread atual já ajustado para o
//! destino dela (Ready, Blocked ou Dying), nunca Running. Violar qualquer uma
//! é bug de quem chamou e derruba o kernel.

use super::scheduler::{with, Scheduler};
use crate::arch::{ContextOps, Cpu, CpuContext, CpuOps};
use crate::core::interrupt;
use crate::sched::task::{QueueTag, ThreadState};

/// Escolhe a próxima thread e troca para ela.
///
/// Retorna quando a thread chamadora voltar a ser escolhida (ou nunca, se ela
/// estava Dying).
pub(crate) fn schedule() {
    assert!(
        !Cpu::are_interrupts_enabled(),
        "(Sched) schedule com interrupções habilitadas"
    );
    assert!(
        !interrupt::in_interrupt(),
        "(Sched) schedule dentro de um handler"
    );

    let Some((prev, next)) = with(|s| s.dispatch()) else {
        return;
    };

    // SAFETY: os dois contextos pertencem a TCBs em `Box`, que não se movem.
    // `prev` só é liberada pelo reaper na próxima passada, que roda depois
    // desta troca ter salvo o contexto.
    unsafe { CpuContext::switch(prev, next) };
}

impl Scheduler {
    /// Decide a troca. `None` quando a thread atual continua.
    pub(crate) fn dispatch(&mut self) -> Option<(*mut CpuContext, *const CpuContext)> {
        self.reaper.reap(&mut self.threads);

        let prev = self.current;
        let prev_state = self.thread(prev).state;
        assert!(
            prev_state != ThreadState::Running,
            "(Sched) schedule com a thread atual em Running"
        );

        let next = match self.ready.dequeue_highest() {
            Some(next) => next,
            None => match self.idle {
                Some(idle) => idle,
                None => panic!("(Sched) nenhuma thread para executar"),
            },
        };

        self.slice = 0;
        let thread = self.thread_mut(next);
        thread.state = ThreadState::Running;
        thread.queue = QueueTag::None;
        thread.accounting.dispatches += 1;

        if next == prev {
            return None;
        }

        crate::ktrace!("(Sched) Trocando para TID:", thread.tid.as_u32());

        if prev_state == ThreadState::Dying {
            self.reaper.defer(prev);
        }
        self.current = next;

        // SAFETY: raiz do kernel capturada no `init` ou instalada por
        // `set_address_space`, cujo contrato a mantém válida.
        unsafe { Cpu::switch_address_space(self.root_of(next)) };

        let prev_ctx = &mut self.thread_mut(prev).context as *mut CpuContext;
        let next_ctx = &self.thread(next).context as *const CpuContext;
        Some((prev_ctx, next_ctx))
    }
}
