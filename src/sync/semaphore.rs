//! Semáforo de contagem
//!
//! `up` com alguém esperando entrega a unidade direto para a thread acordada
//! (o contador não sobe). A escolhida é a primeira com a maior prioridade
//! efetiva no momento do `up`, então doações recebidas durante a espera
//! contam.

use super::spinlock::Spinlock;
use crate::core::interrupt::{self, IrqGuard};
use crate::sched::task::{QueueTag, ThreadRef};
use alloc::collections::VecDeque;
use alloc::vec::Vec;

struct SemaState {
    value: u32,
    /// Em ordem de chegada
    waiters: VecDeque<ThreadRef>,
}

/// Semáforo de contagem
pub struct Semaphore {
    state: Spinlock<SemaState>,
}

impl Semaphore {
    pub const fn new(value: u32) -> Self {
        Self {
            state: Spinlock::new(SemaState {
                value,
                waiters: VecDeque::new(),
            }),
        }
    }

    /// Decrementa (P). Dorme enquanto o valor for zero.
    pub fn down(&self) {
        assert!(
            !interrupt::in_interrupt(),
            "(Sema) down em contexto de interrupção"
        );
        // Interrupções ficam desligadas da checagem até o bloqueio: o `up`
        // não pode acontecer no meio.
        let _irq = IrqGuard::new();

        {
            let mut state = self.state.lock();
            if state.value > 0 {
                state.value -= 1;
                return;
            }
            state.waiters.push_back(crate::sched::current_ref());
        }

        crate::sched::block_current_on(QueueTag::Wait);
        // Acordada por `up`: a unidade já é nossa.
    }

    /// Tenta decrementar sem bloquear
    pub fn try_down(&self) -> bool {
        let mut state = self.state.lock();
        if state.value > 0 {
            state.value -= 1;
            true
        } else {
            false
        }
    }

    /// Incrementa (V) ou acorda o waiter mais prioritário. Pode ser chamado
    /// de um handler de interrupção.
    pub fn up(&self) {
        if self.release_one() {
            crate::sched::preempt_check();
        }
    }

    /// `up` sem a verificação de preempção. Retorna `true` se acordou alguém.
    pub(crate) fn release_one(&self) -> bool {
        let mut state = self.state.lock();

        let chosen = crate::sched::pick_highest(state.waiters.iter())
            .and_then(|index| state.waiters.remove(index));

        match chosen {
            Some(thread) => {
                crate::sched::unblock_ref(thread);
                true
            }
            None => {
                state.value += 1;
                false
            }
        }
    }

    /// Valor atual
    pub fn value(&self) -> u32 {
        self.state.lock().value
    }

    /// Threads esperando
    pub fn waiters(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Cópia da fila de espera
    pub(crate) fn waiter_snapshot(&self) -> Vec<ThreadRef> {
        self.state.lock().waiters.iter().copied().collect()
    }
}
