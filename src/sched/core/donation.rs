//! Doação de prioridade
//!
//! Quando uma thread espera um lock, ela entra na lista `donors` do dono e a
//! prioridade efetiva do dono passa a ser no mínimo a dela. Se o dono também
//! está esperando outro lock, a doação sobe pela cadeia `blocked_on -> dono`
//! até `DONATION_DEPTH` saltos.
//!
//! Cada doador é guardado individualmente com o lock que espera: soltar um
//! lock remove só as doações feitas por causa dele.
//!
//! A tabela de donos (`LockId -> ThreadRef`) fica no scheduler, sob a mesma
//! exclusão das filas.

use super::scheduler::{with, Scheduler};
use crate::sched::config::{DONATION_DEPTH, PRI_MIN};
use crate::sched::task::{QueueTag, ThreadRef, Tid};
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_LOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Identidade de um `Lock`, única no sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LockId(u64);

impl LockId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LOCK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl Scheduler {
    /// `waiter` vai esperar `lock`: registra a espera e doa prioridade.
    pub(crate) fn donate(&mut self, waiter: ThreadRef, lock: LockId) {
        let priority = {
            let thread = self.thread_mut(waiter);
            thread.blocked_on = Some(lock);
            thread.priority
        };

        let Some(&holder) = self.holders.get(&lock) else {
            return;
        };
        if let Some(holder) = self.threads.get_mut(holder) {
            holder.donors.push(waiter);
        }

        let mut lock = lock;
        for _ in 0..DONATION_DEPTH {
            let Some(&holder) = self.holders.get(&lock) else {
                break;
            };
            let Some(thread) = self.threads.get(holder) else {
                break;
            };
            if thread.priority >= priority {
                break;
            }
            let next = thread.blocked_on;

            crate::ktrace!("(Lock) Doando prioridade para TID:", thread.tid.as_u32());
            self.set_effective(holder, priority);

            match next {
                Some(next) => lock = next,
                None => break,
            }
        }
    }

    /// `holder` soltou `lock`: descarta as doações feitas por esperar por ele.
    pub(crate) fn revoke(&mut self, holder: ThreadRef, lock: LockId) {
        let mut donors = core::mem::take(&mut self.thread_mut(holder).donors);
        donors.retain(|&d| {
            self.threads
                .get(d)
                .is_some_and(|t| t.blocked_on != Some(lock))
        });
        self.thread_mut(holder).donors = donors;
        self.refresh_priority(holder);
    }

    /// Recalcula a prioridade efetiva: base ou maior doador, o que for maior.
    pub(crate) fn refresh_priority(&mut self, r: ThreadRef) {
        let thread = self.thread(r);
        let donated = thread
            .donors
            .iter()
            .filter_map(|&d| self.threads.get(d))
            .map(|d| d.priority)
            .max()
            .unwrap_or(PRI_MIN);
        let effective = thread.base_priority.max(donated);
        self.set_effective(r, effective);
    }

    /// Ajusta a prioridade efetiva, mantendo a fila de prontas ordenada.
    pub(crate) fn set_effective(&mut self, r: ThreadRef, priority: u8) {
        let thread = self.thread_mut(r);
        if thread.priority == priority {
            return;
        }
        thread.priority = priority;
        if thread.queue == QueueTag::Ready {
            self.ready.reposition(r, priority);
        }
    }
}

/// A thread atual não conseguiu pegar `lock` e vai dormir no semáforo dele.
pub(crate) fn prepare_lock_wait(lock: LockId) {
    with(|s| {
        let current = s.current;
        s.donate(current, lock);
    });
}

/// A thread atual pegou `lock`. `waiters` são os que continuam na fila dele e
/// passam a doar para o novo dono.
pub(crate) fn lock_acquired(lock: LockId, waiters: &[ThreadRef]) {
    with(|s| {
        let current = s.current;
        s.thread_mut(current).blocked_on = None;
        s.holders.insert(lock, current);

        for &waiter in waiters {
            let waiting = s
                .threads
                .get(waiter)
                .is_some_and(|t| t.blocked_on == Some(lock));
            if waiting {
                s.thread_mut(current).donors.push(waiter);
            }
        }
        s.refresh_priority(current);
    });
}

/// A thread atual soltou `lock`.
///
/// Soltar um lock de outra thread é violação de contrato.
pub(crate) fn lock_released(lock: LockId) {
    with(|s| {
        let current = s.current;
        match s.holders.get(&lock) {
            Some(&holder) if holder == current => {}
            _ => panic!("(Lock) release por thread que não é a dona"),
        }
        s.holders.remove(&lock);
        s.revoke(current, lock);
    });
}

/// Dono atual de `lock`
pub(crate) fn lock_holder(lock: LockId) -> Option<Tid> {
    with(|s| {
        s.holders
            .get(&lock)
            .and_then(|&h| s.threads.get(h))
            .map(|t| t.tid)
    })
}

pub(crate) fn lock_held_by_current(lock: LockId) -> bool {
    with(|s| s.holders.get(&lock) == Some(&s.current))
}
