//! Lock com dono e doação de prioridade
//!
//! Um semáforo binário mais o dono. Quem espera um lock travado doa a
//! prioridade efetiva ao dono (e, em cadeia, ao dono do lock que o dono
//! espera). Não é recursivo.

use super::semaphore::Semaphore;
use crate::core::interrupt::{self, IrqGuard};
use crate::sched::core::donation::{self, LockId};
use crate::sched::Tid;

pub struct Lock {
    id: LockId,
    sema: Semaphore,
}

impl Lock {
    pub fn new() -> Self {
        Self {
            id: LockId::next(),
            sema: Semaphore::new(1),
        }
    }

    pub fn id(&self) -> LockId {
        self.id
    }

    /// Adquire o lock, dormindo se necessário.
    ///
    /// Adquirir um lock que a própria thread já tem é erro fatal.
    pub fn acquire(&self) {
        assert!(
            !interrupt::in_interrupt(),
            "(Lock) acquire em contexto de interrupção"
        );
        assert!(!self.held_by_current(), "(Lock) aquisição recursiva");

        let _irq = IrqGuard::new();
        if !self.sema.try_down() {
            crate::ktrace!("(Lock) Contenção no lock:", self.id.as_u64());
            donation::prepare_lock_wait(self.id);
            self.sema.down();
        }

        let waiters = self.sema.waiter_snapshot();
        donation::lock_acquired(self.id, &waiters);
    }

    /// Adquire sem bloquear.
    pub fn try_acquire(&self) -> bool {
        assert!(!self.held_by_current(), "(Lock) aquisição recursiva");

        let _irq = IrqGuard::new();
        if !self.sema.try_down() {
            return false;
        }
        donation::lock_acquired(self.id, &[]);
        true
    }

    /// Solta o lock. Só o dono pode chamar.
    ///
    /// As doações feitas por causa deste lock são desfeitas antes de acordar
    /// o próximo; depois, se alguma thread pronta ficou mais prioritária, a
    /// atual cede a CPU.
    pub fn release(&self) {
        {
            let _irq = IrqGuard::new();
            donation::lock_released(self.id);
            self.sema.release_one();
        }
        crate::sched::preempt_check();
    }

    /// A thread atual é a dona?
    pub fn held_by_current(&self) -> bool {
        donation::lock_held_by_current(self.id)
    }

    /// Dono atual
    pub fn holder(&self) -> Option<Tid> {
        donation::lock_holder(self.id)
    }

    /// Adquire e devolve um guard que solta no drop.
    pub fn lock(&self) -> LockGuard<'_> {
        self.acquire();
        LockGuard { lock: self }
    }
}

impl Default for Lock {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard de `Lock::lock`
#[must_use = "o lock é solto quando o guard sai de escopo"]
pub struct LockGuard<'a> {
    lock: &'a Lock,
}

impl LockGuard<'_> {
    pub fn lock(&self) -> &Lock {
        self.lock
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn uncontended_round_trip_restores_state() {
        let _k = testing::boot();
        let lock = Lock::new();
        assert_eq!(lock.sema.value(), 1);

        lock.acquire();
        assert_eq!(lock.sema.value(), 0);
        assert_eq!(lock.holder(), Some(crate::sched::current_tid()));

        lock.release();
        assert_eq!(lock.sema.value(), 1);
        assert_eq!(lock.holder(), None);
        assert!(!lock.held_by_current());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Lock::new().id(), Lock::new().id());
    }
}
