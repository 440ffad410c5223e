//! Condition Variable
//!
//! Cada waiter dorme no próprio semáforo; `signal` escolhe o waiter de maior
//! prioridade efetiva e dá `up` no semáforo dele. A thread acordada ainda
//! precisa readquirir o lock, disputando-o normalmente (com doação).

use super::lock::Lock;
use super::semaphore::Semaphore;
use super::spinlock::Spinlock;
use crate::sched::task::ThreadRef;
use alloc::collections::VecDeque;
use alloc::sync::Arc;

struct Waiter {
    thread: ThreadRef,
    sema: Arc<Semaphore>,
}

/// Condition Variable
/// Permite que threads esperem por uma condição protegida por um `Lock`.
pub struct CondVar {
    waiters: Spinlock<VecDeque<Waiter>>,
}

impl CondVar {
    pub const fn new() -> Self {
        Self {
            waiters: Spinlock::new(VecDeque::new()),
        }
    }

    /// Solta `lock`, dorme até um `signal` e readquire `lock`.
    pub fn wait(&self, lock: &Lock) {
        assert!(lock.held_by_current(), "(CondVar) wait sem segurar o lock");

        let sema = Arc::new(Semaphore::new(0));
        self.waiters.lock().push_back(Waiter {
            thread: crate::sched::current_ref(),
            sema: Arc::clone(&sema),
        });

        lock.release();
        sema.down();
        lock.acquire();
    }

    /// Acorda o waiter de maior prioridade.
    pub fn signal(&self, lock: &Lock) {
        assert!(lock.held_by_current(), "(CondVar) signal sem segurar o lock");

        let waiter = {
            let mut waiters = self.waiters.lock();
            crate::sched::pick_highest(waiters.iter().map(|w| &w.thread))
                .and_then(|index| waiters.remove(index))
        };

        if let Some(waiter) = waiter {
            waiter.sema.up();
        }
    }

    /// Acorda todos os waiters.
    pub fn broadcast(&self, lock: &Lock) {
        while self.has_waiters() {
            self.signal(lock);
        }
    }

    pub fn has_waiters(&self) -> bool {
        !self.waiters.lock().is_empty()
    }
}

impl Default for CondVar {
    fn default() -> Self {
        Self::new()
    }
}
