//! Troca de contexto simulada por passagem de bastão.

use crate::arch::traits::context::{ContextOps, ThreadEntry};
use crate::sched::task::KernelStack;
use crate::sched::SchedError;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Permissão de executar, uma por thread do kernel.
struct Baton {
    running: Mutex<bool>,
    wake: Condvar,
}

impl Baton {
    fn new(running: bool) -> Arc<Self> {
        Arc::new(Self {
            running: Mutex::new(running),
            wake: Condvar::new(),
        })
    }

    fn state(&self) -> MutexGuard<'_, bool> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn give(&self) {
        *self.state() = true;
        self.wake.notify_one();
    }

    fn take(&self) {
        *self.state() = false;
    }

    fn wait(&self) {
        let mut running = self.state();
        while !*running {
            running = self.wake.wait(running).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

pub struct CpuContext {
    baton: Arc<Baton>,
}

impl ContextOps for CpuContext {
    fn bootstrap() -> Self {
        Self {
            baton: Baton::new(true),
        }
    }

    /// A thread do host nasce já esperando o bastão; a stack do kernel não é
    /// usada (a thread do host tem a sua).
    fn prepare(_stack: &KernelStack, entry: ThreadEntry) -> Result<Self, SchedError> {
        let baton = Baton::new(false);
        let mine = Arc::clone(&baton);

        std::thread::Builder::new()
            .name("kthread".into())
            .spawn(move || {
                mine.wait();
                entry();
            })
            .map_err(|_| SchedError::OutOfMemory)?;

        Ok(Self { baton })
    }

    /// Uma thread que morreu nunca recebe o bastão de volta e fica estacionada
    /// em `wait` para sempre.
    unsafe fn switch(prev: *mut Self, next: *const Self) {
        let prev = Arc::clone(&(*prev).baton);
        let next = Arc::clone(&(*next).baton);

        prev.take();
        next.give();
        prev.wait();
    }
}
