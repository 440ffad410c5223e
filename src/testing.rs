//! Suporte aos testes no host.
//!
//! O scheduler, o flag de interrupção e o relógio são globais: testes que
//! mexem neles rodam um por vez, segurando `KERNEL`.

use crate::core::interrupt;
use crate::core::time::jiffies;
use std::sync::{Mutex, MutexGuard, PoisonError};

static KERNEL: Mutex<()> = Mutex::new(());

/// Acesso exclusivo ao estado global, com interrupções desligadas.
pub(crate) fn exclusive() -> MutexGuard<'static, ()> {
    let guard = KERNEL.lock().unwrap_or_else(PoisonError::into_inner);
    interrupt::reset();
    guard
}

/// Sobe um kernel novo: a thread do teste vira "main" (TID 1, prioridade
/// padrão) com a idle criada e interrupções ligadas, no tick 0.
pub(crate) fn boot() -> MutexGuard<'static, ()> {
    let guard = exclusive();
    jiffies::set(0);
    crate::arch::platform::reset_address_space();
    crate::sched::init();
    crate::sched::start();
    guard
}
