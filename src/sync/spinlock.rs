//! Spinlock - bloqueio com busy-wait

use crate::core::interrupt::IrqGuard;
use core::ops::{Deref, DerefMut};

/// Spinlock - usa busy-wait, NÃO pode dormir
///
/// Desliga interrupções enquanto travado, então pode ser usado pelo handler
/// do timer e pelo código normal sobre os mesmos dados.
///
/// # Quando usar
///
/// - Seções críticas MUITO curtas
/// - Dentro de handlers de interrupção
/// - Quando não pode chamar scheduler
///
/// # Quando NÃO usar
///
/// - Seções que podem demorar
/// - Quando pode chamar funções que dormem
pub struct Spinlock<T> {
    inner: spin::Mutex<T>,
}

impl<T> Spinlock<T> {
    /// Cria novo spinlock
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
        }
    }

    /// Adquire o lock
    pub fn lock(&self) -> SpinlockGuard<'_, T> {
        // Desabilitar interrupções antes de adquirir
        let irq = IrqGuard::new();
        SpinlockGuard {
            guard: self.inner.lock(),
            _irq: irq,
        }
    }

    /// Tenta adquirir sem bloquear
    pub fn try_lock(&self) -> Option<SpinlockGuard<'_, T>> {
        let irq = IrqGuard::new();
        // Se falhar, `irq` cai aqui e restaura as interrupções
        let guard = self.inner.try_lock()?;
        Some(SpinlockGuard { guard, _irq: irq })
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

/// Guard do spinlock - libera ao sair do escopo
///
/// Os campos caem em ordem: primeiro o lock, depois as interrupções.
pub struct SpinlockGuard<'a, T> {
    guard: spin::MutexGuard<'a, T>,
    _irq: IrqGuard,
}

impl<T> Deref for SpinlockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for SpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}
