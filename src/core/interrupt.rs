//! Contexto de interrupção e exclusão por desligamento de IRQs.
//!
//! Em uma CPU única, desligar interrupções é a única exclusão mútua abaixo das
//! primitivas de sincronização: com IF=0 nada mais roda até a thread atual
//! religar as interrupções ou trocar de contexto.
//!
//! Handlers rodam dentro de `dispatch`. Eles não podem dormir nem trocar de
//! stack; quando precisam de uma preempção (fatia de tempo esgotada, thread
//! mais prioritária acordada) chamam `yield_on_return` e a troca acontece na
//! saída do handler.

use crate::arch::{Cpu, CpuOps};
use core::sync::atomic::{AtomicBool, Ordering};

/// Executando dentro de um handler de interrupção externa.
static IN_INTERRUPT: AtomicBool = AtomicBool::new(false);

/// O handler pediu um yield para quando a interrupção retornar.
static YIELD_ON_RETURN: AtomicBool = AtomicBool::new(false);

/// Nível de interrupção.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrLevel {
    On,
    Off,
}

/// Nível atual.
#[inline]
pub fn level() -> IntrLevel {
    if Cpu::are_interrupts_enabled() {
        IntrLevel::On
    } else {
        IntrLevel::Off
    }
}

/// Ajusta o nível e retorna o anterior.
pub fn set_level(new: IntrLevel) -> IntrLevel {
    match new {
        IntrLevel::On => enable(),
        IntrLevel::Off => disable(),
    }
}

/// Desliga interrupções e retorna o nível anterior.
#[inline]
pub fn disable() -> IntrLevel {
    let old = level();
    Cpu::disable_interrupts();
    old
}

/// Liga interrupções e retorna o nível anterior.
pub fn enable() -> IntrLevel {
    assert!(
        !in_interrupt(),
        "(IRQ) tentativa de religar interrupções dentro de um handler"
    );
    let old = level();
    Cpu::enable_interrupts();
    old
}

/// Guard de escopo com interrupções desligadas.
///
/// Restaura o nível anterior no drop, então aninha sem problemas. Pode ficar
/// vivo através de uma troca de contexto: quando a thread voltar a rodar, o
/// drop restaura o nível que *ela* tinha.
#[must_use = "as interrupções são restauradas quando o guard sai de escopo"]
pub struct IrqGuard {
    previous: IntrLevel,
}

impl IrqGuard {
    pub fn new() -> Self {
        Self {
            previous: disable(),
        }
    }
}

impl Default for IrqGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IrqGuard {
    fn drop(&mut self) {
        if self.previous == IntrLevel::On {
            Cpu::enable_interrupts();
        }
    }
}

/// `true` dentro de um handler de interrupção externa.
#[inline]
pub fn in_interrupt() -> bool {
    IN_INTERRUPT.load(Ordering::SeqCst)
}

/// Pede que a thread atual ceda a CPU assim que o handler terminar.
pub fn yield_on_return() {
    assert!(
        in_interrupt(),
        "(IRQ) yield_on_return fora de contexto de interrupção"
    );
    YIELD_ON_RETURN.store(true, Ordering::SeqCst);
}

/// Executa um handler de interrupção externa.
///
/// Pré-condição: interrupções desligadas (o hardware já fez isso na entrada).
/// `acknowledge` avisa o controlador de interrupções antes de um eventual
/// yield, para que a próxima thread continue recebendo IRQs.
pub fn dispatch(handler: impl FnOnce(), acknowledge: impl FnOnce()) {
    assert!(
        !Cpu::are_interrupts_enabled(),
        "(IRQ) dispatch com interrupções habilitadas"
    );
    assert!(
        !IN_INTERRUPT.swap(true, Ordering::SeqCst),
        "(IRQ) interrupção externa aninhada"
    );
    YIELD_ON_RETURN.store(false, Ordering::SeqCst);

    handler();
    acknowledge();

    IN_INTERRUPT.store(false, Ordering::SeqCst);

    if YIELD_ON_RETURN.swap(false, Ordering::SeqCst) {
        crate::sched::preempt_current();
    }
}

/// Volta ao estado de boot (thread, interrupções desligadas).
#[cfg(test)]
pub(crate) fn reset() {
    Cpu::disable_interrupts();
    IN_INTERRUPT.store(false, Ordering::SeqCst);
    YIELD_ON_RETURN.store(false, Ordering::SeqCst);
}
