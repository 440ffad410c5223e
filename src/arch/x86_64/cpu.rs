//! Implementação x86_64 das operações de CPU (HAL).
//!
//! # Segurança
//! Assume modo longo (64-bit) e Ring 0.

use crate::arch::traits::CpuOps;
use core::arch::asm;

/// Bit IF do RFLAGS.
const RFLAGS_IF: u64 = 1 << 9;

pub struct X64Cpu;

impl CpuOps for X64Cpu {
    #[inline]
    fn halt() {
        unsafe { asm!("hlt", options(nomem, nostack, preserves_flags)) };
    }

    #[inline]
    fn disable_interrupts() {
        unsafe { asm!("cli", options(nomem, nostack)) };
    }

    #[inline]
    fn enable_interrupts() {
        unsafe { asm!("sti", options(nomem, nostack)) };
    }

    #[inline]
    fn are_interrupts_enabled() -> bool {
        let rflags: u64;
        unsafe {
            asm!("pushfq", "pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        rflags & RFLAGS_IF != 0
    }

    /// STI só tem efeito após a instrução seguinte, então `sti; hlt` não perde
    /// a interrupção que chegar entre as duas.
    #[inline]
    fn wait_for_interrupt() {
        unsafe { asm!("sti", "hlt", options(nomem, nostack)) };
    }

    #[inline]
    unsafe fn switch_address_space(root: u64) {
        // Recarregar o mesmo CR3 só jogaria o TLB fora.
        if Self::address_space() != root {
            asm!("mov cr3, {}", in(reg) root, options(nostack, preserves_flags));
        }
    }

    #[inline]
    fn address_space() -> u64 {
        let current: u64;
        unsafe { asm!("mov {}, cr3", out(reg) current, options(nomem, nostack, preserves_flags)) };
        current
    }
}
