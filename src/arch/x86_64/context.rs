//! Context switch x86_64.
//!
//! Salva e restaura apenas os registradores callee-saved da SysV ABI: o resto
//! já foi salvo pelo compilador no chamador de `switch`.

use crate::arch::traits::context::{ContextOps, ThreadEntry};
use crate::sched::task::KernelStack;
use crate::sched::SchedError;

/// Contexto de CPU (registradores salvos)
#[repr(C)]
pub struct CpuContext {
    // Callee-saved registers (SysV ABI)
    pub rbx: u64,
    pub rbp: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,

    // Stack pointer
    pub rsp: u64,

    // Instruction pointer (return address)
    pub rip: u64,
}

impl CpuContext {
    /// Cria CpuContext zerado
    pub const fn new() -> Self {
        Self {
            rbx: 0,
            rbp: 0,
            r12: 0,
            r13: 0,
            r14: 0,
            r15: 0,
            rsp: 0,
            rip: 0,
        }
    }
}

impl ContextOps for CpuContext {
    fn bootstrap() -> Self {
        Self::new()
    }

    fn prepare(stack: &KernelStack, entry: ThreadEntry) -> Result<Self, SchedError> {
        // O `ret` do switch consome o slot em [rsp]; o entry começa com
        // rsp ≡ 8 (mod 16), exatamente como depois de um `call`.
        let top = (stack.top() as u64) & !0xF;
        let mut ctx = Self::new();
        ctx.rsp = top - 16;
        ctx.rip = entry as usize as u64;
        Ok(ctx)
    }

    unsafe fn switch(prev: *mut Self, next: *const Self) {
        context_switch_asm(prev as u64, next as u64);
    }
}

// RDI = prev (mut ptr), RSI = next (ptr)
// Offsets (CpuContext):
// 0:rbx, 8:rbp, 16:r12, 24:r13, 32:r14, 40:r15, 48:rsp, 56:rip
core::arch::global_asm!(
    r#"
.global context_switch_asm
context_switch_asm:
    mov [rdi + 0x00], rbx
    mov [rdi + 0x08], rbp
    mov [rdi + 0x10], r12
    mov [rdi + 0x18], r13
    mov [rdi + 0x20], r14
    mov [rdi + 0x28], r15
    mov [rdi + 0x30], rsp

    // Endereço de retorno do chamador
    mov rax, [rsp]
    mov [rdi + 0x38], rax

    mov rbx, [rsi + 0x00]
    mov rbp, [rsi + 0x08]
    mov r12, [rsi + 0x10]
    mov r13, [rsi + 0x18]
    mov r14, [rsi + 0x20]
    mov r15, [rsi + 0x28]
    mov rsp, [rsi + 0x30]

    // Sobrescreve o slot em [rsp] e consome com ret (sem push: não vaza 8 bytes)
    mov rax, [rsi + 0x38]
    mov [rsp], rax
    ret
"#
);

extern "C" {
    fn context_switch_asm(prev: u64, next: u64);
}
