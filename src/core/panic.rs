//! Panic Handler.
//!
//! Violações de invariante do scheduler (schedule() a partir de Running,
//! unblock de thread que não está bloqueada, release de lock alheio) chegam
//! aqui via `panic!`. Continuar rodando corromperia o estado do scheduler em
//! silêncio, então o kernel loga e para.
//!
//! # Comportamento
//! 1. Desabilita interrupções (evita loop de panics).
//! 2. Loga o erro na Serial.
//! 3. Trava a CPU (hlt loop).

use crate::arch::{Cpu, CpuOps};
use crate::drivers::serial::SerialWriter;
use core::fmt::Write;
use core::panic::PanicInfo;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    Cpu::disable_interrupts();

    crate::kerror!("================ KERNEL PANIC ================");

    if let Some(location) = info.location() {
        crate::kerror!("Location: "; location.file());
        crate::kerror!("Line: ", location.line());
    }

    crate::drivers::serial::emit_str("Reason:   ");
    let _ = write!(SerialWriter, "{}", info.message());
    crate::drivers::serial::emit_nl();

    crate::kerror!("==============================================");

    Cpu::hang();
}
