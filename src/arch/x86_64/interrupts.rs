//! Ponto de entrada da IRQ do timer.
//!
//! A IDT e o stub de entrada (que salva os registradores e faz o `iretq`) são
//! do código de boot. O stub do vetor do PIT chama `timer_irq_handler` com
//! interrupções desabilitadas.

use super::ports::outb;

/// Porta de comando do PIC mestre.
const PIC1_COMMAND: u16 = 0x20;
/// End Of Interrupt.
const PIC_EOI: u8 = 0x20;

/// Handler da IRQ0 (PIT).
///
/// O EOI é enviado antes de um eventual yield: a thread que assumir a CPU
/// precisa continuar recebendo ticks.
#[no_mangle]
pub extern "C" fn timer_irq_handler() {
    crate::core::interrupt::dispatch(crate::core::time::timer::handle_interrupt, || {
        outb(PIC1_COMMAND, PIC_EOI)
    });
}
