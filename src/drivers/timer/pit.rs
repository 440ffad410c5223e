//! Timer PIT (Programmable Interval Timer)
//!
//! Driver para o 8253/8254 PIT. O canal 0 gera a IRQ0 periódica que alimenta
//! `core::time::timer::handle_interrupt`.

/// Frequência de entrada do PIT.
pub const PIT_FREQUENCY: u32 = 1_193_180;

/// Menor frequência cujo divisor cabe em 16 bits.
pub const MIN_HZ: u32 = 19;

/// Maior frequência razoável para o tick do kernel.
pub const MAX_HZ: u32 = 1000;

/// Canal 0, lobyte/hibyte, modo 2 (rate generator), binário.
const PIT_MODE_RATE_GENERATOR: u8 = 0x34;

#[cfg(target_os = "none")]
const PIT_CHANNEL_0: u16 = 0x40;
#[cfg(target_os = "none")]
const PIT_COMMAND: u16 = 0x43;

/// Divisor do PIT para `hz` interrupções por segundo, arredondado.
pub const fn divisor(hz: u32) -> u16 {
    ((PIT_FREQUENCY + hz / 2) / hz) as u16
}

/// Programa o canal 0 para `hz` interrupções por segundo.
pub fn init(hz: u32) {
    assert!(
        (MIN_HZ..=MAX_HZ).contains(&hz),
        "(PIT) frequência do timer fora da faixa suportada"
    );

    let count = divisor(hz);
    crate::kinfo!("(PIT) Divisor=", count);
    program(count);
}

#[cfg(target_os = "none")]
fn program(count: u16) {
    use crate::arch::x86_64::ports::outb;

    outb(PIT_COMMAND, PIT_MODE_RATE_GENERATOR);
    outb(PIT_CHANNEL_0, (count & 0xFF) as u8);
    outb(PIT_CHANNEL_0, (count >> 8) as u8);
}

/// Sem PIT no host: os ticks vêm de `arch::hosted::timer_interrupt`.
#[cfg(not(target_os = "none"))]
fn program(_count: u16) {
    let _ = PIT_MODE_RATE_GENERATOR;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_rounds_to_nearest() {
        assert_eq!(divisor(100), 11932);
        assert_eq!(divisor(1000), 1193);
        assert_eq!(divisor(MIN_HZ), 62799);
    }

    #[test]
    #[should_panic(expected = "fora da faixa")]
    fn rejects_frequency_that_overflows_divisor() {
        init(MIN_HZ - 1);
    }
}
