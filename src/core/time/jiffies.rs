//! Contador de Jiffies (Ticks)
//!
//! "Jiffies" é o termo histórico (do Linux) para ticks de relógio.
//!
//! Detalhes de Implementação:
//! - AtomicU64: leituras concorrentes com o handler do timer nunca veem um
//!   valor rasgado, mesmo com interrupções ligadas.
//! - Incrementado apenas pelo handler de interrupção do timer.

use core::sync::atomic::{AtomicU64, Ordering};

/// Ticks desde o boot.
static JIFFIES: AtomicU64 = AtomicU64::new(0);

/// Frequência do Tick (Ticks por segundo)
pub const HZ: u64 = 100;

/// Retorna o número atual de jiffies.
#[inline]
pub fn get_jiffies() -> u64 {
    JIFFIES.load(Ordering::SeqCst)
}

/// Incrementa o contador e retorna o novo valor.
/// Deve ser chamado APENAS pelo handler de interrupção do timer.
#[inline]
pub fn inc_jiffies() -> u64 {
    JIFFIES.fetch_add(1, Ordering::SeqCst) + 1
}

/// Converte segundos para jiffies.
#[inline]
pub const fn seconds_to_jiffies(seconds: u64) -> u64 {
    seconds * HZ
}

/// Converte milisegundos para jiffies (arredonda para baixo).
#[inline]
pub const fn millis_to_jiffies(millis: u64) -> u64 {
    (millis * HZ) / 1000
}

/// Posiciona o relógio (testes que precisam de um tick de partida conhecido).
#[cfg(test)]
pub(crate) fn set(value: u64) {
    JIFFIES.store(value, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_follow_hz() {
        assert_eq!(seconds_to_jiffies(3), 3 * HZ);
        assert_eq!(millis_to_jiffies(1000), HZ);
        assert_eq!(millis_to_jiffies(25), 2);
        assert_eq!(millis_to_jiffies(9), 0);
    }
}
