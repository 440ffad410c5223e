//! Timer do sistema.
//!
//! Recebe a interrupção periódica, mantém o relógio e oferece as esperas:
//! - `sleep(ticks)`: bloqueia a thread (fila de sleep do scheduler).
//! - `msleep/usleep/nsleep`: converte para ticks; se der menos de um tick,
//!   cai para busy-wait calibrado.
//! - `mdelay/udelay/ndelay`: sempre busy-wait (servem com interrupções
//!   desligadas).

use super::jiffies::{self, HZ};
use crate::arch::{Cpu, CpuOps};
use core::sync::atomic::{AtomicU64, Ordering};

/// Loops de busy-wait por tick antes da calibração.
const DEFAULT_LOOPS_PER_TICK: u64 = 1 << 10;

/// Resultado de `calibrate`.
static LOOPS_PER_TICK: AtomicU64 = AtomicU64::new(DEFAULT_LOOPS_PER_TICK);

/// Programa o PIT para `HZ` interrupções por segundo.
pub fn init() {
    crate::drivers::timer::pit::init(HZ as u32);
}

/// Entrada do tick. Roda em contexto de interrupção.
pub fn handle_interrupt() {
    let now = jiffies::inc_jiffies();
    crate::sched::tick(now);
}

/// Ticks desde o boot.
#[inline]
pub fn ticks() -> u64 {
    jiffies::get_jiffies()
}

/// Ticks decorridos desde `then` (um valor retornado por `ticks()`).
#[inline]
pub fn elapsed(then: u64) -> u64 {
    ticks().saturating_sub(then)
}

/// Dorme por aproximadamente `ticks` ticks.
///
/// `0` apenas cede a CPU.
pub fn sleep(ticks: u64) {
    assert!(
        Cpu::are_interrupts_enabled(),
        "(Timer) sleep com interrupções desabilitadas"
    );

    if ticks == 0 {
        crate::sched::yield_now();
        return;
    }

    let start = self::ticks();
    crate::sched::sleep_until(start.saturating_add(ticks));
}

/// Dorme por aproximadamente `ms` milissegundos.
pub fn msleep(ms: u64) {
    real_time_sleep(ms, 1000);
}

/// Dorme por aproximadamente `us` microssegundos.
pub fn usleep(us: u64) {
    real_time_sleep(us, 1000 * 1000);
}

/// Dorme por aproximadamente `ns` nanossegundos.
pub fn nsleep(ns: u64) {
    real_time_sleep(ns, 1000 * 1000 * 1000);
}

/// Busy-wait de `ms` milissegundos. Não cede a CPU.
pub fn mdelay(ms: u64) {
    real_time_delay(ms, 1000);
}

/// Busy-wait de `us` microssegundos. Não cede a CPU.
pub fn udelay(us: u64) {
    real_time_delay(us, 1000 * 1000);
}

/// Busy-wait de `ns` nanossegundos. Não cede a CPU.
pub fn ndelay(ns: u64) {
    real_time_delay(ns, 1000 * 1000 * 1000);
}

/// Loops de busy-wait por tick atualmente em uso.
pub fn loops_per_tick() -> u64 {
    LOOPS_PER_TICK.load(Ordering::Relaxed)
}

/// Mede `loops_per_tick`.
///
/// Precisa de interrupções ligadas e de um timer de verdade andando sozinho;
/// é chamado pelo boot depois que o PIT foi programado.
pub fn calibrate() {
    assert!(
        Cpu::are_interrupts_enabled(),
        "(Timer) calibração com interrupções desabilitadas"
    );
    crate::kinfo!("(Timer) Calibrando busy-wait...");

    // Maior potência de dois que ainda cabe em um tick.
    let mut loops = DEFAULT_LOOPS_PER_TICK;
    while !too_many_loops(loops << 1) {
        loops <<= 1;
        assert!(loops != 0, "(Timer) calibração estourou");
    }

    // Refina os 8 bits seguintes.
    let high_bit = loops;
    let mut test_bit = high_bit >> 1;
    while test_bit != high_bit >> 10 {
        if !too_many_loops(loops | test_bit) {
            loops |= test_bit;
        }
        test_bit >>= 1;
    }

    LOOPS_PER_TICK.store(loops, Ordering::Relaxed);
    crate::kinfo!("(Timer) Loops por segundo=", loops.saturating_mul(HZ));
}

/// Imprime estatísticas do timer.
pub fn print_stats() {
    crate::kinfo!("(Timer) Ticks=", ticks());
}

/// `num / denom` segundos: por ticks se der pelo menos um, senão busy-wait.
fn real_time_sleep(num: u64, denom: u64) {
    let ticks = num.saturating_mul(HZ) / denom;

    assert!(
        Cpu::are_interrupts_enabled(),
        "(Timer) sleep com interrupções desabilitadas"
    );

    if ticks > 0 {
        sleep(ticks);
    } else {
        real_time_delay(num, denom);
    }
}

fn real_time_delay(num: u64, denom: u64) {
    // Numerador e denominador reduzidos por 1000 para não estourar.
    debug_assert!(denom % 1000 == 0);
    busy_wait(loops_per_tick().saturating_mul(num) / 1000 * HZ / (denom / 1000));
}

/// `true` se `loops` iterações levam mais de um tick.
fn too_many_loops(loops: u64) -> bool {
    // Alinha com a borda de um tick.
    let start = ticks();
    while ticks() == start {
        core::hint::spin_loop();
    }

    let start = ticks();
    busy_wait(loops);
    start != ticks()
}

/// Não pode ser inlined: o tempo por iteração tem que ser o mesmo em todo
/// ponto de chamada, senão a calibração não vale.
#[inline(never)]
fn busy_wait(loops: u64) {
    for _ in 0..loops {
        core::hint::spin_loop();
    }
}
