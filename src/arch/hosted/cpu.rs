//! CPU simulada.

use crate::arch::traits::CpuOps;
use crate::core::time::jiffies;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Flag IF simulado. Começa desligado, como no boot.
static INTERRUPTS: AtomicBool = AtomicBool::new(false);

/// Última raiz de paginação ativada.
static ADDRESS_SPACE: AtomicU64 = AtomicU64::new(0);

/// Acima disso a simulação está girando sem progresso (teste travado).
const RUNAWAY_TICKS: u64 = 50_000_000;

pub struct HostCpu;

impl CpuOps for HostCpu {
    /// Dormir até a próxima interrupção = entregar um tick agora.
    fn halt() {
        timer_interrupt();
    }

    fn disable_interrupts() {
        INTERRUPTS.store(false, Ordering::SeqCst);
    }

    fn enable_interrupts() {
        INTERRUPTS.store(true, Ordering::SeqCst);
    }

    fn are_interrupts_enabled() -> bool {
        INTERRUPTS.load(Ordering::SeqCst)
    }

    unsafe fn switch_address_space(root: u64) {
        ADDRESS_SPACE.store(root, Ordering::SeqCst);
    }

    fn address_space() -> u64 {
        ADDRESS_SPACE.load(Ordering::SeqCst)
    }

    fn hang() -> ! {
        std::process::abort()
    }
}

/// Raiz de paginação ativa (0 = espaço do kernel).
pub fn active_address_space() -> u64 {
    HostCpu::address_space()
}

/// Volta para o espaço do kernel (raiz 0), como no boot.
pub fn reset_address_space() {
    ADDRESS_SPACE.store(0, Ordering::SeqCst);
}

/// Entrega uma interrupção de timer à thread que está com a CPU.
///
/// Segue o caminho do hardware: entra com interrupções desligadas, roda o
/// handler e só religa na volta (depois de um eventual yield).
pub fn timer_interrupt() {
    assert!(
        HostCpu::are_interrupts_enabled(),
        "(Host) interrupção de timer com interrupções desabilitadas"
    );

    if jiffies::get_jiffies() > RUNAWAY_TICKS {
        std::eprintln!("(Host) relógio simulado disparou: nenhuma thread progride");
        std::process::abort();
    }

    HostCpu::disable_interrupts();
    crate::core::interrupt::dispatch(crate::core::time::timer::handle_interrupt, || {});
    HostCpu::enable_interrupts();
}
