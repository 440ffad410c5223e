//! Interface Abstrata de CPU (HAL).
//! Define as operações que qualquer plataforma deve implementar.

pub trait CpuOps {
    /// Para a execução da CPU até a próxima interrupção (instrução HLT).
    fn halt();

    /// Desabilita interrupções globalmente (CLI).
    /// Crítico para seções atômicas no kernel.
    fn disable_interrupts();

    /// Habilita interrupções globalmente (STI).
    fn enable_interrupts();

    /// Verifica se as interrupções estão habilitadas.
    fn are_interrupts_enabled() -> bool;

    /// Habilita interrupções e espera a próxima, de forma atômica.
    ///
    /// Sem a atomicidade, uma interrupção entre o STI e o HLT seria consumida
    /// antes do HLT e a CPU dormiria um tick inteiro à toa.
    fn wait_for_interrupt() {
        Self::enable_interrupts();
        Self::halt();
    }

    /// Ativa o espaço de endereçamento cuja raiz de paginação é `root`.
    ///
    /// # Safety
    /// `root` deve apontar para uma tabela de páginas válida que mapeie o kernel.
    unsafe fn switch_address_space(root: u64);

    /// Raiz de paginação ativa no momento.
    fn address_space() -> u64;

    /// Entra em loop infinito de halt com interrupções desabilitadas.
    /// Usado em pânicos irrecuperáveis.
    fn hang() -> ! {
        Self::disable_interrupts();
        loop {
            Self::halt();
        }
    }
}
