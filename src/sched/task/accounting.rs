//! Contabilidade de Recursos (Accounting)
//!
//! Tempo de CPU por thread e por categoria, medido em ticks pelo handler do
//! timer, e contadores de troca de contexto.

use super::entity::ThreadFlags;

/// Estatísticas de uso de recursos de uma thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accounting {
    /// Ticks em que esta thread estava com a CPU
    pub ticks: u64,

    /// Trocas de contexto voluntárias (yield, sleep, espera em primitiva)
    pub voluntary_switches: u64,

    /// Trocas de contexto involuntárias (fatia esgotada, preempção por prioridade)
    pub involuntary_switches: u64,

    /// Vezes em que o dispatcher escolheu esta thread
    pub dispatches: u64,
}

impl Accounting {
    /// Cria uma nova estrutura de contabilidade zerada
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            voluntary_switches: 0,
            involuntary_switches: 0,
            dispatches: 0,
        }
    }
}

/// Ticks do sistema por categoria da thread que estava rodando.
///
/// A categoria "usuário" é informativa: vem de `ThreadFlags::USER`, marcada
/// por quem instala o espaço de endereçamento.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub idle: u64,
    pub kernel: u64,
    pub user: u64,
}

impl TickStats {
    pub const fn new() -> Self {
        Self {
            idle: 0,
            kernel: 0,
            user: 0,
        }
    }

    /// Atribui um tick à categoria de `flags`.
    pub fn account(&mut self, flags: ThreadFlags) {
        if flags.contains(ThreadFlags::IDLE) {
            self.idle += 1;
        } else if flags.contains(ThreadFlags::USER) {
            self.user += 1;
        } else {
            self.kernel += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.idle + self.kernel + self.user
    }
}
