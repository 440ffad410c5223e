//! Estados de thread

/// Estado de uma thread
///
/// Running -> Ready (yield), Blocked (sleep, semáforo, lock, condvar) ou
/// Dying (exit). Só Ready volta a Running, escolhida pelo dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// Executando. Exatamente uma thread por vez.
    Running,
    /// Na fila de prontas (ou a idle, que nunca entra nela)
    Ready,
    /// Esperando algo: tick, semáforo, lock
    Blocked,
    /// Terminada, esperando o dispatcher sair da stack dela
    Dying,
}

impl ThreadState {
    /// Verifica se pode ser escalonada
    pub const fn is_runnable(self) -> bool {
        matches!(self, Self::Ready | Self::Running)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Ready => "ready",
            Self::Blocked => "blocked",
            Self::Dying => "dying",
        }
    }
}
