//! Erros recuperáveis do scheduler.
//!
//! Só falta de recursos vira erro. Violação de invariante (schedule() com a
//! thread em Running, unblock de thread que não está bloqueada) ou de contrato
//! (release de lock alheio) é `panic!`: o estado do scheduler não é confiável
//! depois disso.

use core::fmt;

/// Falha ao criar uma thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// Sem memória para a TCB, a stack ou as filas.
    OutOfMemory,
    /// `MAX_THREADS` threads vivas.
    ThreadLimit,
}

impl SchedError {
    /// Valor negativo para retorno de syscall (ENOMEM / EAGAIN).
    pub const fn as_isize(self) -> isize {
        match self {
            Self::OutOfMemory => -12,
            Self::ThreadLimit => -11,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfMemory => "sem memória para criar a thread",
            Self::ThreadLimit => "limite de threads atingido",
        }
    }
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_negative_errno() {
        assert_eq!(SchedError::OutOfMemory.as_isize(), -12);
        assert_eq!(SchedError::ThreadLimit.as_isize(), -11);
        assert_eq!(
            std::format!("{}", SchedError::ThreadLimit),
            "limite de threads atingido"
        );
    }
}
