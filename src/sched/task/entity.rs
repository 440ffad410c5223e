//! Thread Control Block

use super::accounting::Accounting;
use super::registry::ThreadRef;
use super::stack::KernelStack;
use super::state::ThreadState;
use crate::arch::CpuContext;
use crate::sched::config::THREAD_NAME_LEN;
use crate::sched::core::donation::LockId;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Identificador de thread. Monotônico, nunca reutilizado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tid(u32);

impl Tid {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nome de diagnóstico, guardado inline (sem alocação).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ThreadName {
    buf: [u8; THREAD_NAME_LEN],
    len: u8,
}

impl ThreadName {
    /// Copia `name`, truncando em uma fronteira de caractere.
    pub fn new(name: &str) -> Self {
        let mut len = name.len().min(THREAD_NAME_LEN);
        while !name.is_char_boundary(len) {
            len -= 1;
        }

        let mut buf = [0u8; THREAD_NAME_LEN];
        buf[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self {
            buf,
            len: len as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        // Só bytes de um &str cortado em fronteira de caractere chegam aqui.
        core::str::from_utf8(&self.buf[..self.len as usize]).unwrap_or("?")
    }
}

impl fmt::Debug for ThreadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for ThreadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Propriedades fixas de uma thread
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ThreadFlags: u8 {
        /// Thread que já rodava quando o scheduler foi iniciado
        const INITIAL = 1 << 0;
        /// A thread ociosa. Nunca entra na fila de prontas nem na de sleep.
        const IDLE = 1 << 1;
        /// Tem espaço de endereçamento próprio (ticks contam como usuário)
        const USER = 1 << 2;
    }
}

/// Em qual contêiner a thread está. Uma thread está em no máximo um.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueTag {
    None,
    /// Fila de prontas do scheduler
    Ready,
    /// Fila de sleep
    Sleep,
    /// Lista de espera de uma primitiva de sincronização
    Wait,
}

/// Corpo de uma thread ainda não iniciada.
pub type ThreadBody = Box<dyn FnOnce() + Send + 'static>;

/// Thread Control Block
pub struct Thread {
    /// ID único
    pub tid: Tid,
    /// Nome (debug)
    pub name: ThreadName,
    /// Estado atual
    pub state: ThreadState,
    pub flags: ThreadFlags,
    /// Prioridade pedida pela própria thread
    pub base_priority: u8,
    /// Prioridade efetiva (base ou doada, a maior)
    pub priority: u8,
    /// Contêiner atual
    pub queue: QueueTag,
    /// Momento de acordar (jiffies) se estiver dormindo
    pub wake_at: Option<u64>,
    /// Lock pelo qual está esperando
    pub blocked_on: Option<LockId>,
    /// Threads esperando locks desta, cada uma doando a própria prioridade
    pub donors: Vec<ThreadRef>,
    /// Raiz de paginação, se tiver espaço de usuário
    pub address_space: Option<u64>,
    /// Estatísticas de contabilidade
    pub accounting: Accounting,
    /// Contexto de CPU salvo
    pub context: CpuContext,
    /// Stack de kernel (a thread inicial usa a do boot)
    pub stack: Option<KernelStack>,
    /// Consumido pelo trampolim na primeira execução
    pub body: Option<ThreadBody>,
}

impl Thread {
    /// Cria a TCB em estado Blocked, fora de qualquer fila.
    pub fn new(
        tid: Tid,
        name: &str,
        priority: u8,
        flags: ThreadFlags,
        context: CpuContext,
    ) -> Self {
        Self {
            tid,
            name: ThreadName::new(name),
            state: ThreadState::Blocked,
            flags,
            base_priority: priority,
            priority,
            queue: QueueTag::None,
            wake_at: None,
            blocked_on: None,
            donors: Vec::new(),
            address_space: None,
            accounting: Accounting::new(),
            context,
            stack: None,
            body: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.flags.contains(ThreadFlags::IDLE)
    }

    /// Prioridade recebida por doação (0 se nenhuma)
    pub fn donated_priority(&self) -> u8 {
        self.priority.saturating_sub(self.base_priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_truncates_on_char_boundary() {
        assert_eq!(ThreadName::new("worker").as_str(), "worker");
        assert_eq!(ThreadName::new("a-very-long-thread-name").as_str(), "a-very-long-thre");
        // 'ç' ocupa 2 bytes e cruzaria o limite de 16
        assert_eq!(ThreadName::new("aaaaaaaaaaaaaaaç").as_str(), "aaaaaaaaaaaaaaa");
    }
}
