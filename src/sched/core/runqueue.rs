//! Fila de threads prontas
//!
//! Ordenada por prioridade efetiva decrescente; entre prioridades iguais vale
//! a ordem de chegada. A thread ociosa nunca entra aqui.

use crate::sched::task::ThreadRef;
use crate::sched::SchedError;
use alloc::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
struct Entry {
    thread: ThreadRef,
    priority: u8,
}

pub struct RunQueue {
    queue: VecDeque<Entry>,
}

impl RunQueue {
    pub const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Garante espaço para `threads` entradas, para inserções em contexto de
    /// interrupção não alocarem.
    pub fn reserve(&mut self, threads: usize) -> Result<(), SchedError> {
        self.queue
            .try_reserve(threads.saturating_sub(self.queue.len()))
            .map_err(|_| SchedError::OutOfMemory)
    }

    /// Insere atrás de todas as entradas com prioridade >= `priority`.
    pub fn enqueue(&mut self, thread: ThreadRef, priority: u8) {
        let at = self
            .queue
            .iter()
            .position(|e| e.priority < priority)
            .unwrap_or(self.queue.len());
        self.queue.insert(at, Entry { thread, priority });
    }

    /// Remove a thread mais prioritária (a mais antiga entre as empatadas).
    pub fn dequeue_highest(&mut self) -> Option<ThreadRef> {
        self.queue.pop_front().map(|e| e.thread)
    }

    /// Prioridade da próxima a sair, sem remover.
    pub fn peek_highest_priority(&self) -> Option<u8> {
        self.queue.front().map(|e| e.priority)
    }

    pub fn remove(&mut self, thread: ThreadRef) -> bool {
        match self.queue.iter().position(|e| e.thread == thread) {
            Some(at) => {
                self.queue.remove(at);
                true
            }
            None => false,
        }
    }

    /// Reposiciona após mudança de prioridade efetiva. A thread vai para o
    /// fim da sua nova classe.
    pub fn reposition(&mut self, thread: ThreadRef, priority: u8) {
        if self.remove(thread) {
            self.enqueue(thread, priority);
        }
    }

    pub fn contains(&self, thread: ThreadRef) -> bool {
        self.queue.iter().any(|e| e.thread == thread)
    }

    pub fn iter(&self) -> impl Iterator<Item = ThreadRef> + '_ {
        self.queue.iter().map(|e| e.thread)
    }

    /// Número de threads na fila
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Verifica se está vazia
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(i: u32) -> ThreadRef {
        ThreadRef::new(i, 0)
    }

    #[test]
    fn highest_priority_first_fifo_among_equals() {
        let mut rq = RunQueue::new();
        rq.enqueue(r(1), 10);
        rq.enqueue(r(2), 30);
        rq.enqueue(r(3), 10);
        rq.enqueue(r(4), 30);
        rq.enqueue(r(5), 20);

        assert_eq!(rq.peek_highest_priority(), Some(30));
        let order: Vec<_> = core::iter::from_fn(|| rq.dequeue_highest()).collect();
        assert_eq!(order, [r(2), r(4), r(5), r(1), r(3)]);
        assert!(rq.dequeue_highest().is_none());
        assert_eq!(rq.peek_highest_priority(), None);
    }

    #[test]
    fn reposition_moves_to_back_of_new_class() {
        let mut rq = RunQueue::new();
        rq.enqueue(r(1), 20);
        rq.enqueue(r(2), 10);
        rq.enqueue(r(3), 20);

        rq.reposition(r(2), 20);
        assert_eq!(rq.iter().collect::<Vec<_>>(), [r(1), r(3), r(2)]);

        rq.reposition(r(1), 5);
        assert_eq!(rq.iter().collect::<Vec<_>>(), [r(3), r(2), r(1)]);

        // Fora da fila: nada muda
        rq.reposition(r(9), 63);
        assert_eq!(rq.len(), 3);
        assert!(!rq.contains(r(9)));
    }
}
