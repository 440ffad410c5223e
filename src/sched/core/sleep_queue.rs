//! Sleep Queue - threads dormindo até um tick
//!
//! Cada entrada é uma thread Blocked com o prazo absoluto (em jiffies). A
//! passada de despertar roda no handler do timer: não bloqueia nem aloca, e
//! guarda o menor prazo restante para que ticks sem nada vencido custem uma
//! comparação.

use crate::sched::task::ThreadRef;
use crate::sched::SchedError;
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy)]
struct Sleeper {
    thread: ThreadRef,
    deadline: u64,
}

pub struct SleepQueue {
    sleepers: Vec<Sleeper>,
    /// Menor prazo entre os que dormem (`u64::MAX` se vazia)
    next_wake: u64,
}

impl SleepQueue {
    pub const fn new() -> Self {
        Self {
            sleepers: Vec::new(),
            next_wake: u64::MAX,
        }
    }

    pub fn reserve(&mut self, threads: usize) -> Result<(), SchedError> {
        self.sleepers
            .try_reserve(threads.saturating_sub(self.sleepers.len()))
            .map_err(|_| SchedError::OutOfMemory)
    }

    pub fn insert(&mut self, thread: ThreadRef, deadline: u64) {
        self.sleepers.push(Sleeper { thread, deadline });
        self.next_wake = self.next_wake.min(deadline);
    }

    /// Menor prazo pendente
    pub fn next_wake(&self) -> Option<u64> {
        (!self.sleepers.is_empty()).then_some(self.next_wake)
    }

    /// Há alguém com prazo <= `now`?
    #[inline]
    pub fn is_due(&self, now: u64) -> bool {
        now >= self.next_wake
    }

    /// Remove todas as entradas vencidas em `now`, entregando cada uma a
    /// `wake` na ordem em que dormiram. Retorna quantas acordaram.
    pub fn wake_due(&mut self, now: u64, mut wake: impl FnMut(ThreadRef)) -> usize {
        if !self.is_due(now) {
            return 0;
        }

        let before = self.sleepers.len();
        let mut next_wake = u64::MAX;
        self.sleepers.retain(|s| {
            if s.deadline <= now {
                wake(s.thread);
                false
            } else {
                next_wake = next_wake.min(s.deadline);
                true
            }
        });
        self.next_wake = next_wake;

        before - self.sleepers.len()
    }

    pub fn remove(&mut self, thread: ThreadRef) -> bool {
        let before = self.sleepers.len();
        self.sleepers.retain(|s| s.thread != thread);
        self.next_wake = self
            .sleepers
            .iter()
            .map(|s| s.deadline)
            .min()
            .unwrap_or(u64::MAX);
        before != self.sleepers.len()
    }

    pub fn len(&self) -> usize {
        self.sleepers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sleepers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(i: u32) -> ThreadRef {
        ThreadRef::new(i, 0)
    }

    #[test]
    fn wakes_only_due_entries_and_caches_next_deadline() {
        let mut q = SleepQueue::new();
        q.insert(r(1), 150);
        q.insert(r(2), 120);
        q.insert(r(3), 150);
        assert_eq!(q.next_wake(), Some(120));

        let mut woken = Vec::new();
        assert_eq!(q.wake_due(119, |t| woken.push(t)), 0);
        assert_eq!(q.wake_due(120, |t| woken.push(t)), 1);
        assert_eq!(woken, [r(2)]);
        assert_eq!(q.next_wake(), Some(150));

        assert!(!q.is_due(149));
        assert_eq!(q.wake_due(160, |t| woken.push(t)), 2);
        assert_eq!(woken, [r(2), r(1), r(3)]);
        assert_eq!(q.next_wake(), None);
        assert!(!q.is_due(u64::MAX - 1));
    }

    #[test]
    fn remove_recomputes_deadline() {
        let mut q = SleepQueue::new();
        q.insert(r(1), 10);
        q.insert(r(2), 20);
        assert!(q.remove(r(1)));
        assert_eq!(q.next_wake(), Some(20));
        assert!(!q.remove(r(1)));
    }
}
