//! Registro de threads vivas.
//!
//! Arena de slots com geração: um `ThreadRef` guardado em uma fila continua
//! válido enquanto a thread existir e passa a resolver para `None` depois que
//! o reaper a remove, mesmo que o slot seja reutilizado.

use super::entity::{Thread, Tid};
use crate::sched::SchedError;
use alloc::boxed::Box;
use alloc::vec::Vec;

/// Referência fraca para uma thread do registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRef {
    index: u32,
    generation: u32,
}

impl ThreadRef {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(self) -> u32 {
        self.index
    }
}

struct Slot {
    generation: u32,
    thread: Option<Box<Thread>>,
}

pub struct Registry {
    slots: Vec<Slot>,
    /// Slots livres. Capacidade reservada para todos os slots, então `remove`
    /// nunca aloca.
    free: Vec<u32>,
    live: usize,
    limit: usize,
}

impl Registry {
    pub const fn new(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            limit,
        }
    }

    /// Passa a posse da TCB para o registro.
    pub fn insert(&mut self, thread: Box<Thread>) -> Result<ThreadRef, SchedError> {
        if self.live >= self.limit {
            return Err(SchedError::ThreadLimit);
        }

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let wanted = self.slots.len() + 1;
                self.slots
                    .try_reserve(1)
                    .map_err(|_| SchedError::OutOfMemory)?;
                self.free
                    .try_reserve(wanted.saturating_sub(self.free.len()))
                    .map_err(|_| SchedError::OutOfMemory)?;
                self.slots.push(Slot {
                    generation: 0,
                    thread: None,
                });
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.thread = Some(thread);
        self.live += 1;

        Ok(ThreadRef::new(index, slot.generation))
    }

    pub fn get(&self, r: ThreadRef) -> Option<&Thread> {
        self.slots
            .get(r.index as usize)
            .filter(|slot| slot.generation == r.generation)
            .and_then(|slot| slot.thread.as_deref())
    }

    pub fn get_mut(&mut self, r: ThreadRef) -> Option<&mut Thread> {
        self.slots
            .get_mut(r.index as usize)
            .filter(|slot| slot.generation == r.generation)
            .and_then(|slot| slot.thread.as_deref_mut())
    }

    /// Retira a TCB do registro. Referências antigas deixam de resolver.
    pub fn remove(&mut self, r: ThreadRef) -> Option<Box<Thread>> {
        let slot = self.slots.get_mut(r.index as usize)?;
        if slot.generation != r.generation {
            return None;
        }

        let thread = slot.thread.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(r.index);
        self.live -= 1;
        Some(thread)
    }

    /// Busca por TID (linear, só para chamadas externas)
    pub fn find(&self, tid: Tid) -> Option<ThreadRef> {
        self.iter()
            .find(|(_, thread)| thread.tid == tid)
            .map(|(r, _)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThreadRef, &Thread)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.thread
                .as_deref()
                .map(|thread| (ThreadRef::new(index as u32, slot.generation), thread))
        })
    }

    /// Threads vivas (incluindo as que aguardam o reaper)
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[cfg(test)]
    pub(crate) fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{ContextOps, CpuContext};
    use crate::sched::task::ThreadFlags;

    fn thread(tid: u32) -> Box<Thread> {
        Box::new(Thread::new(
            Tid::new(tid),
            "t",
            31,
            ThreadFlags::empty(),
            CpuContext::bootstrap(),
        ))
    }

    #[test]
    fn stale_ref_does_not_resolve_after_slot_reuse() {
        let mut registry = Registry::new(8);
        let a = registry.insert(thread(1)).unwrap();
        assert_eq!(registry.get(a).map(|t| t.tid), Some(Tid::new(1)));

        assert!(registry.remove(a).is_some());
        assert!(registry.get(a).is_none());
        assert!(registry.remove(a).is_none());

        let b = registry.insert(thread(2)).unwrap();
        assert_eq!(a.index(), b.index());
        assert!(registry.get(a).is_none());
        assert_eq!(registry.find(Tid::new(2)), Some(b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn insert_fails_at_limit() {
        let mut registry = Registry::new(2);
        registry.insert(thread(1)).unwrap();
        let second = registry.insert(thread(2)).unwrap();
        assert_eq!(registry.insert(thread(3)).err(), Some(SchedError::ThreadLimit));

        registry.remove(second);
        assert!(registry.insert(thread(4)).is_ok());
    }
}
