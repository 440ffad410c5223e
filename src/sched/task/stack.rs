//! Stack de kernel por thread.

use crate::sched::config::{KERNEL_STACK_ALIGN, KERNEL_STACK_SIZE};
use crate::sched::SchedError;
use alloc::alloc::{alloc_zeroed, dealloc, Layout};
use core::ptr::NonNull;

/// Stack de kernel zerada, liberada no drop.
///
/// Só é liberada pelo reaper, depois que o dispatcher saiu dela.
pub struct KernelStack {
    base: NonNull<u8>,
    layout: Layout,
}

// SAFETY: a memória pertence exclusivamente a esta stack.
unsafe impl Send for KernelStack {}

impl KernelStack {
    pub fn new() -> Result<Self, SchedError> {
        let layout = Layout::from_size_align(KERNEL_STACK_SIZE, KERNEL_STACK_ALIGN)
            .map_err(|_| SchedError::OutOfMemory)?;

        // SAFETY: layout com tamanho não nulo.
        let ptr = unsafe { alloc_zeroed(layout) };
        let base = NonNull::new(ptr).ok_or(SchedError::OutOfMemory)?;

        Ok(Self { base, layout })
    }

    /// Endereço mais baixo
    pub fn bottom(&self) -> usize {
        self.base.as_ptr() as usize
    }

    /// Endereço logo acima do último byte (a stack cresce para baixo)
    pub fn top(&self) -> usize {
        self.bottom() + self.layout.size()
    }

    pub fn size(&self) -> usize {
        self.layout.size()
    }
}

impl Drop for KernelStack {
    fn drop(&mut self) {
        // SAFETY: alocada em `new` com o mesmo layout.
        unsafe { dealloc(self.base.as_ptr(), self.layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_is_aligned_and_zeroed() {
        let stack = KernelStack::new().unwrap();
        assert_eq!(stack.size(), KERNEL_STACK_SIZE);
        assert_eq!(stack.top() % KERNEL_STACK_ALIGN, 0);

        let bytes = unsafe { core::slice::from_raw_parts(stack.bottom() as *const u8, stack.size()) };
        assert!(bytes.iter().all(|&b| b == 0));
    }
}
