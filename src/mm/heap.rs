//! Kernel Heap Allocator.
//!
//! Implementa `GlobalAlloc` sobre o alocador de lista encadeada
//! (`linked_list_allocator`), que recicla memória livre.
//!
//! O lock do heap desliga interrupções: o dispatcher libera TCBs e stacks
//! também no caminho de preempção, e uma interrupção no meio de um `alloc`
//! não pode encontrar o heap travado.

use crate::sync::Spinlock;
use core::alloc::{GlobalAlloc, Layout};
use core::ptr::{self, NonNull};
use linked_list_allocator::Heap;

/// Heap global. No bare metal é o alocador da crate.
#[cfg_attr(target_os = "none", global_allocator)]
pub static KERNEL_HEAP: KernelHeap = KernelHeap::empty();

/// Inicializa o heap global com a região `[start, start + size)`.
///
/// # Safety
/// A região deve estar mapeada, sem uso e viver para sempre. Só pode ser
/// chamada uma vez.
pub unsafe fn init(start: usize, size: usize) {
    KERNEL_HEAP.init(start, size);
    crate::kinfo!("(Heap) Heap inicializado. Tamanho=", size);
}

/// Uso do heap global
pub fn stats() -> HeapStats {
    KERNEL_HEAP.stats()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    pub size: usize,
    pub used: usize,
    pub free: usize,
}

pub struct KernelHeap {
    inner: Spinlock<Heap>,
}

impl KernelHeap {
    pub const fn empty() -> Self {
        Self {
            inner: Spinlock::new(Heap::empty()),
        }
    }

    /// # Safety
    /// Mesmas condições de `init`.
    pub unsafe fn init(&self, start: usize, size: usize) {
        self.inner.lock().init(start as *mut u8, size);
    }

    pub fn stats(&self) -> HeapStats {
        let heap = self.inner.lock();
        HeapStats {
            size: heap.size(),
            used: heap.used(),
            free: heap.free(),
        }
    }
}

unsafe impl GlobalAlloc for KernelHeap {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.inner
            .lock()
            .allocate_first_fit(layout)
            .map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if let Some(ptr) = NonNull::new(ptr) {
            self.inner.lock().deallocate(ptr, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, align(16))]
    struct Arena([u8; 4096]);

    #[test]
    fn allocations_are_tracked_and_recycled() {
        let _k = crate::testing::exclusive();
        let arena = Box::leak(Box::new(Arena([0; 4096])));
        let heap = KernelHeap::empty();
        unsafe { heap.init(arena.0.as_mut_ptr() as usize, arena.0.len()) };

        let layout = Layout::from_size_align(256, 16).unwrap();
        let a = unsafe { heap.alloc(layout) };
        assert!(!a.is_null());
        assert_eq!(a as usize % 16, 0);
        assert!(heap.stats().used >= 256);

        unsafe { heap.dealloc(a, layout) };
        assert_eq!(heap.stats().used, 0);
        assert_eq!(heap.stats().free, heap.stats().size);

        // Maior que a arena inteira
        let huge = Layout::from_size_align(8192, 16).unwrap();
        assert!(unsafe { heap.alloc(huge) }.is_null());
    }
}
