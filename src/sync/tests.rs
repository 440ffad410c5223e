//! Cenários das primitivas de sincronização na plataforma hospedada.

use crate::sched::{self, PRI_DEFAULT};
use crate::sync::{CondVar, Lock, Semaphore, Spinlock};
use crate::testing;
use alloc::sync::Arc;
use alloc::vec::Vec;

type Log<T> = Arc<Spinlock<Vec<T>>>;

fn log<T>() -> Log<T> {
    Arc::new(Spinlock::new(Vec::new()))
}

// =============================================================================
// SEMÁFORO
// =============================================================================

#[test]
fn ups_without_waiters_accumulate() {
    let _k = testing::boot();
    let sema = Semaphore::new(0);

    for expected in 1..=3 {
        sema.up();
        assert_eq!(sema.value(), expected);
    }
    sema.down();
    assert_eq!(sema.value(), 2);
    assert!(sema.try_down());
    assert!(sema.try_down());
    assert!(!sema.try_down());
    assert_eq!(sema.value(), 0);
}

#[test]
fn up_hands_unit_directly_to_waiter() {
    let _k = testing::boot();
    let sema = Arc::new(Semaphore::new(0));
    let done = log();

    {
        let (sema, done) = (sema.clone(), done.clone());
        sched::spawn("waiter", 40, move || {
            sema.down();
            done.lock().push("waiter");
        })
        .unwrap();
    }
    assert_eq!(sema.waiters(), 1);

    sema.up();
    assert_eq!(*done.lock(), ["waiter"]);
    // A unidade foi consumida pelo waiter: o contador nunca subiu.
    assert_eq!(sema.value(), 0);
    assert_eq!(sema.waiters(), 0);
}

#[test]
fn up_wakes_highest_priority_waiter_first() {
    let _k = testing::boot();
    let sema = Arc::new(Semaphore::new(0));
    let order = log();

    for priority in [32u8, 34, 33] {
        let (sema, order) = (sema.clone(), order.clone());
        sched::spawn("waiter", priority, move || {
            sema.down();
            order.lock().push(sched::get_priority());
        })
        .unwrap();
    }

    for _ in 0..3 {
        sema.up();
    }
    assert_eq!(*order.lock(), [34, 33, 32]);
}

#[test]
fn waiter_choice_counts_donations_received_while_waiting() {
    let _k = testing::boot();
    let sema = Arc::new(Semaphore::new(0));
    let lock = Arc::new(Lock::new());
    let order = log();

    {
        let (sema, lock, order) = (sema.clone(), lock.clone(), order.clone());
        sched::spawn("a", 32, move || {
            lock.acquire();
            sema.down();
            order.lock().push(("a", sched::get_priority()));
            lock.release();
        })
        .unwrap();
    }
    {
        let (lock, order) = (lock.clone(), order.clone());
        sched::spawn("h", 40, move || {
            lock.acquire();
            order.lock().push(("h", sched::get_priority()));
            lock.release();
        })
        .unwrap();
    }
    {
        let (sema, order) = (sema.clone(), order.clone());
        sched::spawn("b", 33, move || {
            sema.down();
            order.lock().push(("b", sched::get_priority()));
        })
        .unwrap();
    }

    sema.up();
    sema.up();
    assert_eq!(*order.lock(), [("a", 40), ("h", 40), ("b", 33)]);
}

// =============================================================================
// LOCK
// =============================================================================

#[test]
fn try_acquire_fails_while_another_thread_holds() {
    let _k = testing::boot();
    let lock = Arc::new(Lock::new());
    let attempts = log();

    lock.acquire();
    {
        let (lock, attempts) = (lock.clone(), attempts.clone());
        sched::spawn("trier", 40, move || {
            attempts.lock().push(lock.try_acquire());
        })
        .unwrap();
    }
    assert_eq!(*attempts.lock(), [false]);
    assert_eq!(sched::get_priority(), PRI_DEFAULT);

    lock.release();
    assert!(lock.try_acquire());
    assert!(lock.held_by_current());
    lock.release();
}

#[test]
fn lock_guard_releases_on_drop() {
    let _k = testing::boot();
    let lock = Lock::new();
    {
        let guard = lock.lock();
        assert!(guard.lock().held_by_current());
        assert_eq!(lock.holder(), Some(sched::current_tid()));
    }
    assert_eq!(lock.holder(), None);
}

#[test]
fn lock_goes_to_highest_waiter_and_holder_outranks_remaining_waiters() {
    let _k = testing::boot();

    for bases in [[33u8, 35, 34], [35, 34, 33], [34, 33, 35], [33, 33, 35]] {
        let lock = Arc::new(Lock::new());
        let go = Arc::new(Semaphore::new(0));
        // (base, efetiva ao adquirir)
        let acquired = log();

        {
            let (lock, go) = (lock.clone(), go.clone());
            sched::spawn("holder", 32, move || {
                lock.acquire();
                go.down();
                lock.release();
            })
            .unwrap();
        }
        for base in bases {
            let (lock, acquired) = (lock.clone(), acquired.clone());
            sched::spawn("contender", base, move || {
                lock.acquire();
                acquired.lock().push((base, sched::get_priority()));
                lock.release();
            })
            .unwrap();
        }
        go.up();

        let acquired = acquired.lock().clone();
        assert_eq!(acquired.len(), 3);
        for (i, &(_, effective)) in acquired.iter().enumerate() {
            let still_waiting = acquired[i + 1..].iter().map(|&(base, _)| base).max();
            assert!(still_waiting.map_or(true, |max| effective >= max), "{:?}", acquired);
        }
        let mut sorted = bases;
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(acquired.iter().map(|&(base, _)| base).collect::<Vec<_>>(), sorted);
    }
}

#[test]
#[should_panic(expected = "não é a dona")]
fn releasing_unheld_lock_is_fatal() {
    let _k = testing::boot();
    Lock::new().release();
}

#[test]
#[should_panic(expected = "aquisição recursiva")]
fn recursive_acquire_is_fatal() {
    let _k = testing::boot();
    let lock = Lock::new();
    lock.acquire();
    lock.acquire();
}

// =============================================================================
// CONDITION VARIABLE
// =============================================================================

struct Monitor {
    lock: Lock,
    cond: CondVar,
    inside: Spinlock<(u32, u32)>,
}

impl Monitor {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            lock: Lock::new(),
            cond: CondVar::new(),
            inside: Spinlock::new((0, 0)),
        })
    }

    /// Espera um sinal e registra quantas threads estavam com o lock juntas.
    fn wait_and_enter(&self, order: &Log<&'static str>, name: &'static str) {
        self.lock.acquire();
        self.cond.wait(&self.lock);
        {
            let mut inside = self.inside.lock();
            inside.0 += 1;
            inside.1 = inside.1.max(inside.0);
        }
        order.lock().push(name);
        self.inside.lock().0 -= 1;
        self.lock.release();
    }
}

#[test]
fn broadcast_wakes_all_and_each_reacquires_serially() {
    let _k = testing::boot();
    let monitor = Monitor::new();
    let order = log();

    for (name, priority) in [("w1", 32), ("w2", 33)] {
        let (monitor, order) = (monitor.clone(), order.clone());
        sched::spawn(name, priority, move || monitor.wait_and_enter(&order, name)).unwrap();
    }
    assert!(monitor.cond.has_waiters());

    monitor.lock.acquire();
    monitor.cond.broadcast(&monitor.lock);
    assert!(!monitor.cond.has_waiters());
    monitor.lock.release();

    assert_eq!(*order.lock(), ["w2", "w1"]);
    assert_eq!(monitor.inside.lock().1, 1);
    assert_eq!(monitor.lock.holder(), None);
}

#[test]
fn signal_wakes_highest_priority_waiter() {
    let _k = testing::boot();
    let monitor = Monitor::new();
    let order = log();

    for (name, priority) in [("32", 32), ("34", 34), ("33", 33)] {
        let (monitor, order) = (monitor.clone(), order.clone());
        sched::spawn(name, priority, move || monitor.wait_and_enter(&order, name)).unwrap();
    }

    for _ in 0..3 {
        monitor.lock.acquire();
        monitor.cond.signal(&monitor.lock);
        monitor.lock.release();
    }
    assert_eq!(*order.lock(), ["34", "33", "32"]);
}

#[test]
fn signal_without_waiters_is_a_no_op() {
    let _k = testing::boot();
    let monitor = Monitor::new();
    monitor.lock.acquire();
    monitor.cond.signal(&monitor.lock);
    monitor.cond.broadcast(&monitor.lock);
    monitor.lock.release();
    assert!(!monitor.cond.has_waiters());
}

#[test]
#[should_panic(expected = "signal sem segurar o lock")]
fn signal_without_lock_is_fatal() {
    let _k = testing::boot();
    let monitor = Monitor::new();
    monitor.cond.signal(&monitor.lock);
}
