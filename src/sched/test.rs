//! Testes do Escalonador (Scheduler)
//!
//! Self-tests que rodam na thread inicial depois de `sched::start()`.

use crate::core::time::timer;
use crate::klib::{run_test_suite, SuiteReport, TestCase, TestResult};
use crate::sched::core::{RunQueue, SleepQueue};
use crate::sched::task::ThreadRef;
use crate::sched::{self, PRI_MAX};
use crate::sync::Spinlock;
use alloc::sync::Arc;
use alloc::vec::Vec;

const TESTS: &[TestCase] = &[
    TestCase::new("runqueue_priority_fifo", test_runqueue_order),
    TestCase::new("sleep_queue_deadline", test_sleep_queue),
    TestCase::new("spawn_preempts_lower", test_spawn_preempts),
    TestCase::new("yield_round_robin", test_yield_round_robin),
    TestCase::new("exit_reclaims_thread", test_exit_reclaims),
    TestCase::new("msleep_blocks_ticks", test_msleep),
];

/// Executa todos os testes de scheduler
pub fn run_sched_tests() -> SuiteReport {
    crate::kinfo!("╔════════════════════════════════════════╗");
    crate::kinfo!("║     🧪 TESTES DE SCHEDULER             ║");
    crate::kinfo!("╚════════════════════════════════════════╝");

    let report = run_test_suite("sched", TESTS);

    if report.all_passed() {
        crate::kinfo!("╔════════════════════════════════════════╗");
        crate::kinfo!("║  ✅ SCHEDULER VALIDADO!                ║");
        crate::kinfo!("╚════════════════════════════════════════╝");
    }
    report
}

fn test_runqueue_order() -> TestResult {
    let mut rq = RunQueue::new();
    let a = ThreadRef::new(0, 0);
    let b = ThreadRef::new(1, 0);
    let c = ThreadRef::new(2, 0);
    rq.enqueue(a, 10);
    rq.enqueue(b, 20);
    rq.enqueue(c, 10);

    let ok = rq.dequeue_highest() == Some(b)
        && rq.dequeue_highest() == Some(a)
        && rq.dequeue_highest() == Some(c)
        && rq.is_empty();
    TestResult::check(ok)
}

fn test_sleep_queue() -> TestResult {
    let mut q = SleepQueue::new();
    q.insert(ThreadRef::new(0, 0), 30);
    q.insert(ThreadRef::new(1, 0), 10);

    let mut woken = 0;
    let early = q.wake_due(9, |_| woken += 1);
    let first = q.wake_due(10, |_| woken += 1);
    TestResult::check(early == 0 && first == 1 && woken == 1 && q.next_wake() == Some(30))
}

fn test_spawn_preempts() -> TestResult {
    let base = sched::get_priority();
    if base >= PRI_MAX {
        return TestResult::Skipped;
    }

    let ran = Arc::new(Spinlock::new(false));
    let flag = Arc::clone(&ran);
    let spawned = sched::spawn("st-high", base + 1, move || {
        *flag.lock() = true;
    });

    // Mais prioritária: já rodou e terminou quando `spawn` retorna.
    TestResult::check(spawned.is_ok() && *ran.lock())
}

fn test_yield_round_robin() -> TestResult {
    let base = sched::get_priority();
    if base >= PRI_MAX {
        return TestResult::Skipped;
    }

    let order = Arc::new(Spinlock::new(Vec::new()));
    for id in 0..2u8 {
        let order = Arc::clone(&order);
        let spawned = sched::spawn("st-rr", base, move || {
            order.lock().push(id);
            sched::yield_now();
            order.lock().push(id + 10);
        });
        if spawned.is_err() {
            return TestResult::Failed;
        }
    }

    // Cede até as duas terminarem.
    while order.lock().len() < 4 {
        sched::yield_now();
    }

    let seen = order.lock().clone();
    TestResult::check(seen == [0, 1, 10, 11])
}

fn test_exit_reclaims() -> TestResult {
    let base = sched::get_priority();
    if base >= PRI_MAX {
        return TestResult::Skipped;
    }

    // Libera mortas de testes anteriores antes de contar.
    sched::yield_now();
    let before = sched::thread_count();

    if sched::spawn("st-exit", base + 1, || {}).is_err() {
        return TestResult::Failed;
    }
    // A morta é liberada na próxima passada do dispatcher.
    sched::yield_now();
    TestResult::check(sched::thread_count() == before)
}

fn test_msleep() -> TestResult {
    let start = timer::ticks();
    timer::msleep(20);
    TestResult::check(timer::elapsed(start) >= 2)
}
