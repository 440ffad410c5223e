//! # Threads & Scheduler
//!
//! Núcleo de execução do Forge em uma CPU: quem está rodando, quem pode
//! rodar, quem espera um tick e quem espera outra thread.
//!
//! ## Componentes
//! - **task**: TCB, registro com geração, stacks de kernel, ciclo de vida.
//! - **core::runqueue**: fila de prontas por prioridade (FIFO entre iguais).
//! - **core::sleep_queue**: threads dormindo até um tick.
//! - **core::donation**: doação de prioridade através de cadeias de locks.
//! - **core::switch**: dispatcher e troca de contexto.
//!
//! ## Modelo
//! Cooperativo + preemptivo. O tick do timer conta a fatia de tempo e acorda
//! quem dormiu; a troca em si acontece na saída da interrupção. Unblock não
//! preempta; criação de thread, `Semaphore::up`, `Lock::release` e
//! `set_priority` verificam se há uma thread pronta mais prioritária.
//!
//! ## Exclusão
//! Desligar interrupções é a única exclusão abaixo das primitivas de
//! `crate::sync`. Ordem de locks: spinlock interno da primitiva e depois o
//! do scheduler, nunca o contrário.

pub mod config;
pub mod core;
pub mod error;
pub mod task;

#[cfg(feature = "self_test")]
pub mod test;


pub use self::core::{
    block_current, create, current_name, current_tid, dump_threads, exit_current, get_priority,
    init, print_stats, priority_of, set_address_space, set_priority, spawn, start, state_of,
    stats, thread_count, tick, unblock, yield_now, LockId,
};
pub use config::{PRI_DEFAULT, PRI_MAX, PRI_MIN};
pub use error::SchedError;
pub use task::{ThreadName, ThreadState, TickStats, Tid};

pub(crate) use self::core::scheduler::{
    block_current_on, current_ref, pick_highest, preempt_check, preempt_current, sleep_until,
    unblock_ref,
};
