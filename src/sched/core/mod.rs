//! Núcleo do scheduler: filas, doação e dispatcher.

pub mod debug;
pub mod donation;
pub mod idle;
pub mod runqueue;
pub mod scheduler;
pub mod sleep_queue;
pub mod switch;

pub use debug::dump_threads;
pub use donation::LockId;
pub use runqueue::RunQueue;
pub use scheduler::{
    block_current, create, current_name, current_tid, exit_current, get_priority, init,
    print_stats, priority_of, set_address_space, set_priority, spawn, start, state_of, stats,
    thread_count, tick, unblock, yield_now,
};
pub use sleep_queue::SleepQueue;
