//! Tempo do sistema: contador de ticks e o timer que o alimenta.

pub mod jiffies;
pub mod timer;

pub use jiffies::HZ;
pub use timer::{elapsed, msleep, nsleep, sleep, ticks, usleep};
