//! Plataforma hospedada (simulação em threads do host).
//!
//! Modela uma CPU única: cada thread do kernel roda numa thread do host, mas
//! apenas a que segura o "bastão" executa. A troca de contexto entrega o
//! bastão e espera recebê-lo de volta. O flag de interrupções é global e o
//! timer só dispara quando alguém chama `halt()` (a idle) ou
//! `timer_interrupt()` (testes), o que torna cada execução determinística.

pub mod context;
pub mod cpu;

pub use context::CpuContext;
pub use cpu::{active_address_space, reset_address_space, timer_interrupt, HostCpu as Cpu};
