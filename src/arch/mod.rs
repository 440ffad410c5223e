//! # Hardware Abstraction Layer (HAL)
//!
//! Única ponte entre o núcleo de threads (lógica agnóstica) e o hardware.
//! Controle de interrupções, halt, troca de espaço de endereçamento e a troca
//! de contexto propriamente dita passam por aqui.
//!
//! ## Seleção de Plataforma
//! - `x86_64` + `target_os = "none"`: o kernel real (cli/sti/hlt, CR3, troca de
//!   registradores callee-saved em assembly).
//! - Qualquer target hospedado: plataforma simulada (`hosted`), onde cada thread
//!   do kernel é uma thread do host e só uma delas segura a "CPU" por vez.
//!   É o que permite rodar o scheduler inteiro sob `cargo test`.
//!
//! O resto da crate importa apenas `crate::arch::Cpu` e `crate::arch::CpuContext`.

pub mod traits;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub mod x86_64;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub use self::x86_64 as platform;

#[cfg(not(target_os = "none"))]
pub mod hosted;

#[cfg(not(target_os = "none"))]
pub use self::hosted as platform;

pub use platform::{Cpu, CpuContext};
pub use traits::*;
