//! Contrato da troca de contexto.
//!
//! Toda a parte dependente de hardware da troca de threads fica atrás deste
//! trait. O dispatcher só conhece três operações: adotar o fluxo que já está
//! rodando, preparar um contexto novo e trocar de um contexto para outro.

use crate::sched::task::KernelStack;
use crate::sched::SchedError;

/// Entry point de uma thread nova. Nunca retorna.
pub type ThreadEntry = extern "C" fn() -> !;

pub trait ContextOps: Sized {
    /// Contexto do código que já está executando (a thread inicial).
    /// Só é preenchido de verdade na primeira troca que sair dele.
    fn bootstrap() -> Self;

    /// Contexto que, ao ser retomado, começa a executar `entry` no topo de `stack`.
    fn prepare(stack: &KernelStack, entry: ThreadEntry) -> Result<Self, SchedError>;

    /// Salva o contexto corrente em `prev` e retoma `next`.
    ///
    /// Retorna somente quando alguém trocar de volta para `prev`.
    ///
    /// # Safety
    /// - Interrupções desabilitadas.
    /// - `prev` e `next` válidos e estáveis até a troca terminar; nenhum lock do
    ///   scheduler pode estar retido pelo chamador.
    unsafe fn switch(prev: *mut Self, next: *const Self);
}
