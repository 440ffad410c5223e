//! Constantes de configuração do Scheduler

/// Prioridade mínima (idle)
pub const PRI_MIN: u8 = 0;

/// Prioridade padrão de uma thread nova (e da thread inicial)
pub const PRI_DEFAULT: u8 = 31;

/// Prioridade máxima
pub const PRI_MAX: u8 = 63;

/// Fatia de tempo em ticks. Esgotada, a thread cede a CPU para as de mesma
/// prioridade na saída da interrupção.
pub const TIME_SLICE: u64 = 4;

/// Profundidade máxima da cadeia de doação (lock -> dono -> lock -> ...).
/// Limita o custo quando há espera circular, que já é erro do chamador.
pub const DONATION_DEPTH: usize = 8;

/// Tamanho da stack de kernel de cada thread (em bytes)
pub const KERNEL_STACK_SIZE: usize = 16 * 1024;

/// Alinhamento da stack de kernel
pub const KERNEL_STACK_ALIGN: usize = 16;

/// Máximo de threads vivas ao mesmo tempo
pub const MAX_THREADS: usize = 1024;

/// Tamanho máximo do nome de uma thread (diagnóstico)
pub const THREAD_NAME_LEN: usize = 16;
