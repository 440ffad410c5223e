// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Logging do núcleo de threads com custo ZERO quando desligado.
//
// ARQUITETURA:
// - Features do Cargo fazem o filtro em tempo de compilação
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt - Apenas strings e valores hexadecimais
// - SEM alocação - Seguro dentro do handler do timer
// - Escreve na serial (COM1 em bare metal, stderr na plataforma hospedada)
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Violações de invariante, pânico
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal (init, criação de threads)
// - DEBUG: Decisões de escalonamento, doações
// - TRACE: Cada troca de contexto, cada wake pass
//
// COMO USAR:
//   kinfo!("(Sched) Inicializando...");          // Apenas string
//   kinfo!("(Sched) TID=", tid.as_u32());        // String + hex
//   kinfo!("(Sched) Thread criada: "; name);     // String + string
//
// =============================================================================

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================
//
// Formato: \x1b[<código>m  onde:
//   1;31 = Bold Red
//   1;33 = Bold Yellow
//   32   = Green
//   36   = Cyan
//   35   = Magenta
//   0    = Reset
//

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

// =============================================================================
// EMISSÃO DE UMA LINHA
// =============================================================================
//
// Usado por todos os níveis. Não chamar diretamente.
//

#[doc(hidden)]
#[macro_export]
macro_rules! __klog_line {
    // Apenas string
    ($prefix:expr, $msg:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_nl();
    }};
    // String + valor hex
    ($prefix:expr, $msg:expr, $val:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_hex($val as u64);
        $crate::drivers::serial::emit_nl();
    }};
    // String + string (nomes de thread, nomes de teste)
    ($prefix:expr, $msg:expr; $s:expr) => {{
        $crate::drivers::serial::emit_str($prefix);
        $crate::drivers::serial::emit_str($msg);
        $crate::drivers::serial::emit_str($s);
        $crate::drivers::serial::emit_nl();
    }};
}

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================
//
// kerror! - Sempre ativo (exceto com no_logs)
//

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_ERROR, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_ERROR, $msg, $val) };
    ($msg:expr; $s:expr) => { $crate::__klog_line!($crate::core::logging::P_ERROR, $msg; $s) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_WARN, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_WARN, $msg, $val) };
    ($msg:expr; $s:expr) => { $crate::__klog_line!($crate::core::logging::P_WARN, $msg; $s) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================
//
// kinfo! - log_info, log_debug ou log_trace
//

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_INFO, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_INFO, $msg, $val) };
    ($msg:expr; $s:expr) => { $crate::__klog_line!($crate::core::logging::P_INFO, $msg; $s) };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_info", feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================
//
// kdebug! - log_debug ou log_trace
//

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_DEBUG, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_DEBUG, $msg, $val) };
    ($msg:expr; $s:expr) => { $crate::__klog_line!($crate::core::logging::P_DEBUG, $msg; $s) };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_debug", feature = "log_trace")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================
//
// ktrace! - Apenas log_trace. Cada troca de contexto passa por aqui.
//

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => { $crate::__klog_line!($crate::core::logging::P_TRACE, $msg) };
    ($msg:expr, $val:expr) => { $crate::__klog_line!($crate::core::logging::P_TRACE, $msg, $val) };
    ($msg:expr; $s:expr) => { $crate::__klog_line!($crate::core::logging::P_TRACE, $msg; $s) };
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}
