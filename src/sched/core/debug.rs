//! Dump de threads para diagnóstico.

use super::scheduler::with;
use crate::drivers::serial;

/// Lista todas as threads vivas na serial.
pub fn dump_threads() {
    with(|s| {
        serial::emit_str("TID  PRI(BASE) STATE    NAME\r\n");
        for (r, thread) in s.threads.iter() {
            let marker = if r == s.current { '*' } else { ' ' };
            serial::emit(marker as u8);
            serial::emit_hex(thread.tid.as_u32() as u64);
            serial::emit_str(" ");
            serial::emit_hex(thread.priority as u64);
            serial::emit_str("(");
            serial::emit_hex(thread.base_priority as u64);
            serial::emit_str(") ");
            serial::emit_str(thread.state.as_str());
            serial::emit_str(" ");
            serial::emit_str(thread.name.as_str());
            serial::emit_nl();
        }
    });
}
