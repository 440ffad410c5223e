// =============================================================================
// SERIAL DRIVER - ZERO OVERHEAD
// =============================================================================
//
// Saída dos macros de log (kinfo!, kerror!, ...).
//
// ARQUITETURA:
// - SEM Mutex/Spinlock - pode ser chamado dentro do handler do timer e com o
//   lock do scheduler retido
// - SEM alocação
// - Bare metal: COM1 (0x3F8) via port I/O, busy-wait no LSR
// - Hospedado: stderr do processo
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string
// - emit_hex(v)      : Envia u64 em hexadecimal (0x...)
// - emit_nl()        : Envia newline (\r\n)
//
// =============================================================================

#[cfg(target_os = "none")]
mod backend {
    use crate::arch::x86_64::ports::{inb, outb};

    // Porta de dados da COM1
    const COM1_DATA: u16 = 0x3F8;

    // Porta de status da COM1 (Line Status Register)
    const COM1_STATUS: u16 = 0x3FD;

    /// Configura: 38400 baud, 8N1, FIFO habilitado.
    pub fn init() {
        outb(COM1_DATA + 1, 0x00); // Desliga IRQs da UART
        outb(COM1_DATA + 3, 0x80); // DLAB
        outb(COM1_DATA, 0x03); // Divisor lo = 38400 baud
        outb(COM1_DATA + 1, 0x00); // Divisor hi
        outb(COM1_DATA + 3, 0x03); // 8N1
        outb(COM1_DATA + 2, 0xC7); // FIFO, limpa, threshold 14
        outb(COM1_DATA + 4, 0x0B); // RTS/DSR
    }

    #[inline]
    pub fn write(bytes: &[u8]) {
        for &byte in bytes {
            // Espera o buffer de transmissão esvaziar (bit 5 do LSR)
            while inb(COM1_STATUS) & 0x20 == 0 {
                core::hint::spin_loop();
            }
            outb(COM1_DATA, byte);
        }
    }
}

#[cfg(not(target_os = "none"))]
mod backend {
    use std::io::Write;

    pub fn init() {}

    #[inline]
    pub fn write(bytes: &[u8]) {
        // Log não pode falhar nem entrar em pânico.
        let _ = std::io::stderr().write_all(bytes);
    }
}

/// Inicializa a porta serial. Deve ser chamada uma vez durante o early-boot.
pub fn init() {
    backend::init();
}

/// Envia um único byte.
#[inline]
pub fn emit(byte: u8) {
    backend::write(&[byte]);
}

/// Envia uma string.
#[inline(never)]
pub fn emit_str(s: &str) {
    backend::write(s.as_bytes());
}

/// Envia `value` em hexadecimal, sem zeros à esquerda.
#[inline(never)]
pub fn emit_hex(value: u64) {
    let (buf, len) = format_hex(value);
    backend::write(&buf[..len]);
}

/// Envia newline (\r\n).
#[inline]
pub fn emit_nl() {
    backend::write(b"\r\n");
}

/// Formata `value` como "0x..." num buffer fixo. Retorna (buffer, tamanho).
fn format_hex(value: u64) -> ([u8; 18], usize) {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";

    let mut buf = [0u8; 18];
    buf[0] = b'0';
    buf[1] = b'x';

    let nibbles = if value == 0 {
        1
    } else {
        (64 - value.leading_zeros() as usize).div_ceil(4)
    };

    for i in 0..nibbles {
        let shift = (nibbles - 1 - i) * 4;
        buf[2 + i] = DIGITS[((value >> shift) & 0xF) as usize];
    }

    (buf, 2 + nibbles)
}

/// Adaptador `core::fmt::Write` para a serial.
///
/// Só para o panic handler, que precisa formatar a mensagem do pânico; o
/// caminho normal de log continua sem `core::fmt`.
pub struct SerialWriter;

impl core::fmt::Write for SerialWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        emit_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::format_hex;

    fn hex(value: u64) -> std::string::String {
        let (buf, len) = format_hex(value);
        std::string::String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    #[test]
    fn hex_has_no_leading_zeros() {
        assert_eq!(hex(0), "0x0");
        assert_eq!(hex(0x1f), "0x1f");
        assert_eq!(hex(0x100), "0x100");
        assert_eq!(hex(u64::MAX), "0xffffffffffffffff");
    }
}
