//! Saved User Register State
//!
//! The trapframe captured by the trap entry path when a user process
//! requests a system call. The entry stubs themselves are external; this
//! crate only reads and writes the saved snapshot.
//!
//! # RISC-V Calling Convention
//! - a0-a5: system call arguments (slots 0-5)
//! - a7: system call number
//! - a0: return value, written back before returning to user mode
//!
//! The return value reuses the slot-0 register. Anything that needs an
//! argument after the handler has run must capture it before dispatch
//! invokes the handler.

/// Number of argument register slots.
pub const NUM_ARG_REGS: usize = 6;

/// Saved register state at the moment of a system call.
///
/// Exclusively owned by its process: read by the argument marshaller,
/// written (return slot only) by the dispatcher.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapFrame {
    /// Argument register 0; also the return-value register.
    pub a0: u64,
    pub a1: u64,
    pub a2: u64,
    pub a3: u64,
    pub a4: u64,
    pub a5: u64,
    pub a6: u64,
    /// System call number register.
    pub a7: u64,
}

impl TrapFrame {
    pub const fn new() -> Self {
        Self {
            a0: 0,
            a1: 0,
            a2: 0,
            a3: 0,
            a4: 0,
            a5: 0,
            a6: 0,
            a7: 0,
        }
    }

    /// Raw value of argument slot `n`.
    ///
    /// # Panics
    /// Panics if `n` is outside 0..=5. The register layout is fixed, so an
    /// out-of-range slot is a kernel programming bug, not a runtime error.
    #[inline]
    pub fn arg(&self, n: usize) -> u64 {
        match n {
            0 => self.a0,
            1 => self.a1,
            2 => self.a2,
            3 => self.a3,
            4 => self.a4,
            5 => self.a5,
            _ => panic!("trapframe: argument slot {} out of range", n),
        }
    }

    /// The requested system call number.
    #[inline]
    pub const fn syscall_number(&self) -> u64 {
        self.a7
    }

    /// Store a handler result into the return-value register.
    ///
    /// This overwrites argument slot 0.
    #[inline]
    pub fn set_return(&mut self, value: i64) {
        self.a0 = value as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_slots() {
        let mut tf = TrapFrame::new();
        tf.a0 = 10;
        tf.a3 = 13;
        tf.a5 = 15;
        assert_eq!(tf.arg(0), 10);
        assert_eq!(tf.arg(3), 13);
        assert_eq!(tf.arg(5), 15);
    }

    #[test]
    #[should_panic(expected = "argument slot 6 out of range")]
    fn test_arg_slot_out_of_range_panics() {
        TrapFrame::new().arg(6);
    }

    #[test]
    fn test_return_overwrites_slot_zero() {
        let mut tf = TrapFrame::new();
        tf.a0 = 42;
        tf.set_return(-1);
        assert_eq!(tf.arg(0), u64::MAX);
    }
}
