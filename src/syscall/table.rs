//! System Call Dispatch Table
//!
//! An immutable mapping from call number to handler, display name and
//! argument shape, built once at boot and shared read-only by every core.
//!
//! # Invariants
//! - Slot 0 is always empty; call numbers run contiguously from 1
//! - Every populated slot has a non-empty name and a valid handler
//! - The table is write-once-then-frozen: after `init`, reads take no lock
//!
//! Bundling name, shape and handler in one record keeps the three from ever
//! drifting apart, which parallel per-field arrays cannot guarantee.

use alloc::vec::Vec;
use spin::Once;

use crate::proc::Process;

/// System call numbers, shared with the user-side calling convention.
pub mod numbers {
    pub const SYS_FORK: usize = 1;
    pub const SYS_EXIT: usize = 2;
    pub const SYS_WAIT: usize = 3;
    pub const SYS_PIPE: usize = 4;
    pub const SYS_READ: usize = 5;
    pub const SYS_KILL: usize = 6;
    pub const SYS_EXEC: usize = 7;
    pub const SYS_FSTAT: usize = 8;
    pub const SYS_CHDIR: usize = 9;
    pub const SYS_DUP: usize = 10;
    pub const SYS_GETPID: usize = 11;
    pub const SYS_SBRK: usize = 12;
    pub const SYS_SLEEP: usize = 13;
    pub const SYS_UPTIME: usize = 14;
    pub const SYS_OPEN: usize = 15;
    pub const SYS_WRITE: usize = 16;
    pub const SYS_MKNOD: usize = 17;
    pub const SYS_UNLINK: usize = 18;
    pub const SYS_LINK: usize = 19;
    pub const SYS_MKDIR: usize = 20;
    pub const SYS_CLOSE: usize = 21;
    pub const SYS_TRACE: usize = 22;
}

/// A system call handler.
///
/// Handlers re-read whichever argument slots they need through the
/// marshaller and return the value to place in the return register.
pub type Handler = fn(&mut Process) -> i64;

/// How the trace facade decodes a call's arguments for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// No arguments worth showing.
    None,
    /// First argument rendered as a plain integer.
    Int,
    /// First argument is a user pointer to a path string.
    Path,
    /// Path plus argument-vector pointer; argv[0] is displayed.
    Exec,
}

/// Immutable per-call record: everything dispatch and tracing need.
pub struct SyscallDesc {
    /// Display name, never empty.
    pub name: &'static str,
    /// Argument shape for trace rendering.
    pub shape: ArgShape,
    /// The handler to invoke.
    pub handler: Handler,
}

/// Display name and argument shape for the standard call set.
///
/// This is the single source of truth tying each number to its name and
/// shape; [`SyscallTableBuilder::register_std`] reads it so boot code only
/// supplies handlers.
const STANDARD: &[(usize, &str, ArgShape)] = &[
    (numbers::SYS_FORK, "fork", ArgShape::None),
    (numbers::SYS_EXIT, "exit", ArgShape::Int),
    (numbers::SYS_WAIT, "wait", ArgShape::Int),
    (numbers::SYS_PIPE, "pipe", ArgShape::Int),
    (numbers::SYS_READ, "read", ArgShape::Int),
    (numbers::SYS_KILL, "kill", ArgShape::Int),
    (numbers::SYS_EXEC, "exec", ArgShape::Exec),
    (numbers::SYS_FSTAT, "fstat", ArgShape::Int),
    (numbers::SYS_CHDIR, "chdir", ArgShape::Path),
    (numbers::SYS_DUP, "dup", ArgShape::Int),
    (numbers::SYS_GETPID, "getpid", ArgShape::None),
    (numbers::SYS_SBRK, "sbrk", ArgShape::Int),
    (numbers::SYS_SLEEP, "sleep", ArgShape::Int),
    (numbers::SYS_UPTIME, "uptime", ArgShape::None),
    (numbers::SYS_OPEN, "open", ArgShape::Path),
    (numbers::SYS_WRITE, "write", ArgShape::Int),
    (numbers::SYS_MKNOD, "mknod", ArgShape::Path),
    (numbers::SYS_UNLINK, "unlink", ArgShape::Path),
    (numbers::SYS_LINK, "link", ArgShape::Path),
    (numbers::SYS_MKDIR, "mkdir", ArgShape::Path),
    (numbers::SYS_CLOSE, "close", ArgShape::Int),
    (numbers::SYS_TRACE, "trace", ArgShape::Int),
];

/// Name and shape of a standard call, if `num` is one.
pub fn standard_entry(num: usize) -> Option<(&'static str, ArgShape)> {
    STANDARD
        .iter()
        .find(|(n, _, _)| *n == num)
        .map(|&(_, name, shape)| (name, shape))
}

/// The dispatch table. Built by [`SyscallTableBuilder`], immutable after.
pub struct SyscallTable {
    slots: Vec<Option<SyscallDesc>>,
}

impl SyscallTable {
    /// Start building a table.
    pub fn builder() -> SyscallTableBuilder {
        SyscallTableBuilder {
            // Slot 0 is reserved-empty: 0 is never a valid call number.
            slots: alloc::vec![None],
        }
    }

    /// Look up the descriptor for a call number.
    ///
    /// Returns `Some` iff `1 <= num < len` and the slot is populated.
    pub fn lookup(&self, num: u64) -> Option<&SyscallDesc> {
        if num == 0 || num >= self.slots.len() as u64 {
            return None;
        }
        self.slots[num as usize].as_ref()
    }

    /// Number of slots, including the reserved slot 0.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.len() <= 1
    }
}

/// Builder enforcing the table invariants at registration time.
pub struct SyscallTableBuilder {
    slots: Vec<Option<SyscallDesc>>,
}

impl SyscallTableBuilder {
    /// Register a call with an explicit name and shape.
    ///
    /// # Panics
    /// Panics on call number 0, an empty name, or a double registration.
    /// These are boot-time wiring bugs, not runtime conditions.
    pub fn register(
        mut self,
        num: usize,
        name: &'static str,
        shape: ArgShape,
        handler: Handler,
    ) -> Self {
        assert!(num != 0, "syscall table: slot 0 is reserved");
        assert!(!name.is_empty(), "syscall table: empty name for call {}", num);
        if num >= self.slots.len() {
            self.slots.resize_with(num + 1, || None);
        }
        assert!(
            self.slots[num].is_none(),
            "syscall table: call {} registered twice",
            num
        );
        self.slots[num] = Some(SyscallDesc {
            name,
            shape,
            handler,
        });
        self
    }

    /// Register a standard call, taking its name and shape from the
    /// canonical set.
    ///
    /// # Panics
    /// Panics if `num` is not in the standard set.
    pub fn register_std(self, num: usize, handler: Handler) -> Self {
        let (name, shape) = standard_entry(num)
            .unwrap_or_else(|| panic!("syscall table: {} is not a standard call", num));
        self.register(num, name, shape, handler)
    }

    /// Freeze the table.
    pub fn build(self) -> SyscallTable {
        let populated = self.slots.iter().filter(|s| s.is_some()).count();
        log::info!("syscall table built: {} calls registered", populated);
        SyscallTable { slots: self.slots }
    }
}

/// The kernel-wide table, installed exactly once at boot.
static TABLE: Once<SyscallTable> = Once::new();

/// Install the kernel-wide dispatch table.
///
/// Subsequent calls are ignored; the first table wins, matching the
/// build-once-then-frozen lifecycle.
pub fn init(table: SyscallTable) {
    TABLE.call_once(|| table);
}

/// The installed kernel-wide table, if boot has installed one.
pub fn installed() -> Option<&'static SyscallTable> {
    TABLE.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nop(_p: &mut Process) -> i64 {
        0
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let table = SyscallTable::builder()
            .register_std(numbers::SYS_OPEN, nop)
            .build();
        let desc = table.lookup(numbers::SYS_OPEN as u64).unwrap();
        assert_eq!(desc.name, "open");
        assert_eq!(desc.shape, ArgShape::Path);
        assert!(table.lookup(0).is_none());
        assert!(table.lookup(numbers::SYS_READ as u64).is_none());
        assert!(table.lookup(table.len() as u64).is_none());
        assert!(table.lookup(u64::MAX).is_none());
    }

    #[test]
    fn test_standard_entries_cover_full_set() {
        for num in 1..=numbers::SYS_TRACE {
            let (name, _) = standard_entry(num).unwrap();
            assert!(!name.is_empty());
        }
        assert!(standard_entry(0).is_none());
        assert!(standard_entry(numbers::SYS_TRACE + 1).is_none());
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_double_registration_panics() {
        let _ = SyscallTable::builder()
            .register_std(numbers::SYS_READ, nop)
            .register_std(numbers::SYS_READ, nop);
    }

    #[test]
    #[should_panic(expected = "slot 0 is reserved")]
    fn test_slot_zero_rejected() {
        let _ = SyscallTable::builder().register(0, "zero", ArgShape::None, nop);
    }

    #[test]
    #[should_panic(expected = "empty name")]
    fn test_empty_name_rejected() {
        let _ = SyscallTable::builder().register(3, "", ArgShape::None, nop);
    }
}
