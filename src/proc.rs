//! Process State
//!
//! The slice of per-process state the syscall core needs: identity, the
//! saved trapframe, the user address mapping, and the trace flag. Scheduler
//! bookkeeping (run state, parent links, open files) lives outside this
//! crate.
//!
//! # Ownership
//! A process's trapframe and address space are exclusively owned by the
//! process and never touched concurrently by another core: a process issues
//! at most one system call at a time, and dispatch runs it to completion.

use alloc::string::String;

use crate::mm::AddressSpace;
use crate::trap::TrapFrame;

/// Process identifier.
pub type Pid = u32;

/// Per-process state visible to the syscall core.
pub struct Process {
    /// Process id, stable for the lifetime of this process.
    pub pid: Pid,
    /// Display name used in diagnostics.
    pub name: String,
    /// Saved user register state.
    pub trapframe: TrapFrame,
    /// User address mapping.
    pub pagetable: AddressSpace,
    /// Diagnostic tracing enabled for this process.
    ///
    /// Set only by the trace-enabling call; stays set until the process
    /// slot is reclaimed. A reused slot must never inherit tracing, which
    /// is why [`Process::reclaim`] clears it explicitly.
    pub traced: bool,
}

impl Process {
    /// Create a fresh, untraced process.
    pub fn new(pid: Pid, name: &str, pagetable: AddressSpace) -> Self {
        Self {
            pid,
            name: String::from(name),
            trapframe: TrapFrame::new(),
            pagetable,
            traced: false,
        }
    }

    /// Scrub process state when its slot is reclaimed for reuse.
    ///
    /// Clears identity and, crucially, the trace flag: tracing is a
    /// per-process request and must not leak into whatever process is
    /// allocated into this slot next.
    pub fn reclaim(&mut self) {
        self.name.clear();
        self.trapframe = TrapFrame::new();
        self.pagetable = AddressSpace::new();
        self.traced = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_process_is_untraced() {
        let p = Process::new(1, "init", AddressSpace::new());
        assert!(!p.traced);
        assert_eq!(p.name, "init");
    }

    #[test]
    fn test_reclaim_clears_trace_flag() {
        let mut p = Process::new(7, "victim", AddressSpace::new());
        p.traced = true;
        p.reclaim();
        assert!(!p.traced);
        assert!(p.name.is_empty());
    }
}
