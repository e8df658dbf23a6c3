//! System Call Dispatcher
//!
//! Runs exactly one system call for a process: validate the number, invoke
//! the handler once, store its result, and hand the completed call to the
//! trace facade if the process asked for tracing.
//!
//! # Security Considerations
//! - Unknown syscall numbers are rejected with the -1 sentinel and have no
//!   handler side effects
//! - Dispatch is synchronous and never blocks; only the user memory
//!   accessor can fail, and it fails rather than waits
//! - Argument slot 0 is captured before the handler runs, because the
//!   handler's return value overwrites that same register

use alloc::format;

use super::table::{self, numbers, SyscallTable};
use super::trace;
use crate::console::ConsoleSink;
use crate::proc::Process;

/// Sentinel stored in the return register for an unrecognized call.
pub const SYSCALL_FAILED: i64 = -1;

/// Dispatch the system call recorded in `p`'s trapframe, using the
/// kernel-wide table installed at boot.
///
/// # Panics
/// Panics if no table has been installed; dispatching before boot wiring is
/// complete is a kernel bug.
pub fn syscall(p: &mut Process, console: &dyn ConsoleSink) {
    let table = table::installed().expect("syscall: dispatch table not installed");
    dispatch(table, p, console);
}

/// Dispatch one system call against an explicit table.
///
/// Terminal after a single pass: either the handler ran exactly once and
/// its result is in the return register, or the call was unknown and the
/// register holds the failure sentinel.
pub fn dispatch(table: &SyscallTable, p: &mut Process, console: &dyn ConsoleSink) {
    let num = p.trapframe.syscall_number();

    let desc = match table.lookup(num) {
        Some(desc) => desc,
        None => {
            log::warn!("pid {} ({}): unknown sys call {}", p.pid, p.name, num);
            console.write_line(&format!("{} {}: unknown sys call {}", p.pid, p.name, num));
            p.trapframe.set_return(SYSCALL_FAILED);
            return;
        }
    };

    // The handler's result will overwrite argument slot 0; capture it now
    // so the trace facade can still render the call's first argument.
    let arg0 = p.trapframe.arg(0);

    let ret = (desc.handler)(p);
    p.trapframe.set_return(ret);

    // The trace-enabling call never logs itself.
    if p.traced && num != numbers::SYS_TRACE as u64 {
        trace::emit(console, p, desc, arg0, ret);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferConsole;
    use crate::mm::AddressSpace;
    use crate::syscall::table::ArgShape;
    use core::sync::atomic::{AtomicUsize, Ordering};

    fn test_process() -> Process {
        Process::new(3, "proba", AddressSpace::new())
    }

    #[test]
    fn test_handler_invoked_exactly_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn counting(_p: &mut Process) -> i64 {
            CALLS.fetch_add(1, Ordering::SeqCst);
            99
        }
        let table = SyscallTable::builder()
            .register(5, "read", ArgShape::Int, counting)
            .build();
        let mut p = test_process();
        p.trapframe.a7 = 5;
        dispatch(&table, &mut p, &BufferConsole::new());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(p.trapframe.a0, 99);
    }

    #[test]
    fn test_unknown_call_sets_sentinel_and_diagnoses() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn counting(_p: &mut Process) -> i64 {
            CALLS.fetch_add(1, Ordering::SeqCst);
            0
        }
        // Registering only call 5 leaves 1..=4 as in-range empty slots.
        let table = SyscallTable::builder()
            .register(5, "read", ArgShape::Int, counting)
            .build();
        let console = BufferConsole::new();
        let mut p = test_process();

        for bad in [0u64, 3, 6, 100, u64::MAX] {
            p.trapframe.a7 = bad;
            p.trapframe.a0 = 55;
            dispatch(&table, &mut p, &console);
            assert_eq!(p.trapframe.a0, SYSCALL_FAILED as u64, "num {}", bad);
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(console.len(), 5);
        assert_eq!(console.lines()[0], "3 proba: unknown sys call 0");
    }

    #[test]
    fn test_return_value_stored_even_when_negative() {
        fn failing(_p: &mut Process) -> i64 {
            -2
        }
        let table = SyscallTable::builder()
            .register(21, "close", ArgShape::Int, failing)
            .build();
        let mut p = test_process();
        p.trapframe.a7 = 21;
        dispatch(&table, &mut p, &BufferConsole::new());
        assert_eq!(p.trapframe.a0 as i64, -2);
    }

    #[test]
    fn test_untraced_process_emits_nothing() {
        fn nop(_p: &mut Process) -> i64 {
            0
        }
        let table = SyscallTable::builder()
            .register_std(numbers::SYS_CLOSE, nop)
            .build();
        let console = BufferConsole::new();
        let mut p = test_process();
        p.trapframe.a7 = numbers::SYS_CLOSE as u64;
        dispatch(&table, &mut p, &console);
        assert!(console.is_empty());
    }

    #[test]
    fn test_kernel_wide_table_install_and_dispatch() {
        fn nop(_p: &mut Process) -> i64 {
            7
        }
        // First install wins; later calls are ignored.
        table::init(
            SyscallTable::builder()
                .register_std(numbers::SYS_GETPID, nop)
                .build(),
        );
        table::init(SyscallTable::builder().build());

        let mut p = test_process();
        p.trapframe.a7 = numbers::SYS_GETPID as u64;
        syscall(&mut p, &BufferConsole::new());
        assert_eq!(p.trapframe.a0, 7);
    }

    #[test]
    fn test_handler_sees_original_arguments() {
        fn wants_args(p: &mut Process) -> i64 {
            // Handler re-reads its arguments through the marshaller.
            crate::syscall::args::arg_int(p, 0) + crate::syscall::args::arg_int(p, 1)
        }
        let table = SyscallTable::builder()
            .register(5, "read", ArgShape::Int, wants_args)
            .build();
        let mut p = test_process();
        p.trapframe.a7 = 5;
        p.trapframe.a0 = 40;
        p.trapframe.a1 = 2;
        dispatch(&table, &mut p, &BufferConsole::new());
        assert_eq!(p.trapframe.a0, 42);
    }
}
