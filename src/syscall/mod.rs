//! System Call Interface
//!
//! Dispatch, argument marshalling and per-process tracing for system calls.
//!
//! # Security Model
//! - Whitelist approach: only registered call numbers are dispatched
//! - Raw arguments are untrusted integers; addresses are validated on use
//! - Invalid user input returns errors or sentinels, never panics
//! - The dispatch table is built once at boot and frozen
//!
//! # Call Flow
//! trap entry -> [`dispatch::syscall`] -> handler pulls its arguments via
//! [`args`] -> dispatcher records the return value -> traced processes get
//! one line via [`trace`].

pub mod args;
pub mod dispatch;
pub mod table;
pub mod trace;

pub use dispatch::{dispatch, syscall, SYSCALL_FAILED};
pub use table::{numbers, ArgShape, Handler, SyscallDesc, SyscallTable, SyscallTableBuilder};
pub use trace::{sys_trace, MAX_PATH};
