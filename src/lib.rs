//! PumaOS - Minimal RISC-V Teaching Kernel Core
//!
//! The system call dispatch and per-process call tracing subsystem of a
//! small monolithic kernel.
//!
//! # Scope
//! - Bounds-checked copies across the user/kernel boundary
//! - Syscall argument marshalling from the saved trapframe
//! - Immutable dispatch table, built once at boot
//! - Per-process diagnostic tracing of completed calls
//!
//! # Security Model
//! - Every syscall argument is an untrusted integer until validated
//! - Bad user pointers are a recoverable per-call failure, never a panic
//! - Unknown syscall numbers are rejected with a -1 sentinel
//! - The dispatch table is write-once and lock-free to read
//!
//! # What lives elsewhere
//! The trap entry stubs, the scheduler, the individual syscall handlers and
//! the console device driver are external collaborators. This crate defines
//! the seams they plug into (`Handler`, `ConsoleSink`) and nothing more.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod console;
pub mod mm;
pub mod proc;
pub mod syscall;
pub mod trap;

/// Kernel version string
pub const VERSION: &str = "0.2.0";
