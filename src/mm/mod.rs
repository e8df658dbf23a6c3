//! Memory management module for PumaOS
//!
//! Provides:
//! - Per-process user address mappings
//! - Bounds-checked user memory access
//!
//! # Security Principles
//! - User frames are kernel-owned and zero-initialized
//! - All cross-boundary copies are bounds-checked
//! - Failures are typed and recoverable, never fatal

pub mod address;
pub mod uaccess;

pub use address::{AddressSpace, MapError, PagePerms, VirtAddr, PAGE_SIZE};
pub use uaccess::{copy_in, copy_in_str, fetch_word, UaccessError, WORD_SIZE};
