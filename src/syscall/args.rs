//! System Call Argument Marshalling
//!
//! Typed accessors over the saved trapframe. Raw register reads perform no
//! validation: a register is just bits until it is used as an address, and
//! legality is checked by the user memory accessor at that point.
//!
//! # Contract
//! Slot indices 0..=5 map to the fixed argument registers. Asking for any
//! other slot is a kernel programming bug and panics; it can never be
//! triggered from user mode.

use crate::mm::{self, UaccessError, VirtAddr};
use crate::proc::Process;

/// Raw value of argument slot `n`, unvalidated.
///
/// # Panics
/// Panics if `n` is outside 0..=5.
#[inline]
pub fn arg_raw(p: &Process, n: usize) -> u64 {
    p.trapframe.arg(n)
}

/// Argument slot `n` as an integer.
#[inline]
pub fn arg_int(p: &Process, n: usize) -> i64 {
    arg_raw(p, n) as i64
}

/// Argument slot `n` as a user address.
///
/// No legality check here; `copy_in`/`copy_in_str` validate on use.
#[inline]
pub fn arg_addr(p: &Process, n: usize) -> VirtAddr {
    VirtAddr::new(arg_raw(p, n) as usize)
}

/// Argument slot `n` as a NUL-terminated user string, copied into `buf`.
///
/// Returns the string length excluding the terminator.
pub fn arg_str(p: &Process, n: usize, buf: &mut [u8]) -> Result<usize, UaccessError> {
    let addr = arg_addr(p, n);
    fetch_str(p, addr, buf)
}

/// Fetch the user word at `addr`, interpreted as a user address.
///
/// Used to chase pointer chains such as argument vectors.
pub fn fetch_addr(p: &Process, addr: VirtAddr) -> Result<VirtAddr, UaccessError> {
    let word = mm::fetch_word(&p.pagetable, addr)?;
    Ok(VirtAddr::new(word as usize))
}

/// Fetch the NUL-terminated user string at `addr` into `buf`.
///
/// Returns the string length excluding the terminator.
pub fn fetch_str(p: &Process, addr: VirtAddr, buf: &mut [u8]) -> Result<usize, UaccessError> {
    mm::copy_in_str(&p.pagetable, buf, addr)
}
