//! User Memory Accessor
//!
//! Bounds-checked copies from user address space into kernel-owned buffers.
//! Every transfer across the user/kernel boundary in this crate goes through
//! these functions.
//!
//! # Security Principles
//! - Validate the full source range before trusting any byte of it
//! - Fail-secure: an unmapped or non-user page anywhere in the range fails
//!   the whole copy
//! - Overflow-safe range arithmetic: `addr + len` may wrap
//! - No partial success: on failure the destination content is unspecified
//!   and the caller must not read it

use super::address::{AddressSpace, VirtAddr};

/// Size of a user word (RISC-V xlen).
pub const WORD_SIZE: usize = core::mem::size_of::<u64>();

/// Errors from user memory access.
///
/// These are per-call soft failures surfaced to whichever component asked
/// for the copy; they never escalate to a kernel fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UaccessError {
    /// Address or length fails validation against the process's mapping.
    BadAddress,
    /// String did not terminate within the destination buffer. The buffer
    /// holds `dst.len()` valid bytes for callers that accept truncation.
    Truncated,
}

impl core::fmt::Display for UaccessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UaccessError::BadAddress => write!(f, "bad user address"),
            UaccessError::Truncated => write!(f, "string truncated"),
        }
    }
}

/// Copy `dst.len()` bytes from user address `src` into a kernel buffer.
///
/// Succeeds only if the entire `[src, src + dst.len())` range lies below the
/// process image size and every touched page is mapped user-readable.
pub fn copy_in(
    aspace: &AddressSpace,
    dst: &mut [u8],
    src: VirtAddr,
) -> Result<(), UaccessError> {
    // Both checks needed: src alone may be in range while src + len wraps.
    let end = src
        .checked_add(dst.len())
        .ok_or(UaccessError::BadAddress)?;
    if src.as_usize() >= aspace.size() && !dst.is_empty() {
        return Err(UaccessError::BadAddress);
    }
    if end.as_usize() > aspace.size() {
        return Err(UaccessError::BadAddress);
    }

    let mut va = src;
    let mut copied = 0;
    while copied < dst.len() {
        let chunk = aspace
            .readable_chunk(va)
            .ok_or(UaccessError::BadAddress)?;
        let n = chunk.len().min(dst.len() - copied);
        dst[copied..copied + n].copy_from_slice(&chunk[..n]);
        copied += n;
        va = va
            .checked_add(n)
            .ok_or(UaccessError::BadAddress)?;
    }
    Ok(())
}

/// Copy a NUL-terminated string from user address `src` into `dst`.
///
/// Copies bytes until a terminator or the buffer is full. Returns the number
/// of bytes copied excluding the terminator. Fails with `BadAddress` if any
/// source byte is invalid, `Truncated` if no terminator fits in `dst`.
pub fn copy_in_str(
    aspace: &AddressSpace,
    dst: &mut [u8],
    src: VirtAddr,
) -> Result<usize, UaccessError> {
    let mut va = src;
    let mut copied = 0;
    while copied < dst.len() {
        if va.as_usize() >= aspace.size() {
            return Err(UaccessError::BadAddress);
        }
        let chunk = aspace
            .readable_chunk(va)
            .ok_or(UaccessError::BadAddress)?;
        let budget = chunk
            .len()
            .min(dst.len() - copied)
            .min(aspace.size() - va.as_usize());
        for &byte in &chunk[..budget] {
            if byte == 0 {
                return Ok(copied);
            }
            dst[copied] = byte;
            copied += 1;
        }
        va = va
            .checked_add(budget)
            .ok_or(UaccessError::BadAddress)?;
    }
    Err(UaccessError::Truncated)
}

/// Fetch one user word at `addr`.
///
/// The whole word must lie within the valid user range; the checks are
/// written against the upper bound so a wrapping `addr + WORD_SIZE` cannot
/// slip through.
pub fn fetch_word(aspace: &AddressSpace, addr: VirtAddr) -> Result<u64, UaccessError> {
    let end = addr
        .checked_add(WORD_SIZE)
        .ok_or(UaccessError::BadAddress)?;
    if addr.as_usize() >= aspace.size() || end.as_usize() > aspace.size() {
        return Err(UaccessError::BadAddress);
    }
    let mut buf = [0u8; WORD_SIZE];
    copy_in(aspace, &mut buf, addr)?;
    Ok(u64::from_ne_bytes(buf))
}
