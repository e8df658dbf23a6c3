//! User Address Space Types
//!
//! Type-safe wrappers for user-space virtual addresses and the per-process
//! address mapping that backs them.
//!
//! # Security Properties
//! - User addresses are plain integers until the accessor validates them
//! - User frames are kernel-owned; user code never sees kernel pointers
//! - Page permissions are strictly typed, no raw bit twiddling at call sites

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::fmt;

use super::uaccess::UaccessError;

/// Page size (4 KiB)
pub const PAGE_SIZE: usize = 4096;
/// Page size mask
pub const PAGE_MASK: usize = PAGE_SIZE - 1;
/// Bits to shift for page number
pub const PAGE_SHIFT: usize = 12;

/// One past the highest user-space virtual address (Sv39, low half).
pub const MAX_VA: usize = 1 << 38;

bitflags::bitflags! {
    /// Permissions attached to a mapped user page.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct PagePerms: u8 {
        /// Page may be read.
        const READ = 1 << 0;
        /// Page may be written.
        const WRITE = 1 << 1;
        /// Page may be executed.
        const EXEC = 1 << 2;
        /// Page is accessible from user mode.
        const USER = 1 << 3;
    }
}

impl PagePerms {
    /// Read/write user data, the default for process memory.
    pub const USER_DATA: Self = Self::READ.union(Self::WRITE).union(Self::USER);
}

/// A user-space virtual address.
///
/// Newtype wrapper so user addresses cannot be confused with kernel
/// pointers or raw register values at compile time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VirtAddr(usize);

impl VirtAddr {
    #[inline]
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    /// Get the raw address value.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Check if the address is page-aligned.
    #[inline]
    pub const fn is_aligned(self) -> bool {
        self.0 & PAGE_MASK == 0
    }

    /// Align the address down to the nearest page boundary.
    #[inline]
    pub const fn align_down(self) -> Self {
        Self(self.0 & !PAGE_MASK)
    }

    /// Get the virtual page number.
    #[inline]
    pub const fn page_number(self) -> usize {
        self.0 >> PAGE_SHIFT
    }

    /// Get the page offset (lowest 12 bits).
    #[inline]
    pub const fn page_offset(self) -> usize {
        self.0 & PAGE_MASK
    }

    /// Add an offset, failing on address-space wrap-around.
    #[inline]
    pub fn checked_add(self, offset: usize) -> Option<Self> {
        self.0.checked_add(offset).map(Self)
    }
}

impl fmt::Debug for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtAddr({:#x})", self.0)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Errors from address-space mapping operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The virtual address is not page-aligned.
    Misaligned,
    /// The page is already mapped.
    AlreadyMapped,
    /// The address lies beyond the user address range.
    OutOfRange,
}

/// One mapped user page: a kernel-owned frame plus its permissions.
struct Frame {
    data: Box<[u8; PAGE_SIZE]>,
    perms: PagePerms,
}

/// A per-process user address mapping.
///
/// Translates process-visible addresses to kernel-owned frames. `size` is
/// the process image size: the exclusive upper bound of the valid user
/// range, maintained the way a `sbrk`-style allocator would.
pub struct AddressSpace {
    pages: BTreeMap<usize, Frame>,
    size: usize,
}

impl AddressSpace {
    /// Create an empty address space with no mapped pages.
    pub const fn new() -> Self {
        Self {
            pages: BTreeMap::new(),
            size: 0,
        }
    }

    /// Process image size: addresses in `[0, size)` are the valid user range.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Map one zeroed page at a page-aligned address.
    pub fn map_page(&mut self, va: VirtAddr, perms: PagePerms) -> Result<(), MapError> {
        if !va.is_aligned() {
            return Err(MapError::Misaligned);
        }
        if va.as_usize() >= MAX_VA {
            return Err(MapError::OutOfRange);
        }
        if self.pages.contains_key(&va.page_number()) {
            return Err(MapError::AlreadyMapped);
        }
        self.pages.insert(
            va.page_number(),
            Frame {
                data: Box::new([0; PAGE_SIZE]),
                perms,
            },
        );
        if va.as_usize() + PAGE_SIZE > self.size {
            self.size = va.as_usize() + PAGE_SIZE;
        }
        Ok(())
    }

    /// Grow the process image to at least `new_size` bytes, mapping zeroed
    /// user-RW pages for the new range.
    ///
    /// The image size stays byte-exact, sbrk-style: the last page may be
    /// mapped in full while only a prefix of it counts as valid.
    pub fn grow(&mut self, new_size: usize) -> Result<(), MapError> {
        if new_size > MAX_VA {
            return Err(MapError::OutOfRange);
        }
        let old_size = self.size;
        let mut va = old_size & !PAGE_MASK;
        if old_size & PAGE_MASK != 0 {
            va += PAGE_SIZE;
        }
        while va < new_size {
            self.map_page(VirtAddr::new(va), PagePerms::USER_DATA)?;
            va += PAGE_SIZE;
        }
        if new_size > old_size {
            self.size = new_size;
        }
        Ok(())
    }

    /// Kernel-side write into user memory, used when loading a process image.
    ///
    /// Walks the mapping page by page; fails if any destination page is
    /// unmapped. Deliberately ignores user permissions: the kernel populates
    /// read-only user pages when loading program text.
    pub fn write_bytes(&mut self, dst: VirtAddr, bytes: &[u8]) -> Result<(), UaccessError> {
        dst.checked_add(bytes.len())
            .ok_or(UaccessError::BadAddress)?;
        let mut va = dst;
        let mut written = 0;
        while written < bytes.len() {
            let frame = self
                .pages
                .get_mut(&va.page_number())
                .ok_or(UaccessError::BadAddress)?;
            let off = va.page_offset();
            let n = (PAGE_SIZE - off).min(bytes.len() - written);
            frame.data[off..off + n].copy_from_slice(&bytes[written..written + n]);
            written += n;
            va = VirtAddr::new(va.align_down().as_usize() + PAGE_SIZE);
        }
        Ok(())
    }

    /// User-readable bytes from `va` to the end of its page.
    ///
    /// Returns `None` if the page is unmapped or not user-readable. The
    /// accessor layers its range checks on top of this.
    pub(crate) fn readable_chunk(&self, va: VirtAddr) -> Option<&[u8]> {
        let frame = self.pages.get(&va.page_number())?;
        if !frame.perms.contains(PagePerms::READ | PagePerms::USER) {
            return None;
        }
        Some(&frame.data[va.page_offset()..])
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}
