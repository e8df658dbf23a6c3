//! Per-Process Call Tracing
//!
//! Renders one diagnostic line for each completed system call of a traced
//! process. How the arguments are decoded depends on the call's argument
//! shape: a path call dereferences its first argument as a user string, an
//! exec call chases the argument vector, everything else prints plain
//! integers.
//!
//! # Security Considerations
//! - Argument decoding reads user memory through the bounds-checked
//!   accessor; a hostile pointer degrades the line to `<bad ptr>`, nothing
//!   more
//! - Rendering runs strictly after the call completed: the reported return
//!   value is final, and the logged first argument is the value captured
//!   before the handler overwrote the shared register slot
//! - A decoding failure never perturbs the call's own return value

use alloc::format;
use alloc::string::String;

use super::args;
use super::table::{ArgShape, SyscallDesc};
use crate::console::ConsoleSink;
use crate::mm::{UaccessError, VirtAddr};
use crate::proc::Process;

/// Longest path rendered in a trace line, matching the kernel's path
/// buffer size.
pub const MAX_PATH: usize = 128;

/// Placeholder rendered when an argument pointer cannot be decoded.
const BAD_PTR: &str = "<bad ptr>";

/// The trace-enabling system call.
///
/// Marks the calling process as traced. The flag is a boolean, so enabling
/// twice is a no-op, and it persists until the process slot is reclaimed.
/// This call never appears in its own trace output.
pub fn sys_trace(p: &mut Process) -> i64 {
    p.traced = true;
    0
}

/// Render and emit the trace line for one completed call.
///
/// `arg0` is the raw slot-0 value captured before the handler ran; the
/// return register cannot be consulted for it anymore.
pub(crate) fn emit(
    console: &dyn ConsoleSink,
    p: &Process,
    desc: &SyscallDesc,
    arg0: u64,
    ret: i64,
) {
    let line = match desc.shape {
        ArgShape::Path => {
            let mut buf = [0u8; MAX_PATH];
            match args::fetch_str(p, VirtAddr::new(arg0 as usize), &mut buf) {
                Ok(len) => quoted_line(p, desc, &buf[..len], ret),
                Err(err) => {
                    log::debug!("trace: {}({:#x}): {}", desc.name, arg0, err);
                    bad_ptr_line(p, desc, ret)
                }
            }
        }
        ArgShape::Exec => {
            let mut buf = [0u8; MAX_PATH];
            match exec_display_name(p, &mut buf) {
                Ok(len) => quoted_line(p, desc, &buf[..len], ret),
                Err(err) => {
                    log::debug!("trace: {}: argv decode failed: {}", desc.name, err);
                    bad_ptr_line(p, desc, ret)
                }
            }
        }
        ArgShape::Int => format!(
            "[pid {}] {}({}) = {}",
            p.pid,
            desc.name,
            arg0 as i32,
            ret
        ),
        ArgShape::None => format!("[pid {}] {}() = {}", p.pid, desc.name, ret),
    };
    console.write_line(&line);
}

/// Decode the display name for an exec-style call.
///
/// The rendered name is argv[0], fetched through the argument-vector
/// pointer in slot 1 — deliberately not the call's own path argument, so
/// the line reflects the name the new program will see. A null or invalid
/// vector pointer, or an invalid argv[0] string, fails the decode.
fn exec_display_name(p: &Process, buf: &mut [u8]) -> Result<usize, UaccessError> {
    let argv = args::arg_addr(p, 1);
    if argv.as_usize() == 0 {
        return Err(UaccessError::BadAddress);
    }
    let argv0 = args::fetch_addr(p, argv)?;
    args::fetch_str(p, argv0, buf)
}

fn quoted_line(p: &Process, desc: &SyscallDesc, name: &[u8], ret: i64) -> String {
    format!(
        "[pid {}] {}(\"{}\") = {}",
        p.pid,
        desc.name,
        String::from_utf8_lossy(name),
        ret
    )
}

fn bad_ptr_line(p: &Process, desc: &SyscallDesc, ret: i64) -> String {
    format!("[pid {}] {}({}) = {}", p.pid, desc.name, BAD_PTR, ret)
}
