//! Operating-system entropy sources.
//!
//! The DRBG never reads the OS directly: it consumes an entropy callback,
//! and this module provides the default one. On Linux the kernel pool is
//! read through the `getrandom` system call, on other unix systems through
//! `/dev/urandom`, and on Windows through the CNG system RNG.

/// Entropy callback signature: fill the buffer, report success.
pub type EntropyCallback = fn(&mut [u8]) -> bool;

/// Default OS entropy callback.
pub fn os_entropy(buf: &mut [u8]) -> bool {
    sys_random(buf)
}

#[cfg(target_os = "linux")]
fn sys_random(buf: &mut [u8]) -> bool {
    let mut filled = 0;

    // Partial reads can occur on signal interruption; loop until full.
    while filled < buf.len() {
        let ret = unsafe {
            libc::getrandom(
                buf[filled..].as_mut_ptr() as *mut libc::c_void,
                buf.len() - filled,
                0,
            )
        };

        if ret < 0 {
            return false;
        }
        filled += ret as usize;
    }

    true
}

#[cfg(all(unix, not(target_os = "linux")))]
fn sys_random(buf: &mut [u8]) -> bool {
    use std::io::Read;

    let Ok(mut f) = std::fs::File::open("/dev/urandom") else {
        return false;
    };
    f.read_exact(buf).is_ok()
}

#[cfg(windows)]
fn sys_random(buf: &mut [u8]) -> bool {
    use windows_sys::Win32::Security::Cryptography::{
        BCRYPT_USE_SYSTEM_PREFERRED_RNG, BCryptGenRandom,
    };

    let status = unsafe {
        BCryptGenRandom(
            core::ptr::null_mut(),
            buf.as_mut_ptr(),
            buf.len() as u32,
            BCRYPT_USE_SYSTEM_PREFERRED_RNG,
        )
    };

    status == 0
}
