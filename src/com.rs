//! COM lifetime helpers.
//!
//! Every object in this crate is a COM object, so COM must be initialized on the calling
//! thread before [`SetupConfiguration::new`](crate::SetupConfiguration::new) is called.
//! Objects created afterwards must not outlive [`uninitialize`].

use windows_result::HRESULT;

const COINIT_MULTITHREADED: u32 = 0;

/// Initialize COM for the current thread in the multithreaded apartment.
///
/// Calling this more than once on the same thread is fine.
/// The repeated calls succeed with `S_FALSE`.
pub fn initialize() -> Result<(), HRESULT> {
    let result = unsafe { CoInitializeEx(core::ptr::null(), COINIT_MULTITHREADED) };
    if result.is_ok() { Ok(()) } else { Err(result) }
}

/// Uninitialize COM.
///
/// # Safety
///
/// - This must be called on the thread that called [`initialize`].
/// - No COM object may still be alive. Beware of values that are only dropped
///   at the end of the enclosing scope, after this call has run.
///
/// ```no_run
/// # #[cfg(windows)]
/// # fn main() -> Result<(), vsinstances::HRESULT> {
/// use vsinstances::com;
///
/// com::initialize()?;
/// {
///     let _setup = vsinstances::SetupConfiguration::new()?;
/// }
/// // SAFETY: `_setup` was dropped at the end of the block above.
/// unsafe { com::uninitialize() };
/// # Ok(())
/// # }
/// # #[cfg(not(windows))]
/// # fn main() {}
/// ```
pub unsafe fn uninitialize() {
    unsafe {
        CoUninitialize();
    }
}

mod api {
    use super::HRESULT;
    #[cfg(not(target_vendor = "win7"))]
    windows_link::link!("combase.dll" "system" fn CoInitializeEx(pvReserved: *const (), dwCoInit: u32) -> HRESULT);
    #[cfg(target_vendor = "win7")]
    windows_link::link!("ole32.dll" "system" fn CoInitializeEx(pvReserved: *const (), dwCoInit: u32) -> HRESULT);
    #[cfg(not(target_vendor = "win7"))]
    windows_link::link!("combase.dll" "system" fn CoUninitialize());
    #[cfg(target_vendor = "win7")]
    windows_link::link!("ole32.dll" "system" fn CoUninitialize());
}
use api::*;
