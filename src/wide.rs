use core::marker::PhantomData;
use core::ptr::NonNull;

use windows_result::HRESULT;
use windows_strings::{BSTR, PCWSTR};

use crate::hresult::E_INVALIDARG;

/// A borrowed, null-terminated UTF-16 string.
#[derive(Clone, Copy)]
pub struct WideStr<'a> {
    wide: NonNull<u16>,
    lifetime: PhantomData<&'a [u16]>,
}

impl<'a> WideStr<'a> {
    /// The slice must end with its only null.
    pub fn from_slice_with_nul(u16s: &'a [u16]) -> Result<Self, HRESULT> {
        let pos = u16s.iter().copied().position(|n| n == 0);
        if pos.is_some() && pos == u16s.len().checked_sub(1) {
            // SAFETY: We've checked there is a null.
            Ok(unsafe { Self::from_slice_with_nul_unchecked(u16s) })
        } else {
            Err(E_INVALIDARG)
        }
    }

    /// Create a `WideStr` without doing any runtime checks.
    /// The `WideStr` will be truncated to the first null.
    ///
    /// # Safety
    ///
    /// The array must contain at least one null.
    pub const unsafe fn from_slice_with_nul_unchecked(u16s: &'a [u16]) -> Self {
        // SAFETY: It's up to the caller to ensure this is safe.
        Self {
            wide: unsafe { NonNull::new_unchecked(u16s.as_ptr().cast_mut()) },
            lifetime: PhantomData,
        }
    }

    /// The string without its null terminator.
    pub fn to_slice(self) -> &'a [u16] {
        // SAFETY: This type is guaranteed non-null and null-terminated.
        unsafe {
            let len = PCWSTR(self.as_ptr()).len();
            core::slice::from_raw_parts(self.as_ptr(), len)
        }
    }

    pub const fn as_ptr(self) -> *const u16 {
        self.wide.as_ptr()
    }
}

impl<'a> TryFrom<&'a [u16]> for WideStr<'a> {
    type Error = HRESULT;
    fn try_from(value: &'a [u16]) -> Result<Self, Self::Error> {
        Self::from_slice_with_nul(value)
    }
}

impl<'a> From<&'a BSTR> for WideStr<'a> {
    fn from(value: &'a BSTR) -> Self {
        // SAFETY: A non-empty BSTR is always null-terminated.
        // An empty BSTR may be a null pointer so it can't be borrowed.
        if value.is_empty() {
            const EMPTY: &[u16] = &[0];
            unsafe { WideStr::from_slice_with_nul_unchecked(EMPTY) }
        } else {
            unsafe { WideStr::from_slice_with_nul_unchecked(value) }
        }
    }
}
