// Windows.Win32.Foundation.FILETIME
#[repr(C)]
#[derive(Default, Debug, Clone, Copy)]
pub struct FILETIME {
    pub dwLowDateTime: u32,
    pub dwHighDateTime: u32,
}

// Windows.Win32.System.Com.SAFEARRAYBOUND
#[repr(C)]
pub struct SAFEARRAYBOUND {
    pub cElements: u32,
    pub lLbound: i32,
}
// Windows.Win32.System.Com.SAFEARRAY
#[repr(C)]
pub struct SAFEARRAY {
    pub cDims: u16,
    pub fFeatures: u16,
    pub cbElements: u32,
    pub cLocks: u32,
    pub pvData: *mut (),
    pub rgsabound: [SAFEARRAYBOUND; 1],
}

pub type LCID = u32;
pub type LPCOLESTR = *const u16;
pub type VARIANT_BOOL = i16;

/// Placeholder for out-parameters of vtable slots this crate never calls.
pub type Unused = *mut core::ffi::c_void;

pub const CLSCTX_ALL: u32 = 23;
