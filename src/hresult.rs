//! `HRESULT` values returned or checked by this crate.

use windows_result::HRESULT;

pub const S_OK: HRESULT = HRESULT(0);
pub const S_FALSE: HRESULT = HRESULT(0x1);
pub const E_NOINTERFACE: HRESULT = HRESULT(0x80004002_u32 as i32);
pub const E_POINTER: HRESULT = HRESULT(0x80004003_u32 as i32);
pub const E_INVALIDARG: HRESULT = HRESULT(0x80070057_u32 as i32);
pub const E_UNEXPECTED: HRESULT = HRESULT(0x8000FFFF_u32 as i32);
/// The setup configuration class isn't registered, i.e. the Visual Studio installer is missing.
pub const REGDB_E_CLASSNOTREG: HRESULT = HRESULT(0x80040154_u32 as i32);
