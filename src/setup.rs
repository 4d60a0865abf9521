use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::NonNull;
use core::ptr::null_mut as null;

use windows_core::{GUID, IUnknown};
use windows_result::HRESULT;
use windows_strings::BSTR;

use crate::defs::*;
use crate::hresult::*;
use crate::raw::*;
use crate::{AssertOk, InstanceState, OkHresult, WideStr};

/// The entry point for these APIs.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), vsinstances::HRESULT> {
/// vsinstances::com::initialize()?;
/// let setup = vsinstances::SetupConfiguration::new()?;
/// # Ok(()) }
/// ```
pub struct SetupConfiguration {
    raw: ISetupConfiguration,
}

impl SetupConfiguration {
    /// Create a new instance of `SetupConfiguration`.
    ///
    /// This will fail if COM is not already initalized.
    /// It fails with `REGDB_E_CLASSNOTREG` if the Visual Studio installer was never installed.
    pub fn new() -> Result<Self, HRESULT> {
        unsafe {
            let mut interface = null();
            CoCreateInstance(
                &SETUP_CONFIGURATION_CLSID,
                null(),
                CLSCTX_ALL,
                &ISetupConfiguration::IID,
                &mut interface,
            )
            .ok_hresult()?;
            let interface = NonNull::new(interface).assert_ok()?;
            Ok(Self::from_raw(interface))
        }
    }

    /// Query for `ISetupConfiguration2`, which can enumerate incomplete instances.
    pub fn to_configuration2(&self) -> Result<SetupConfiguration2, HRESULT> {
        self.com_ptr()
            .cast()
            .map(|raw| SetupConfiguration2 { raw })
    }

    /// Query for `ISetupHelper`, which parses version strings.
    pub fn to_helper(&self) -> Result<SetupHelper, HRESULT> {
        self.com_ptr().cast().map(|raw| SetupHelper { raw })
    }

    /// # Safety
    ///
    /// The pointer must be a valid ISetupConfiguration COM pointer.
    unsafe fn from_raw(raw: NonNull<core::ffi::c_void>) -> Self {
        Self {
            // SAFETY: the caller must make sure this is safe.
            raw: unsafe { ISetupConfiguration::from_raw(raw.as_ptr()) },
        }
    }

    fn com_ptr(&self) -> &ISetupConfiguration {
        &self.raw
    }
}

pub struct SetupConfiguration2 {
    raw: ISetupConfiguration2,
}

impl SetupConfiguration2 {
    /// Enumerate all instances, including those that are not yet complete.
    ///
    /// A success without an enumerator is reported as `E_POINTER`.
    pub fn EnumAllInstances(&self) -> Result<EnumSetupInstances, HRESULT> {
        unsafe {
            let mut instances = None;
            self.raw.EnumAllInstances(&mut instances).ok_hresult()?;
            let raw = instances.ok_or(E_POINTER)?;
            Ok(EnumSetupInstances { raw })
        }
    }
}

pub struct EnumSetupInstances {
    raw: IEnumSetupInstances,
}

impl Iterator for EnumSetupInstances {
    type Item = SetupInstance;

    /// Fetch one instance at a time.
    ///
    /// Enumeration ends at the first error, as well as at the end of the list.
    fn next(&mut self) -> Option<Self::Item> {
        let mut instance = None;
        unsafe {
            let hresult = self.raw.Next(1, &mut instance, null());
            match hresult {
                S_OK => instance.map(|raw| SetupInstance { raw }),
                _ => None,
            }
        }
    }
}

#[repr(transparent)]
pub struct SetupInstance {
    raw: ISetupInstance,
}

impl SetupInstance {
    pub fn GetInstanceId(&self) -> Result<BSTR, HRESULT> {
        let mut id = BSTR::new();
        unsafe {
            self.com_ptr()
                .GetInstanceId(&mut id)
                .ok_hresult()
                .map(|_| id)
        }
    }

    /// Only meaningful once the instance state contains [`InstanceState::eLocal`].
    pub fn GetInstallationPath(&self) -> Result<BSTR, HRESULT> {
        let mut path = BSTR::new();
        unsafe {
            self.com_ptr()
                .GetInstallationPath(&mut path)
                .ok_hresult()
                .map(|_| path)
        }
    }

    pub fn GetInstallationVersion(&self) -> Result<BSTR, HRESULT> {
        let mut version = BSTR::new();
        unsafe {
            self.com_ptr()
                .GetInstallationVersion(&mut version)
                .ok_hresult()
                .map(|_| version)
        }
    }

    /// Query for `ISetupInstance2`.
    ///
    /// Installers older than Visual Studio 2017 Update 1 may not implement it.
    pub fn to_instance2(&self) -> Result<SetupInstance2, HRESULT> {
        self.com_ptr().cast().map(|raw| SetupInstance2 { raw })
    }

    fn com_ptr(&self) -> &ISetupInstance {
        &self.raw
    }
}

#[repr(transparent)]
pub struct SetupInstance2 {
    raw: ISetupInstance2,
}

impl SetupInstance2 {
    pub fn GetState(&self) -> Result<InstanceState, HRESULT> {
        unsafe {
            let mut state = InstanceState::eNone;
            self.raw.GetState(&mut state).ok_hresult().map(|_| state)
        }
    }

    /// Only meaningful once the instance state contains [`InstanceState::eRegistered`].
    pub fn GetProduct(&self) -> Result<Option<SetupPackageReference>, HRESULT> {
        unsafe {
            let mut product = None;
            self.raw.GetProduct(&mut product).ok_hresult()?;
            Ok(product.map(|raw| SetupPackageReference { raw }))
        }
    }

    /// The packages of the instance as untyped COM objects.
    ///
    /// Use [`Unknown::to_package_reference`] on each entry.
    pub fn GetPackages(&self) -> Result<SafeArray<Option<Unknown>>, HRESULT> {
        unsafe {
            let mut packages = core::ptr::null_mut();
            self.raw.GetPackages(&mut packages).ok_hresult()?;
            if packages.is_null() {
                Err(E_POINTER)
            } else {
                SafeArray::from_raw(packages)
            }
        }
    }
}

impl Deref for SetupInstance2 {
    type Target = SetupInstance;
    fn deref(&self) -> &Self::Target {
        // SAFETY: Both types are transparent wrappers around the same COM pointer,
        // and `ISetupInstance2` extends the vtable of `ISetupInstance`.
        unsafe { &*(self as *const Self as *const SetupInstance) }
    }
}

/// A COM object of unknown type.
#[repr(transparent)]
pub struct Unknown {
    raw: IUnknown,
}

impl Unknown {
    pub fn to_package_reference(&self) -> Result<SetupPackageReference, HRESULT> {
        self.raw.cast().map(|raw| SetupPackageReference { raw })
    }
}

#[repr(transparent)]
pub struct SetupPackageReference {
    raw: ISetupPackageReference,
}

impl SetupPackageReference {
    pub fn GetId(&self) -> Result<BSTR, HRESULT> {
        unsafe {
            let mut id = BSTR::new();
            self.com_ptr().GetId(&mut id).ok_hresult().map(|_| id)
        }
    }

    /// The kind of package, e.g. `Product`, `Workload` or `Component`.
    pub fn GetType(&self) -> Result<BSTR, HRESULT> {
        unsafe {
            let mut kind = BSTR::new();
            self.com_ptr().GetType(&mut kind).ok_hresult().map(|_| kind)
        }
    }

    fn com_ptr(&self) -> &ISetupPackageReference {
        &self.raw
    }
}

pub struct SetupHelper {
    raw: ISetupHelper,
}

impl SetupHelper {
    /// Parse a dotted version (up to four parts of 16 bits each) into a single `u64`.
    pub fn ParseVersion<'w, W: TryInto<WideStr<'w>>>(&self, version: W) -> Result<u64, HRESULT> {
        let Ok(version) = version.try_into() else {
            return Err(E_INVALIDARG);
        };
        unsafe {
            let mut parsed = 0;
            self.raw
                .ParseVersion(version.as_ptr(), &mut parsed)
                .ok_hresult()
                .map(|_| parsed)
        }
    }
}

/// An owned slice.
///
/// This is roughly equivalent to a `Box<T>`.
/// It will deref to a slice of `T` and be freed on drop.
pub struct SafeArray<T> {
    raw: *mut SAFEARRAY,
    _item: PhantomData<*mut T>,
}

impl<T> SafeArray<T> {
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe {
            let len = (*self.raw).rgsabound[0].cElements as usize;
            if len == 0 {
                return &[];
            }
            core::slice::from_raw_parts((*self.raw).pvData.cast::<T>(), len)
        }
    }

    /// Takes ownership of `raw`.
    ///
    /// # Safety
    ///
    /// `raw` must be a valid one-dimensional `SAFEARRAY` whose elements are `T`.
    unsafe fn from_raw(raw: *mut SAFEARRAY) -> Result<Self, HRESULT> {
        unsafe {
            SafeArrayLock(raw).ok_hresult()?;
            let array = Self {
                raw,
                _item: PhantomData,
            };
            if (*raw).cDims != 1 || (*raw).cbElements as usize != size_of::<T>() {
                debug_assert_eq!((*raw).cDims, 1);
                debug_assert_eq!((*raw).cbElements as usize, size_of::<T>());
                // Dropping `array` unlocks and destroys it.
                Err(E_UNEXPECTED)
            } else {
                Ok(array)
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a SafeArray<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Deref for SafeArray<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> Drop for SafeArray<T> {
    fn drop(&mut self) {
        unsafe {
            // Destroying also releases every COM pointer in the array.
            let _ = SafeArrayUnlock(self.raw);
            let _ = SafeArrayDestroy(self.raw);
        }
    }
}

mod api {
    use super::*;
    #[cfg(not(target_vendor = "win7"))]
    windows_link::link!("combase.dll" "system" fn CoCreateInstance(
    rclsid: *const GUID,
    pUnkOuter: *mut core::ffi::c_void,
    dwClsContext: u32,
    riid: *const GUID,
    ppv: *mut *mut core::ffi::c_void,
) -> HRESULT);
    #[cfg(target_vendor = "win7")]
    windows_link::link!("ole32.dll" "system" fn CoCreateInstance(
    rclsid: *const GUID,
    pUnkOuter: *mut core::ffi::c_void,
    dwClsContext: u32,
    riid: *const GUID,
    ppv: *mut *mut core::ffi::c_void,
) -> HRESULT);
    windows_link::link!("oleaut32.dll" "system" fn SafeArrayLock(psa: *const SAFEARRAY) -> HRESULT);
    windows_link::link!("oleaut32.dll" "system" fn SafeArrayUnlock(psa: *const SAFEARRAY) -> HRESULT);
    windows_link::link!("oleaut32.dll" "system" fn SafeArrayDestroy(psa: *const SAFEARRAY) -> HRESULT);
}
use api::*;
