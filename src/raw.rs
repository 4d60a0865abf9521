use core::ffi::c_void;

use crate::hresult::E_POINTER;
use crate::{InstanceState, OkHresult, defs::*};

use windows_core::{GUID, IUnknown, IUnknown_Vtbl};
use windows_result::HRESULT;
use windows_strings::BSTR;

macro_rules! com_interface {
    ($(
        #[interface($iid:literal)]
        pub unsafe interface $interface:ident: $parent:ident {
            $(
                $vis:vis fn $method:ident(&self $(, $arg:ident:$ty:ty)*$(,)?) -> $rtn:ty;
            )*
        }
    )+) => {
        use crate::raw as interface;
        $(
        #[repr(transparent)]
        #[derive(Clone)]
        pub struct $interface($parent);
        #[allow(unused)]
        impl $interface {
            $(
            #[inline(always)]
            pub unsafe fn $method(
                &self,
                $(
                    $arg: $ty,
                )*
            ) -> $rtn {
                unsafe {
                    let (vtable, raw) = Interface::vtable(self);
                    ((**vtable).$method)(raw, $($arg,)*)
                }
            }
            )*
        }

        unsafe impl Interface for $interface {
            const IID: GUID = GUID::from_u128($iid);
            type Vtable = vtable::$interface;
        }
        )*

        mod vtable {
            use super::*;
            use crate::raw as interface;
            type IUnknown = IUnknown_Vtbl;

            $(
                #[repr(C)]
                pub struct $interface {
                    pub base__: $parent,
                    $(
                        pub $method: unsafe extern "system" fn(this: *mut ::core::ffi::c_void, $($arg:$ty,)*) -> $rtn,
                    )*
                }
            )+
        }
    };
}

// Every vtable slot must be declared, in order, even the ones nothing calls.
com_interface!(
    #[interface(0x_b41463c3_8866_43b5_bc33_2b0676f7f42e)]
    pub unsafe interface ISetupInstance: IUnknown {
        pub fn GetInstanceId(&self, pbstrInstanceId: *mut BSTR) -> HRESULT;
        pub fn GetInstallDate(&self, pInstallDate: *mut FILETIME) -> HRESULT;
        pub fn GetInstallationName(&self, pbstrInstallationName: *mut BSTR) -> HRESULT;
        pub fn GetInstallationPath(&self, pbstrInstallationPath: *mut BSTR) -> HRESULT;
        pub fn GetInstallationVersion(&self, pbstrInstallationVersion: *mut BSTR) -> HRESULT;
        pub fn GetDisplayName(&self, lcid: LCID, pbstrDisplayName: *mut BSTR) -> HRESULT;
        pub fn GetDescription(&self, lcid: LCID, pbstrDescription: *mut BSTR) -> HRESULT;
        pub fn ResolvePath(&self, pwszRelativePath: LPCOLESTR, pbstrAbsolutePath: *mut BSTR)
        -> HRESULT;
    }

    #[interface(0x_89143c9a_05af_49b0_b717_72e218a2185c)]
    pub unsafe interface ISetupInstance2: ISetupInstance {
        pub fn GetState(&self, pState: *mut InstanceState) -> HRESULT;
        pub fn GetPackages(&self, ppsaPackages: *mut *mut SAFEARRAY) -> HRESULT;
        pub fn GetProduct(&self, ppPackage: *mut Option<interface::ISetupPackageReference>) -> HRESULT;
        pub fn GetProductPath(&self, pbstrProductPath: *mut BSTR) -> HRESULT;
        pub fn GetErrors(&self, ppErrorState: *mut Unused) -> HRESULT;
        pub fn IsLaunchable(&self, pfIsLaunchable: *mut VARIANT_BOOL) -> HRESULT;
        pub fn IsComplete(&self, pfIsComplete: *mut VARIANT_BOOL) -> HRESULT;
        pub fn GetProperties(&self, ppProperties: *mut Unused) -> HRESULT;
        pub fn GetEnginePath(&self, pbstrEnginePath: *mut BSTR) -> HRESULT;
    }

    #[interface(0xda8d8a16_b2b6_4487_a2f1_594ccccd6bf5)]
    pub unsafe interface ISetupPackageReference: IUnknown {
        pub fn GetId(&self, pbstrId: *mut BSTR) -> HRESULT;
        pub fn GetVersion(&self, pbstrVersion: *mut BSTR) -> HRESULT;
        pub fn GetChip(&self, pbstrChip: *mut BSTR) -> HRESULT;
        pub fn GetLanguage(&self, pbstrLanguage: *mut BSTR) -> HRESULT;
        pub fn GetBranch(&self, pbstrBranch: *mut BSTR) -> HRESULT;
        pub fn GetType(&self, pbstrType: *mut BSTR) -> HRESULT;
        pub fn GetUniqueId(&self, pbstrUniqueId: *mut BSTR) -> HRESULT;
        pub fn GetIsExtension(&self, pfIsExtension: *mut VARIANT_BOOL) -> HRESULT;
    }

    #[interface(0x_6380bcff_41d3_4b2e_8b2e_bf8a6810c848)]
    pub unsafe interface IEnumSetupInstances: IUnknown {
        pub fn Next(
            &self,
            celt: u32,
            rgelt: *mut Option<interface::ISetupInstance>,
            pceltFetched: *mut u32,
        ) -> HRESULT;
        pub fn Skip(&self, celt: u32) -> HRESULT;
        pub fn Reset(&self) -> HRESULT;
        pub fn Clone(&self, ppenum: *mut Option<interface::IEnumSetupInstances>) -> HRESULT;
    }

    #[interface(0x_42843719_db4c_46c2_8e7c_64f1816efd5b)]
    pub unsafe interface ISetupConfiguration: IUnknown {
        pub fn EnumInstances(&self, ppEnumInstances: *mut Option<interface::IEnumSetupInstances>) -> HRESULT;
        pub fn GetInstanceForCurrentProcess(&self, ppInstance: *mut Option<interface::ISetupInstance>) -> HRESULT;
        pub fn GetInstanceForPath(
            &self,
            wzPath: *const u16,
            ppInstance: *mut Option<interface::ISetupInstance>,
        ) -> HRESULT;
    }

    #[interface(0x_26aab78c_4a60_49d6_af3b_3c35bc93365d)]
    pub unsafe interface ISetupConfiguration2: ISetupConfiguration {
        pub fn EnumAllInstances(&self, ppEnumInstances: *mut Option<interface::IEnumSetupInstances>) -> HRESULT;
    }

    #[interface(0x_42b21b78_6192_463e_87bf_d577838f1d5c)]
    pub unsafe interface ISetupHelper: IUnknown {
        pub fn ParseVersion(&self, pwszVersion: LPCOLESTR, pullVersion: *mut u64) -> HRESULT;
        pub fn ParseVersionRange(
            &self,
            pwszVersionRange: LPCOLESTR,
            pullMinVersion: *mut u64,
            pullMaxVersion: *mut u64,
        ) -> HRESULT;
    }
);

pub const SETUP_CONFIGURATION_CLSID: GUID = GUID::from_u128(0x177F0C4A_1CD3_4DE7_A32C_71DBBB9FA36D);

unsafe impl Interface for IUnknown {
    const IID: GUID = GUID::from_u128(0x00000000_0000_0000_c000_000000000046);
    type Vtable = IUnknown_Vtbl;
}

pub(crate) unsafe trait Interface: Sized {
    const IID: GUID;
    type Vtable;

    #[inline(always)]
    unsafe fn vtable(&self) -> (*const *mut Self::Vtable, *mut c_void) {
        unsafe {
            let raw = *(core::ptr::from_ref(self).cast::<*mut c_void>());
            let vtable = raw.cast::<*mut Self::Vtable>();
            (vtable, raw)
        }
    }

    /// `QueryInterface` for `I`.
    ///
    /// Fails with `E_NOINTERFACE` if the object doesn't implement `I`.
    #[inline(always)]
    fn cast<I: Interface>(&self) -> Result<I, HRESULT> {
        unsafe {
            let (vtable, raw) = self.vtable();
            let vtable = vtable.cast::<*mut IUnknown_Vtbl>();
            let mut interface = None;
            ((**vtable).QueryInterface)(raw, &I::IID, core::ptr::from_mut(&mut interface).cast())
                .ok_hresult()?;
            interface.ok_or(E_POINTER)
        }
    }

    unsafe fn from_raw(raw: *mut c_void) -> Self {
        unsafe { core::mem::transmute_copy(&raw) }
    }
}
