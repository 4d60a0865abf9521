//! Read-only access to the Visual Studio setup configuration.
//!
//! The installer registers a COM class that knows about every installed instance of Visual
//! Studio (and the Build Tools). This crate is a thin wrapper around that COM interface,
//! exposing only the queries needed to enumerate instances and inspect their packages.
//! Consult the [`Microsoft.VisualStudio.Setup.Configuration`] documentation for the meaning of
//! each call.
//!
//! COM must be initialized before use. [`com::initialize`] does this for the current thread.
//!
//! The COM layer is only available on Windows. [`InstanceState`] and the [`hresult`] constants
//! are available everywhere so that code consuming this crate can be tested on any platform.
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> Result<(), vsinstances::HRESULT> {
//! use vsinstances::{InstanceState, SetupConfiguration, com};
//!
//! com::initialize()?;
//! let setup = SetupConfiguration::new()?;
//! for instance in setup.to_configuration2()?.EnumAllInstances()? {
//!     let instance = instance.to_instance2()?;
//!     if instance.GetState()?.contains(InstanceState::eLocal) {
//!         println!("{}", instance.GetInstallationPath()?);
//!     }
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```
//!
//! [`Microsoft.VisualStudio.Setup.Configuration`]: https://learn.microsoft.com/en-us/dotnet/api/microsoft.visualstudio.setup.configuration

// We should use the same style as the official documentation
#![allow(nonstandard_style)]
#![allow(clippy::upper_case_acronyms)]

pub mod hresult;

mod state;
pub use state::InstanceState;

pub use windows_result::HRESULT;

#[cfg(windows)]
pub mod com;
#[cfg(windows)]
mod defs;
#[cfg(windows)]
mod raw;
#[cfg(windows)]
mod setup;
#[cfg(windows)]
mod wide;

#[cfg(windows)]
pub use setup::*;
#[cfg(windows)]
pub use wide::WideStr;
#[cfg(windows)]
pub use windows_strings::BSTR;

#[cfg(windows)]
trait AssertOk {
    type T;
    fn assert_ok(self) -> Result<Self::T, HRESULT>;
}
#[cfg(windows)]
impl<T> AssertOk for Option<T> {
    type T = T;

    /// For APIs that must have written a COM pointer when they return success.
    ///
    /// Panics in debug mode, returns `Err(E_POINTER)` in release mode.
    #[inline(always)]
    fn assert_ok(self) -> Result<T, HRESULT> {
        debug_assert!(self.is_some());
        self.ok_or(hresult::E_POINTER)
    }
}

#[cfg(windows)]
trait OkHresult {
    fn ok_hresult(self) -> Result<(), HRESULT>;
}
#[cfg(windows)]
impl OkHresult for HRESULT {
    fn ok_hresult(self) -> Result<(), HRESULT> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }
}
