use std::io;

use thiserror::Error;
use vsinstances::HRESULT;

/// Failures that end a listing before any instance is reported.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Visual Studio '15' may not be installed (Component creation failed)")]
    ProviderUnavailable(HRESULT),

    #[error(
        "Unsupported version of Visual Studio '15' may be installed (ISetupConfiguration2 or ISetupHelper unavailable)"
    )]
    CapabilityUnavailable {
        interface: &'static str,
        hresult: HRESULT,
    },

    #[error("No VS '15' version is installed (EnumAllInstances returned null)")]
    NoEnumerator(HRESULT),

    #[error("Error: {0}")]
    Io(#[from] io::Error),
}

impl ReportError {
    /// A missing installer is not a failure of this program.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ProviderUnavailable(_) => 0,
            Self::CapabilityUnavailable { .. } | Self::NoEnumerator(_) | Self::Io(_) => 1,
        }
    }

    pub fn hresult(&self) -> Option<HRESULT> {
        match self {
            Self::ProviderUnavailable(hresult)
            | Self::CapabilityUnavailable { hresult, .. }
            | Self::NoEnumerator(hresult) => Some(*hresult),
            Self::Io(_) => None,
        }
    }
}

/// A single value that couldn't be read while describing an instance.
///
/// These are printed in place of the value and the report carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Error querying instance (ISetupInstance2 unavailable)")]
    Instance,
    #[error("Error reading instance id")]
    InstanceId,
    #[error("Error reading instance state")]
    State,
    #[error("Error reading version")]
    Version,
    #[error("Error parsing version {0}")]
    ParseVersion(String),
    #[error("Error getting installation path")]
    InstallationPath,
    #[error("Error getting product info (ISetupPackageReference missing)")]
    Product,
    #[error("Error enumerating packages (GetPackages failed)")]
    Packages,
    #[error("Error querying package (QI for ISetupPackageReference failed)")]
    Package,
    #[error("Error getting reference id (GetId failed)")]
    PackageId,
    #[error("Error getting reference type (GetType failed)")]
    PackageType,
}

/// Formats an `HRESULT` the way Windows tools print them, e.g. `0x80040154`.
pub fn hex(hresult: HRESULT) -> String {
    format!("{:#010x}", hresult.0 as u32)
}
