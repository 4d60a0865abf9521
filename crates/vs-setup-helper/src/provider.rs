//! Connecting to the installer's setup configuration.

#[cfg(windows)]
pub use com::connect;
#[cfg(not(windows))]
pub use unsupported::connect;

#[cfg(windows)]
mod com {
    use std::iter::{self, Map};

    use tracing::{debug, warn};
    use vsinstances::hresult::E_POINTER;
    use vsinstances::{
        EnumSetupInstances, HRESULT, InstanceState, SetupConfiguration, SetupConfiguration2,
        SetupHelper, SetupInstance, SetupInstance2, SetupPackageReference,
    };

    use crate::error::{ReportError, hex};
    use crate::query::{InstanceView, PackageView, SetupQuery};

    pub struct ComSetup {
        setup: SetupConfiguration2,
        helper: SetupHelper,
    }

    /// Create the setup configuration object and query the interfaces a listing needs.
    ///
    /// A fresh object is created for every listing so that instances installed in the meantime
    /// are picked up.
    pub fn connect() -> Result<ComSetup, ReportError> {
        if let Err(hresult) = vsinstances::com::initialize() {
            warn!(hresult = %hex(hresult), "COM initialization failed");
        }
        let setup = SetupConfiguration::new().map_err(ReportError::ProviderUnavailable)?;
        let helper = setup.to_helper().map_err(unavailable("ISetupHelper"))?;
        let setup = setup
            .to_configuration2()
            .map_err(unavailable("ISetupConfiguration2"))?;
        Ok(ComSetup { setup, helper })
    }

    fn unavailable(interface: &'static str) -> impl Fn(HRESULT) -> ReportError {
        move |hresult| {
            debug!(interface, hresult = %hex(hresult), "interface unavailable");
            ReportError::CapabilityUnavailable { interface, hresult }
        }
    }

    type ToInstance = fn(SetupInstance) -> Result<ComInstance, HRESULT>;

    impl SetupQuery for ComSetup {
        type Instance = ComInstance;
        type Instances = Map<EnumSetupInstances, ToInstance>;

        fn enum_all_instances(&self) -> Result<Self::Instances, HRESULT> {
            let instances = self.setup.EnumAllInstances()?;
            let to_instance: ToInstance = |instance| instance.to_instance2().map(ComInstance);
            Ok(instances.map(to_instance))
        }

        fn parse_version(&self, version: &str) -> Result<u64, HRESULT> {
            let wide: Vec<u16> = version.encode_utf16().chain(iter::once(0)).collect();
            self.helper.ParseVersion(wide.as_slice())
        }
    }

    pub struct ComInstance(SetupInstance2);

    impl InstanceView for ComInstance {
        type Package = ComPackage;

        fn instance_id(&self) -> Result<String, HRESULT> {
            self.0.GetInstanceId().map(|id| id.to_string())
        }

        fn state(&self) -> Result<InstanceState, HRESULT> {
            self.0.GetState()
        }

        fn installation_version(&self) -> Result<String, HRESULT> {
            self.0.GetInstallationVersion().map(|version| version.to_string())
        }

        fn installation_path(&self) -> Result<String, HRESULT> {
            self.0.GetInstallationPath().map(|path| path.to_string())
        }

        fn product(&self) -> Result<Option<ComPackage>, HRESULT> {
            self.0.GetProduct().map(|product| product.map(ComPackage))
        }

        fn packages(&self) -> Result<Vec<Result<ComPackage, HRESULT>>, HRESULT> {
            let packages = self.0.GetPackages()?;
            Ok(packages
                .iter()
                .map(|package| {
                    let package = package.as_ref().ok_or(E_POINTER)?;
                    package.to_package_reference().map(ComPackage)
                })
                .collect())
        }
    }

    pub struct ComPackage(SetupPackageReference);

    impl PackageView for ComPackage {
        fn id(&self) -> Result<String, HRESULT> {
            self.0.GetId().map(|id| id.to_string())
        }

        fn kind(&self) -> Result<String, HRESULT> {
            self.0.GetType().map(|kind| kind.to_string())
        }
    }
}

#[cfg(not(windows))]
mod unsupported {
    use std::iter::Empty;

    use vsinstances::hresult::REGDB_E_CLASSNOTREG;
    use vsinstances::{HRESULT, InstanceState};

    use crate::error::ReportError;
    use crate::query::{InstanceView, PackageView, SetupQuery};

    /// The setup configuration class only exists on Windows.
    pub enum Unavailable {}

    pub fn connect() -> Result<Unavailable, ReportError> {
        Err(ReportError::ProviderUnavailable(REGDB_E_CLASSNOTREG))
    }

    impl SetupQuery for Unavailable {
        type Instance = Unavailable;
        type Instances = Empty<Result<Unavailable, HRESULT>>;

        fn enum_all_instances(&self) -> Result<Self::Instances, HRESULT> {
            match *self {}
        }

        fn parse_version(&self, _: &str) -> Result<u64, HRESULT> {
            match *self {}
        }
    }

    impl InstanceView for Unavailable {
        type Package = Unavailable;

        fn instance_id(&self) -> Result<String, HRESULT> {
            match *self {}
        }

        fn state(&self) -> Result<InstanceState, HRESULT> {
            match *self {}
        }

        fn installation_version(&self) -> Result<String, HRESULT> {
            match *self {}
        }

        fn installation_path(&self) -> Result<String, HRESULT> {
            match *self {}
        }

        fn product(&self) -> Result<Option<Unavailable>, HRESULT> {
            match *self {}
        }

        fn packages(&self) -> Result<Vec<Result<Unavailable, HRESULT>>, HRESULT> {
            match *self {}
        }
    }

    impl PackageView for Unavailable {
        fn id(&self) -> Result<String, HRESULT> {
            match *self {}
        }

        fn kind(&self) -> Result<String, HRESULT> {
            match *self {}
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn connect_reports_missing_installer() {
            let error = connect().err().unwrap();
            assert_eq!(error.exit_code(), 0);
            assert_eq!(error.hresult(), Some(REGDB_E_CLASSNOTREG));
        }
    }
}
