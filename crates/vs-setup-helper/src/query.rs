//! The read-only view of the setup configuration that reports are built from.
//!
//! On Windows these are implemented by the COM objects in `vsinstances`.

use vsinstances::{HRESULT, InstanceState};

pub trait SetupQuery {
    type Instance: InstanceView;
    type Instances: Iterator<Item = Result<Self::Instance, HRESULT>>;

    /// Every instance, complete or not.
    ///
    /// An `Err` item is an instance that can't be queried for its state and packages.
    fn enum_all_instances(&self) -> Result<Self::Instances, HRESULT>;

    fn parse_version(&self, version: &str) -> Result<u64, HRESULT>;
}

pub trait InstanceView {
    type Package: PackageView;

    fn instance_id(&self) -> Result<String, HRESULT>;
    fn state(&self) -> Result<InstanceState, HRESULT>;
    fn installation_version(&self) -> Result<String, HRESULT>;
    /// Requires [`InstanceState::eLocal`].
    fn installation_path(&self) -> Result<String, HRESULT>;
    /// Requires [`InstanceState::eRegistered`].
    fn product(&self) -> Result<Option<Self::Package>, HRESULT>;
    /// Requires [`InstanceState::eRegistered`].
    ///
    /// Each entry fails separately if it isn't a package reference.
    fn packages(&self) -> Result<Vec<Result<Self::Package, HRESULT>>, HRESULT>;
}

pub trait PackageView {
    fn id(&self) -> Result<String, HRESULT>;
    /// `Product`, `Workload`, `Component` and so on.
    fn kind(&self) -> Result<String, HRESULT>;
}
