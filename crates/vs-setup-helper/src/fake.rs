//! In-memory stand-ins for the installer's COM objects.

use std::vec;

use vsinstances::hresult::E_INVALIDARG;
use vsinstances::{HRESULT, InstanceState};

use crate::query::{InstanceView, PackageView, SetupQuery};

pub struct FakeSetup {
    instances: Result<Vec<Result<FakeInstance, HRESULT>>, HRESULT>,
}

impl FakeSetup {
    pub fn new(instances: Vec<Result<FakeInstance, HRESULT>>) -> Self {
        Self {
            instances: Ok(instances),
        }
    }

    pub fn without_enumerator(hresult: HRESULT) -> Self {
        Self {
            instances: Err(hresult),
        }
    }
}

impl SetupQuery for FakeSetup {
    type Instance = FakeInstance;
    type Instances = vec::IntoIter<Result<FakeInstance, HRESULT>>;

    fn enum_all_instances(&self) -> Result<Self::Instances, HRESULT> {
        self.instances.clone().map(Vec::into_iter)
    }

    /// Same packing as the installer: up to four dotted parts of 16 bits, most significant first.
    fn parse_version(&self, version: &str) -> Result<u64, HRESULT> {
        let parts = version
            .split('.')
            .map(|part| part.parse::<u16>().map_err(|_| E_INVALIDARG))
            .collect::<Result<Vec<_>, _>>()?;
        if parts.len() > 4 {
            return Err(E_INVALIDARG);
        }
        Ok(parts
            .iter()
            .enumerate()
            .fold(0, |parsed, (i, &part)| parsed | u64::from(part) << (48 - 16 * i)))
    }
}

#[derive(Clone)]
pub struct FakeInstance {
    pub id: Result<String, HRESULT>,
    pub state: Result<InstanceState, HRESULT>,
    pub version: Result<String, HRESULT>,
    pub path: Result<String, HRESULT>,
    pub product: Result<Option<FakePackage>, HRESULT>,
    pub packages: Result<Vec<Result<FakePackage, HRESULT>>, HRESULT>,
}

impl FakeInstance {
    pub fn new(id: &str, state: InstanceState) -> Self {
        Self {
            id: Ok(id.into()),
            state: Ok(state),
            version: Ok(String::new()),
            path: Ok(String::new()),
            product: Ok(None),
            packages: Ok(Vec::new()),
        }
    }

    pub fn with_state(mut self, state: InstanceState) -> Self {
        self.state = Ok(state);
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Ok(version.into());
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Ok(path.into());
        self
    }

    pub fn with_product(mut self, product: FakePackage) -> Self {
        self.product = Ok(Some(product));
        self
    }

    pub fn with_packages(mut self, packages: Vec<Result<FakePackage, HRESULT>>) -> Self {
        self.packages = Ok(packages);
        self
    }

    pub fn with_packages_error(mut self, hresult: HRESULT) -> Self {
        self.packages = Err(hresult);
        self
    }

    pub fn without_id(mut self, hresult: HRESULT) -> Self {
        self.id = Err(hresult);
        self
    }

    pub fn without_state(mut self, hresult: HRESULT) -> Self {
        self.state = Err(hresult);
        self
    }

    pub fn without_version(mut self, hresult: HRESULT) -> Self {
        self.version = Err(hresult);
        self
    }

    pub fn without_path(mut self, hresult: HRESULT) -> Self {
        self.path = Err(hresult);
        self
    }
}

impl InstanceView for FakeInstance {
    type Package = FakePackage;

    fn instance_id(&self) -> Result<String, HRESULT> {
        self.id.clone()
    }

    fn state(&self) -> Result<InstanceState, HRESULT> {
        self.state
    }

    fn installation_version(&self) -> Result<String, HRESULT> {
        self.version.clone()
    }

    fn installation_path(&self) -> Result<String, HRESULT> {
        self.path.clone()
    }

    fn product(&self) -> Result<Option<FakePackage>, HRESULT> {
        self.product.clone()
    }

    fn packages(&self) -> Result<Vec<Result<FakePackage, HRESULT>>, HRESULT> {
        self.packages.clone()
    }
}

#[derive(Clone)]
pub struct FakePackage {
    id: Result<String, HRESULT>,
    kind: Result<String, HRESULT>,
}

impl FakePackage {
    pub fn new(id: &str, kind: &str) -> Self {
        Self {
            id: Ok(id.into()),
            kind: Ok(kind.into()),
        }
    }

    pub fn without_id(mut self, hresult: HRESULT) -> Self {
        self.id = Err(hresult);
        self
    }

    pub fn without_kind(mut self, hresult: HRESULT) -> Self {
        self.kind = Err(hresult);
        self
    }
}

impl PackageView for FakePackage {
    fn id(&self) -> Result<String, HRESULT> {
        self.id.clone()
    }

    fn kind(&self) -> Result<String, HRESULT> {
        self.kind.clone()
    }
}
