//! Turning setup instances into printable records.

use std::fmt;

use tracing::{debug, info};
use vsinstances::{HRESULT, InstanceState};

use crate::error::{FieldError, ReportError, hex};
use crate::query::{InstanceView, PackageView, SetupQuery};

/// The component that provides the MSVC compiler for x86 and x64 targets.
pub const VC_TOOLS_X86_X64: &str = "Microsoft.VisualStudio.Component.VC.Tools.x86.x64";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Instances only.
    List,
    /// Instances and every workload and component.
    Packages,
    /// Instances, flagging whether each has the VC++ tools.
    VcTools,
}

impl Mode {
    /// Parse a menu choice, ignoring surrounding whitespace.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::List),
            "2" => Some(Self::Packages),
            "3" => Some(Self::VcTools),
            _ => None,
        }
    }

    fn prints_packages(self) -> bool {
        self == Self::Packages
    }

    /// The VC++ tools can be a component rather than the product so they need the full list too.
    fn reads_packages(self) -> bool {
        self != Self::List
    }

    fn flags_vc_tools(self) -> bool {
        self == Self::VcTools
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Instance { id: String, complete: bool },
    Version { version: String, parsed: Option<u64> },
    Path(String),
    /// `nested` packages come from the package list rather than being the product.
    Package {
        id: String,
        kind: Option<String>,
        nested: bool,
    },
    Blank,
    VcToolsFound { instance: String },
    VcToolsMissing { instance: String },
    Error(FieldError),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance { id, complete } => {
                let state = if *complete { "Complete" } else { "Incomplete" };
                write!(f, "InstanceId: {id} ({state})")
            }
            Self::Version {
                version,
                parsed: Some(parsed),
            } => write!(f, "InstallationVersion: {version} ({parsed})"),
            Self::Version {
                version,
                parsed: None,
            } => write!(f, "InstallationVersion: {version}"),
            Self::Path(path) => write!(f, "InstallationPath: {path}"),
            Self::Package { id, kind, nested } => {
                if *nested {
                    f.write_str("\t")?;
                }
                match kind {
                    Some(kind) => write!(f, "{id} ({kind})"),
                    None => f.write_str(id),
                }
            }
            Self::Blank => Ok(()),
            Self::VcToolsFound { instance } => write!(
                f,
                "Instance {instance} contains the VC++ 2017 compiler tools (x86 and x64 targets)."
            ),
            Self::VcToolsMissing { instance } => write!(
                f,
                "Instance {instance} does not have the VC++ 2017 compiler tools installed."
            ),
            Self::Error(error) => write!(f, "{error}"),
        }
    }
}

/// Everything printed for one instance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Record {
    pub lines: Vec<Line>,
}

#[cfg(test)]
impl Record {
    pub fn contains(&self, predicate: impl Fn(&Line) -> bool) -> bool {
        self.lines.iter().any(predicate)
    }
}

impl From<FieldError> for Record {
    fn from(error: FieldError) -> Self {
        Self {
            lines: vec![Line::Error(error)],
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Records for each instance, read from the installer as the iterator advances.
pub struct Listing<'q, Q: SetupQuery> {
    query: &'q Q,
    instances: Q::Instances,
    mode: Mode,
}

/// Start enumerating every instance known to the installer.
///
/// Each call enumerates from scratch.
pub fn list_instances<Q: SetupQuery>(query: &Q, mode: Mode) -> Result<Listing<'_, Q>, ReportError> {
    let instances = query.enum_all_instances().map_err(|hresult| {
        debug!(hresult = %hex(hresult), "EnumAllInstances failed");
        ReportError::NoEnumerator(hresult)
    })?;
    info!(?mode, "listing setup instances");
    Ok(Listing {
        query,
        instances,
        mode,
    })
}

impl<Q: SetupQuery> Iterator for Listing<'_, Q> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let record = match self.instances.next()? {
            Ok(instance) => describe(self.query, &instance, self.mode),
            Err(hresult) => {
                debug!(hresult = %hex(hresult), "instance skipped");
                Record::from(FieldError::Instance)
            }
        };
        Some(record)
    }
}

fn describe<Q: SetupQuery>(query: &Q, instance: &Q::Instance, mode: Mode) -> Record {
    let mut report = InstanceReport {
        record: Record::default(),
        mode,
        instance_id: String::new(),
        vc_tools_found: false,
    };

    match instance.instance_id() {
        Ok(id) => report.instance_id = id,
        Err(hresult) => report.fail(FieldError::InstanceId, hresult),
    }
    let state = instance.state().unwrap_or_else(|hresult| {
        report.fail(FieldError::State, hresult);
        InstanceState::eNone
    });
    report.push(Line::Instance {
        id: report.instance_id.clone(),
        complete: state.is_complete(),
    });

    match instance.installation_version() {
        Ok(version) => {
            let parsed = match query.parse_version(&version) {
                Ok(parsed) => Some(parsed),
                Err(hresult) => {
                    report.fail(FieldError::ParseVersion(version.clone()), hresult);
                    None
                }
            };
            report.push(Line::Version { version, parsed });
        }
        Err(hresult) => report.fail(FieldError::Version, hresult),
    }

    // The path may not exist until after a reboot.
    if state.contains(InstanceState::eLocal) {
        match instance.installation_path() {
            Ok(path) => report.push(Line::Path(path)),
            Err(hresult) => report.fail(FieldError::InstallationPath, hresult),
        }
    }

    // The product is registered last, possibly after a reboot.
    if state.contains(InstanceState::eRegistered) {
        report.registration(instance);
    }

    report.record
}

/// Per-instance state while building a [`Record`].
struct InstanceReport {
    record: Record,
    mode: Mode,
    instance_id: String,
    vc_tools_found: bool,
}

impl InstanceReport {
    fn push(&mut self, line: Line) {
        self.record.lines.push(line);
    }

    fn fail(&mut self, error: FieldError, hresult: HRESULT) {
        debug!(instance = %self.instance_id, hresult = %hex(hresult), "{error}");
        self.push(Line::Error(error));
    }

    /// The product and package list.
    ///
    /// The toolset verdict is only given once both could be read.
    fn registration<I: InstanceView>(&mut self, instance: &I) {
        let product = match instance.product() {
            Ok(Some(product)) => product,
            Ok(None) => {
                debug!(instance = %self.instance_id, "instance has no product");
                self.push(Line::Error(FieldError::Product));
                return;
            }
            Err(hresult) => {
                self.fail(FieldError::Product, hresult);
                return;
            }
        };
        self.package(&product, false);
        self.push(Line::Blank);

        if self.mode.reads_packages() {
            let packages = match instance.packages() {
                Ok(packages) => packages,
                Err(hresult) => {
                    self.fail(FieldError::Packages, hresult);
                    return;
                }
            };
            for package in packages {
                match package {
                    Ok(package) => self.package(&package, true),
                    Err(hresult) => self.fail(FieldError::Package, hresult),
                }
            }
            self.push(Line::Blank);
        }

        if self.mode.flags_vc_tools() && !self.vc_tools_found {
            self.push(Line::VcToolsMissing {
                instance: self.instance_id.clone(),
            });
        }
    }

    fn package<P: PackageView>(&mut self, package: &P, nested: bool) {
        let id = match package.id() {
            Ok(id) => Some(id),
            Err(hresult) => {
                self.fail(FieldError::PackageId, hresult);
                None
            }
        };

        if id.as_deref() == Some(VC_TOOLS_X86_X64) {
            self.vc_tools_found = true;
            if self.mode.flags_vc_tools() {
                self.push(Line::VcToolsFound {
                    instance: self.instance_id.clone(),
                });
            }
        }

        let kind = match package.kind() {
            Ok(kind) => Some(kind),
            Err(hresult) => {
                self.fail(FieldError::PackageType, hresult);
                None
            }
        };

        if self.mode.prints_packages()
            && let Some(id) = id
        {
            self.push(Line::Package { id, kind, nested });
        }
    }
}
