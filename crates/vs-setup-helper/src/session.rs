//! The interactive menu.

use std::io::{self, BufRead, Write};

use tracing::{debug, error};

use crate::error::{ReportError, hex};
use crate::query::SetupQuery;
use crate::report::{Mode, list_instances};

const MENU: &str = "\
-------Visual Studio 2017 Setup Helper-------
1 - List installed VS2017 instances
2 - List all installed workloads and components
3 - Find instances with installed VC++ tools

Select an option:";

const HEADER: &str = "Listing VS '15' instances:";
const SEPARATOR: &str = "-------------------------------------------";
/// Printed after each instance.
const TERMINATOR: &str = "*";

/// Run the menu until input ends, returning the process exit code.
///
/// `connect` is called for every listing.
pub fn run_session<R, W, Q, C>(input: R, mut output: W, connect: C) -> u8
where
    R: BufRead,
    W: Write,
    Q: SetupQuery,
    C: FnMut() -> Result<Q, ReportError>,
{
    match run(input, &mut output, connect) {
        Ok(()) => 0,
        Err(err) => {
            match err.hresult() {
                Some(hresult) => error!(hresult = %hex(hresult), "{err}"),
                None => error!("{err}"),
            }
            // Nowhere left to report a failure to write.
            let _ = writeln!(output, "{err}");
            let _ = output.flush();
            err.exit_code()
        }
    }
}

fn run<R, W, Q, C>(mut input: R, output: &mut W, mut connect: C) -> Result<(), ReportError>
where
    R: BufRead,
    W: Write,
    Q: SetupQuery,
    C: FnMut() -> Result<Q, ReportError>,
{
    while let Some(mode) = prompt(&mut input, output)? {
        let query = connect()?;
        write_listing(&query, mode, output)?;
    }
    Ok(())
}

/// Show the menu until a valid choice is made. `None` at the end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<Mode>> {
    let mut line = String::new();
    loop {
        output.write_all(MENU.as_bytes())?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match Mode::from_choice(&line) {
            Some(mode) => return Ok(Some(mode)),
            None => debug!(choice = line.trim(), "invalid menu choice"),
        }
    }
}

fn write_listing<Q: SetupQuery, W: Write>(
    query: &Q,
    mode: Mode,
    output: &mut W,
) -> Result<(), ReportError> {
    let listing = list_instances(query, mode)?;
    writeln!(output, "{HEADER}")?;
    writeln!(output, "{SEPARATOR}")?;
    for record in listing {
        write!(output, "{record}")?;
        writeln!(output, "{TERMINATOR}")?;
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeInstance, FakePackage, FakeSetup};
    use crate::report::VC_TOOLS_X86_X64;
    use vsinstances::InstanceState;
    use vsinstances::hresult::{E_NOINTERFACE, E_UNEXPECTED, REGDB_E_CLASSNOTREG};

    fn session(
        input: &str,
        mut connect: impl FnMut() -> Result<FakeSetup, ReportError>,
    ) -> (u8, String) {
        let mut output = Vec::new();
        let code = run_session(input.as_bytes(), &mut output, &mut connect);
        (code, String::from_utf8(output).unwrap())
    }

    fn installed() -> Result<FakeSetup, ReportError> {
        let instance = FakeInstance::new("4f8a1c2e", InstanceState::eComplete)
            .with_version("17.9.34616.47")
            .with_path(r"C:\BuildTools")
            .with_product(FakePackage::new(
                "Microsoft.VisualStudio.Product.BuildTools",
                "Product",
            ))
            .with_packages(vec![Ok(FakePackage::new(VC_TOOLS_X86_X64, "Component"))]);
        Ok(FakeSetup::new(vec![Ok(instance)]))
    }

    #[test]
    fn end_of_input_exits_successfully() {
        let (code, output) = session("", || panic!("nothing was selected"));
        assert_eq!(code, 0);
        assert_eq!(output, MENU);
    }

    #[test]
    fn invalid_choices_prompt_again() {
        let (code, output) = session("0\nfour\n\n", || panic!("nothing was selected"));
        assert_eq!(code, 0);
        assert_eq!(output, MENU.repeat(4));
    }

    #[test]
    fn no_instances_prints_only_the_header() {
        let (code, output) = session("1\n", || Ok(FakeSetup::new(Vec::new())));
        assert_eq!(code, 0);
        assert_eq!(output, format!("{MENU}{HEADER}\n{SEPARATOR}\n{MENU}"));
    }

    #[test]
    fn each_instance_is_terminated() {
        let (code, output) = session("3\n", installed);
        assert_eq!(code, 0);
        let listing = output
            .strip_prefix(MENU)
            .and_then(|rest| rest.strip_suffix(MENU))
            .unwrap();
        assert_eq!(
            listing,
            "Listing VS '15' instances:\n\
             -------------------------------------------\n\
             InstanceId: 4f8a1c2e (Complete)\n\
             InstallationVersion: 17.9.34616.47 (4785115527381039)\n\
             InstallationPath: C:\\BuildTools\n\
             \n\
             Instance 4f8a1c2e contains the VC++ 2017 compiler tools (x86 and x64 targets).\n\
             \n\
             *\n"
        );
    }

    #[test]
    fn provider_is_connected_for_every_listing() {
        let mut connections = 0;
        let (code, output) = session("1\n2\n", || {
            connections += 1;
            installed()
        });
        assert_eq!(code, 0);
        assert_eq!(connections, 2);
        assert_eq!(output.matches(HEADER).count(), 2);
    }

    #[test]
    fn missing_installer() {
        let (code, output) = session("1\n1\n", || {
            Err(ReportError::ProviderUnavailable(REGDB_E_CLASSNOTREG))
        });
        assert_eq!(code, 0);
        assert_eq!(output.matches("may not be installed").count(), 1);
        assert_eq!(
            output,
            format!(
                "{MENU}Visual Studio '15' may not be installed (Component creation failed)\n"
            )
        );
    }

    #[test]
    fn unsupported_installer() {
        let (code, output) = session("2\n", || {
            Err(ReportError::CapabilityUnavailable {
                interface: "ISetupConfiguration2",
                hresult: E_NOINTERFACE,
            })
        });
        assert_eq!(code, 1);
        assert!(output.ends_with(
            "Unsupported version of Visual Studio '15' may be installed (ISetupConfiguration2 or ISetupHelper unavailable)\n"
        ));
        assert!(!output.contains(HEADER));
    }

    #[test]
    fn missing_enumerator_is_reported_before_the_header() {
        let (code, output) = session("1\n", || Ok(FakeSetup::without_enumerator(E_UNEXPECTED)));
        assert_eq!(code, 1);
        assert_eq!(
            output,
            format!("{MENU}No VS '15' version is installed (EnumAllInstances returned null)\n")
        );
    }
}
