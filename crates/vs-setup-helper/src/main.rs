//! Visual Studio setup helper.
//!
//! Presents a menu, then lists every Visual Studio instance known to the installer with its
//! state, version, path and packages. It can also report which instances have the VC++ x86/x64
//! compiler tools installed.

mod error;
mod logging;
mod provider;
mod query;
mod report;
mod session;

#[cfg(test)]
mod fake;

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();
    let code = session::run_session(io::stdin().lock(), io::stdout().lock(), provider::connect);
    ExitCode::from(code)
}
