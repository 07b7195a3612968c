//! Host-side tool for NOFF images and the virtual-memory core.
//!
//! ```text
//! vmctl pack <code> <data> <bss-bytes> <out> [--swap]
//! vmctl load [-d flags] [-R selector] [-P frames] [-S shared-bytes] [--touch] [--fork] <file>
//! ```

mod host_fs;
mod load;
mod pack;

use kernel_info::config::ConfigError;
use kernel_vmem::VmError;
use std::env;
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Vm(#[from] VmError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

const USAGE: &str = "usage: vmctl pack <code> <data> <bss-bytes> <out> [--swap]\n       \
                     vmctl load [-d flags] [-R selector] [-P frames] [-S shared-bytes] [--touch] [--fork] <file>";

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let result = match args.next().as_deref() {
        Some("pack") => pack::run(args),
        Some("load") => load::run(args),
        _ => Err(CliError::Usage(USAGE.into())),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("vmctl: {e}");
            ExitCode::FAILURE
        }
    }
}
