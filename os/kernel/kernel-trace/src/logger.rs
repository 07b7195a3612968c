use crate::DebugFlags;
use alloc::boxed::Box;
use core::fmt;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Destination for rendered log lines.
pub trait TraceSink: Send + Sync {
    /// Write one line; `line` carries no trailing newline.
    fn write_line(&self, line: fmt::Arguments<'_>);
}

pub struct TraceLogger<S: TraceSink> {
    sink: S,
    max_level: LevelFilter,
    flags: DebugFlags,
}

impl<S: TraceSink> TraceLogger<S> {
    #[must_use]
    pub const fn new(sink: S, max_level: LevelFilter, flags: DebugFlags) -> Self {
        Self {
            sink,
            max_level,
            flags,
        }
    }

    #[must_use]
    pub const fn flags(&self) -> DebugFlags {
        self.flags
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: TraceSink + 'static> TraceLogger<S> {
    /// Install as the global logger. Call once during start-up.
    ///
    /// # Errors
    /// Returns [`SetLoggerError`] if a logger is already installed.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        log::set_logger(Box::leak(Box::new(self)))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl<S: TraceSink> Log for TraceLogger<S> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.max_level {
            return false;
        }
        if metadata.level() <= Level::Warn {
            return true;
        }
        self.flags.allows(metadata.target()).unwrap_or(true)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.sink.write_line(format_args!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {}
}

/// Writes every line to standard error.
#[cfg(feature = "std")]
#[derive(Debug, Default, Copy, Clone)]
pub struct StderrSink;

#[cfg(feature = "std")]
impl TraceSink for StderrSink {
    fn write_line(&self, line: fmt::Arguments<'_>) {
        use std::io::Write;
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::{String, ToString};
    use std::sync::Mutex;
    use std::vec::Vec;

    #[derive(Default)]
    struct Collect(Mutex<Vec<String>>);

    impl TraceSink for Collect {
        fn write_line(&self, line: fmt::Arguments<'_>) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    fn emit(logger: &TraceLogger<Collect>, level: Level, target: &str, msg: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target(target)
                .args(format_args!("{msg}"))
                .build(),
        );
    }

    fn logger(flags: &str, level: LevelFilter) -> TraceLogger<Collect> {
        TraceLogger::new(Collect::default(), level, flags.parse().unwrap())
    }

    #[test]
    fn renders_level_target_and_message() {
        let l = logger("a", LevelFilter::Trace);
        emit(&l, Level::Debug, "kernel_vmem::address_space", "9 pages");
        assert_eq!(
            *l.sink().0.lock().unwrap(),
            ["[DEBUG] kernel_vmem::address_space: 9 pages"]
        );
    }

    #[test]
    fn debug_output_needs_the_group_flag() {
        let l = logger("m", LevelFilter::Trace);
        emit(&l, Level::Debug, "kernel_vmem", "hidden");
        emit(&l, Level::Trace, "kernel_alloc::manager", "shown");
        emit(&l, Level::Warn, "kernel_vmem", "always");
        emit(&l, Level::Info, "vmctl", "ungrouped");
        let lines = l.sink().0.lock().unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("shown"));
        assert!(lines[1].ends_with("always"));
        assert!(lines[2].ends_with("ungrouped"));
    }

    #[test]
    fn level_filter_applies_first() {
        let l = logger("+", LevelFilter::Info);
        emit(&l, Level::Debug, "kernel_vmem", "too verbose");
        emit(&l, Level::Info, "kernel_vmem", "kept");
        assert_eq!(l.sink().0.lock().unwrap().len(), 1);
    }
}
