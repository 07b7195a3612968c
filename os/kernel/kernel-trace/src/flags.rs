use bitfield_struct::bitfield;
use core::convert::Infallible;
use core::str::FromStr;

/// Enabled debug groups.
///
/// Parsing never fails: unknown characters are ignored, as the simulator's
/// `-d` switch does.
#[bitfield(u8)]
#[derive(Eq, PartialEq)]
pub struct DebugFlags {
    pub address_spaces: bool,
    pub machine: bool,
    pub all: bool,
    #[bits(5)]
    __: u8,
}

impl DebugFlags {
    /// Whether records from `target` are enabled.
    ///
    /// Only the crate part of the target (before the first `::`) matters.
    /// Returns `None` for crates outside every group.
    #[must_use]
    pub fn allows(&self, target: &str) -> Option<bool> {
        let krate = target.split("::").next().unwrap_or(target);
        let group = match krate {
            "kernel_vmem" | "kernel_noff" => self.address_spaces(),
            "kernel_alloc" | "kernel_registers" => self.machine(),
            _ => return None,
        };
        Some(self.all() || group)
    }
}

impl FromStr for DebugFlags {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Self::new();
        for c in s.chars() {
            match c {
                'a' => flags.set_address_spaces(true),
                'm' => flags.set_machine(true),
                '+' => flags.set_all(true),
                _ => {}
            }
        }
        Ok(flags)
    }
}
