//! # Virtual Memory Configuration
//!
//! Runtime switches for the virtual-memory core. The simulator's `-R` switch
//! is a single number that chooses both the load strategy and the intended
//! page-replacement algorithm; [`VmConfig::from_replacement_selector`] maps it,
//! while the typed fields let callers set each concern directly.

use crate::machine::NUM_PHYS_PAGES;
use core::fmt;
use core::str::FromStr;

/// How a freshly created address space obtains its pages.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PagingMode {
    /// Claim a frame for every page and copy all segments at creation time.
    #[default]
    Eager,
    /// Leave every page unmapped; pages are loaded by the fault handler.
    Demand,
}

/// Strategy used to pick the next physical frame.
///
/// Only the bump strategy exists: frames are handed out in increasing order
/// and never reclaimed. The enum is the extension point for victim-selecting
/// strategies.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ReplacementPolicy {
    /// Issue the next never-used frame.
    #[default]
    Bump,
}

/// Configuration consumed by the physical memory manager and address spaces.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct VmConfig {
    pub paging: PagingMode,
    pub replacement: ReplacementPolicy,
    /// Number of frames in the simulated physical memory.
    pub num_phys_pages: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown paging mode (expected `eager` or `demand`)")]
    UnknownPagingMode,
    #[error("physical memory must contain at least one frame")]
    InvalidFrameCount,
}

impl VmConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            paging: PagingMode::Eager,
            replacement: ReplacementPolicy::Bump,
            num_phys_pages: NUM_PHYS_PAGES,
        }
    }

    /// Build a configuration from the legacy numeric replacement selector.
    ///
    /// `0` means "no replacement algorithm", which implies eager loading.
    /// Any other value enables demand paging. All selectors currently resolve
    /// to [`ReplacementPolicy::Bump`].
    #[must_use]
    pub const fn from_replacement_selector(selector: u32) -> Self {
        let paging = if selector == 0 {
            PagingMode::Eager
        } else {
            PagingMode::Demand
        };
        Self::new().with_paging(paging)
    }

    #[must_use]
    pub const fn with_paging(mut self, paging: PagingMode) -> Self {
        self.paging = paging;
        self
    }

    #[must_use]
    pub const fn with_num_phys_pages(mut self, num_phys_pages: u32) -> Self {
        self.num_phys_pages = num_phys_pages;
        self
    }

    /// Check the configuration for values the machine cannot boot with.
    ///
    /// # Errors
    /// [`ConfigError::InvalidFrameCount`] if the frame count is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.num_phys_pages == 0 {
            return Err(ConfigError::InvalidFrameCount);
        }
        Ok(())
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for PagingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("eager") {
            Ok(Self::Eager)
        } else if s.eq_ignore_ascii_case("demand") {
            Ok(Self::Demand)
        } else {
            Err(ConfigError::UnknownPagingMode)
        }
    }
}

impl fmt::Display for PagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager => f.write_str("eager"),
            Self::Demand => f.write_str("demand"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_zero_is_eager() {
        let c = VmConfig::from_replacement_selector(0);
        assert_eq!(c.paging, PagingMode::Eager);
        assert_eq!(c.replacement, ReplacementPolicy::Bump);
        assert_eq!(c.num_phys_pages, NUM_PHYS_PAGES);
    }

    #[test]
    fn nonzero_selectors_enable_demand_paging() {
        for sel in [1, 2, 3, 4, 99] {
            let c = VmConfig::from_replacement_selector(sel);
            assert_eq!(c.paging, PagingMode::Demand);
            assert_eq!(c.replacement, ReplacementPolicy::Bump);
        }
    }

    #[test]
    fn paging_mode_parses_case_insensitively() {
        assert_eq!("eager".parse::<PagingMode>(), Ok(PagingMode::Eager));
        assert_eq!("Demand".parse::<PagingMode>(), Ok(PagingMode::Demand));
        assert_eq!(
            "lazy".parse::<PagingMode>(),
            Err(ConfigError::UnknownPagingMode)
        );
    }

    #[test]
    fn zero_frames_is_rejected() {
        let c = VmConfig::new().with_num_phys_pages(0);
        assert_eq!(c.validate(), Err(ConfigError::InvalidFrameCount));
        assert_eq!(VmConfig::default().validate(), Ok(()));
    }
}
