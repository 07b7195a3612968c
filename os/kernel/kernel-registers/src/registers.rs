use crate::RegisterFile;
use core::fmt;

/// Number of general purpose registers.
pub const NUM_GP_REGS: usize = 32;

/// Total number of registers, general purpose plus special.
pub const NUM_TOTAL_REGS: usize = 40;

/// Index of one register in the simulated register file.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RegisterId(u8);

impl RegisterId {
    /// Stack pointer.
    pub const STACK: Self = Self(29);
    pub const HI: Self = Self(32);
    pub const LO: Self = Self(33);
    /// Current program counter.
    pub const PC: Self = Self(34);
    /// Next program counter (branch delay slot).
    pub const NEXT_PC: Self = Self(35);
    /// Previous program counter, kept for debugging.
    pub const PREV_PC: Self = Self(36);
    /// Faulting virtual address after an exception.
    pub const BAD_VADDR: Self = Self(39);

    /// Construct a register id from its raw index.
    ///
    /// Returns `None` if `index` is not below [`NUM_TOTAL_REGS`].
    #[inline]
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < NUM_TOTAL_REGS {
            Some(Self(index))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every register id in index order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_TOTAL_REGS as u8).map(Self)
    }
}

impl fmt::Debug for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::STACK => f.write_str("SP"),
            Self::PC => f.write_str("PC"),
            Self::NEXT_PC => f.write_str("NextPC"),
            Self::PREV_PC => f.write_str("PrevPC"),
            Self::BAD_VADDR => f.write_str("BadVAddr"),
            Self(n) => write!(f, "r{n}"),
        }
    }
}

/// Plain array-backed register file.
#[derive(Clone, Eq, PartialEq)]
pub struct Registers {
    regs: [i32; NUM_TOTAL_REGS],
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_TOTAL_REGS],
        }
    }

    /// Raw view of all registers, in index order.
    #[must_use]
    pub const fn as_slice(&self) -> &[i32] {
        &self.regs
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile for Registers {
    #[inline]
    fn read_register(&self, reg: RegisterId) -> i32 {
        self.regs[reg.as_usize()]
    }

    #[inline]
    fn write_register(&mut self, reg: RegisterId, value: i32) {
        log::trace!("write register {reg:?} = {value}");
        self.regs[reg.as_usize()] = value;
    }

    fn clear(&mut self) {
        self.regs = [0; NUM_TOTAL_REGS];
    }
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(RegisterId::all().map(|r| (r, self.regs[r.as_usize()])))
            .finish()
    }
}
