use alloc::string::String;
use kernel_alloc::AllocError;
use kernel_memory_addresses::{VirtualAddress, VirtualPageNumber};
use kernel_noff::NoffError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    #[error(transparent)]
    Noff(#[from] NoffError),
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error("unable to open executable `{0}`")]
    ExecutableNotFound(String),
    #[error("address space does not fit into 32 bits")]
    ImageTooLarge,
    #[error("{segment} segment ends at {end:#x}, past the address space end {limit:#x}")]
    SegmentOutOfRange {
        segment: &'static str,
        end: u64,
        limit: u32,
    },
    #[error("virtual address {0} lies outside the address space")]
    AddressOutOfRange(VirtualAddress),
    #[error("page {0} is mapped but has no frame")]
    MissingFrame(VirtualPageNumber),
}
