//! # Machine Layout

/// Size of one virtual page and one physical frame, in bytes.
///
/// Matches the disk sector size so that a page can be streamed from an
/// executable with a single sector-sized read.
pub const PAGE_SIZE: u32 = 128;

/// Default number of physical frames in the simulated main memory.
pub const NUM_PHYS_PAGES: u32 = 32;

/// Bytes reserved at the top of every address space for the user stack.
pub const USER_STACK_SIZE: u32 = 1024;

/// Distance kept between the initial stack pointer and the end of the
/// address space, so the first push cannot run off the last page.
pub const STACK_MARGIN: u32 = 16;

/// Virtual address of the first user instruction (the `Start` routine).
pub const USER_ENTRY_POINT: u32 = 0;

/// Width of one instruction; the next-PC register starts one instruction
/// past the entry point because of branch delay slots.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Simulated ticks charged to a thread for every page copied during fork.
pub const PAGE_COPY_LATENCY: u64 = 1000;

const _: () = {
    assert!(PAGE_SIZE.is_power_of_two());
    assert!(USER_STACK_SIZE.is_multiple_of(PAGE_SIZE));
    assert!(STACK_MARGIN < PAGE_SIZE);
    assert!(USER_ENTRY_POINT.is_multiple_of(INSTRUCTION_SIZE));
    assert!(NUM_PHYS_PAGES > 0);
};
