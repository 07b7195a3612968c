mod common;

use common::{fs_with, image, pattern, pmm};
use kernel_alloc::AllocError;
use kernel_info::config::PagingMode;
use kernel_info::machine::PAGE_SIZE;
use kernel_memory_addresses::VirtualAddress;
use kernel_noff::ByteOrder;
use kernel_vmem::{AddressSpace, MmuException, SimulatedMmu, VmError};

#[test]
fn growth_appends_shared_pages_at_the_old_end() {
    let fs = fs_with("g", image(&pattern(200, 0), &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut mmu = SimulatedMmu::new();
    let mut space = AddressSpace::open(&fs, "g", PagingMode::Eager, &mut pmm).unwrap();
    let before = space.page_table().snapshot();
    let p = space.num_pages();

    let va = space
        .allocate_shared_memory(3 * PAGE_SIZE - 1, &mut pmm, &mut mmu)
        .unwrap();

    assert_eq!(va, VirtualAddress::new(p * PAGE_SIZE));
    assert_eq!(space.num_pages(), p + 3);
    let table = space.page_table().lock();
    assert_eq!(&table.entries()[..p as usize], before.entries());
    for e in &table.entries()[p as usize..] {
        assert!(e.is_valid() && e.is_shared());
        assert!(!e.flags.read_only() && !e.flags.used() && !e.flags.dirty());
    }
    assert_eq!(pmm.issued(), p + 3);
}

#[test]
fn growth_republishes_the_new_table() {
    let fs = fs_with("r", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "r", PagingMode::Eager, &mut pmm).unwrap();
    let mut mmu = SimulatedMmu::new();
    space.restore_context(&mut mmu);
    let old = space.page_table().clone();

    let va = space.allocate_shared_memory(1, &mut pmm, &mut mmu).unwrap();

    assert!(!mmu.page_table().unwrap().ptr_eq(&old));
    assert!(mmu.page_table().unwrap().ptr_eq(space.page_table()));
    assert_eq!(mmu.num_pages(), space.num_pages());
    assert!(mmu.translate(va, true).is_ok());
}

#[test]
fn a_stale_binding_cannot_reach_the_new_region() {
    let fs = fs_with("stale", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "stale", PagingMode::Eager, &mut pmm).unwrap();
    let mut stale = SimulatedMmu::new();
    space.restore_context(&mut stale);

    let mut current = SimulatedMmu::new();
    let va = space.allocate_shared_memory(1, &mut pmm, &mut current).unwrap();

    assert_eq!(stale.translate(va, false), Err(MmuException::AddressError(va)));
    assert!(current.translate(va, false).is_ok());
}

#[test]
fn growth_beyond_capacity_changes_nothing() {
    let fs = fs_with("cap", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(10);
    let mut space = AddressSpace::open(&fs, "cap", PagingMode::Eager, &mut pmm).unwrap();
    let mut mmu = SimulatedMmu::new();
    space.restore_context(&mut mmu);
    let handle = space.page_table().clone();

    let err = space
        .allocate_shared_memory(3 * PAGE_SIZE, &mut pmm, &mut mmu)
        .err()
        .unwrap();

    assert!(matches!(err, VmError::Alloc(_)));
    assert_eq!(space.num_pages(), 8);
    assert_eq!(pmm.issued(), 8);
    assert!(space.page_table().ptr_eq(&handle));
    assert!(mmu.page_table().unwrap().ptr_eq(&handle));
}

#[test]
fn growth_past_physical_memory_fails_even_with_frames_left() {
    let fs = fs_with("lazy", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(10);
    let mut space = AddressSpace::open(&fs, "lazy", PagingMode::Demand, &mut pmm).unwrap();
    let mut mmu = SimulatedMmu::new();
    space.restore_context(&mut mmu);
    assert_eq!(pmm.issued(), 0);

    let err = space
        .allocate_shared_memory(4 * PAGE_SIZE, &mut pmm, &mut mmu)
        .err()
        .unwrap();

    assert_eq!(
        err,
        VmError::Alloc(AllocError::OutOfFrames {
            requested: 12,
            available: 10,
            capacity: 10
        })
    );
    assert_eq!(space.num_pages(), 8);
    assert_eq!(pmm.issued(), 0);
    assert_eq!(mmu.num_pages(), 8);
}

#[test]
fn growth_up_to_physical_memory_succeeds() {
    let fs = fs_with("fit", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(10);
    let mut space = AddressSpace::open(&fs, "fit", PagingMode::Demand, &mut pmm).unwrap();
    let mut mmu = SimulatedMmu::new();
    space
        .allocate_shared_memory(2 * PAGE_SIZE, &mut pmm, &mut mmu)
        .unwrap();
    assert_eq!(space.num_pages(), 10);
    assert_eq!(pmm.issued(), 2);
}

#[test]
fn zero_bytes_grows_nothing() {
    let fs = fs_with("z", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "z", PagingMode::Eager, &mut pmm).unwrap();
    let mut mmu = SimulatedMmu::new();
    let va = space.allocate_shared_memory(0, &mut pmm, &mut mmu).unwrap();
    assert_eq!(va, VirtualAddress::new(space.size()));
    assert_eq!(space.num_pages(), 8);
    assert_eq!(mmu.num_pages(), 8);
}

/// Frames are not reference counted: after the creator goes away, a forked
/// child still aliases the shared frame, and a later allocation never hands
/// it out again because frames are never reclaimed.
#[test]
fn shared_frame_outlives_its_creator() {
    let fs = fs_with("h", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut mmu = SimulatedMmu::new();
    let mut parent = AddressSpace::open(&fs, "h", PagingMode::Eager, &mut pmm).unwrap();
    let va = parent.allocate_shared_memory(1, &mut pmm, &mut mmu).unwrap();
    let child = parent
        .fork(&fs, &mut pmm, &mut common::RecordingScheduler::default())
        .unwrap();
    let frame = parent
        .page_table()
        .lock()
        .get(va.page())
        .unwrap()
        .frame()
        .unwrap();
    let issued = pmm.issued();
    drop(parent);

    assert_eq!(pmm.issued(), issued);
    let still = child.page_table().lock().get(va.page()).unwrap().frame();
    assert_eq!(still, Some(frame));
    assert_ne!(pmm.allocate_frame(None).unwrap(), frame);
}
