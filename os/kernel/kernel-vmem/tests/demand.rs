mod common;

use common::{fs_with, image, pattern, pmm};
use kernel_info::config::PagingMode;
use kernel_info::machine::PAGE_SIZE;
use kernel_memory_addresses::{FrameNumber, VirtualAddress};
use kernel_noff::mem::MemFileSystem;
use kernel_noff::{ByteOrder, NOFF_HEADER_SIZE, NoffHeader, Segment};
use kernel_vmem::{AddressSpace, MmuException, SimulatedMmu, VmError};

#[test]
fn fault_loads_exactly_one_page_of_code() {
    let code = pattern(400, 11);
    let bytes = image(&code, &[], 0, ByteOrder::Native);
    let fs = fs_with("lazy", bytes.clone());
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "lazy", PagingMode::Demand, &mut pmm).unwrap();
    let before = space.page_table().snapshot();

    let va = VirtualAddress::new(2 * PAGE_SIZE + 17);
    let frame = space.demand_allocation(va, &fs, &mut pmm).unwrap();

    let after = space.page_table().snapshot();
    for (i, (b, a)) in before.iter().zip(after.iter()).enumerate() {
        if i == 2 {
            assert!(a.is_valid() && !a.flags.dirty() && !a.flags.used());
            assert_eq!(a.frame(), Some(frame));
        } else {
            assert_eq!(a, b);
        }
    }

    let start = NOFF_HEADER_SIZE + 2 * PAGE_SIZE as usize;
    let expected = &bytes[start..start + PAGE_SIZE as usize];
    assert_eq!(pmm.memory().frame(frame).unwrap(), expected);
    assert_eq!(pmm.issued(), 1);
}

#[test]
fn fault_past_the_image_zero_fills() {
    let fs = fs_with("z", image(&pattern(50, 1), &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    // dirty the frame the fault will get
    pmm.memory_mut()
        .frame_mut(FrameNumber::new(0))
        .unwrap()
        .fill(0xCC);
    let mut space = AddressSpace::open(&fs, "z", PagingMode::Demand, &mut pmm).unwrap();
    let last = VirtualAddress::new(space.size() - 1);
    let frame = space.demand_allocation(last, &fs, &mut pmm).unwrap();
    assert!(pmm.memory().frame(frame).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn translation_succeeds_after_resolving_the_fault() {
    let fs = fs_with("t", image(&pattern(300, 0), &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "t", PagingMode::Demand, &mut pmm).unwrap();
    let mut mmu = SimulatedMmu::new();
    space.restore_context(&mut mmu);

    let va = VirtualAddress::new(PAGE_SIZE + 4);
    assert_eq!(mmu.translate(va, false), Err(MmuException::PageFault(va)));
    let frame = space.demand_allocation(va, &fs, &mut pmm).unwrap();
    assert_eq!(mmu.translate(va, false), Ok(frame.join(4)));
}

#[test]
fn repeated_fault_is_a_no_op() {
    let fs = fs_with("r", image(&pattern(300, 0), &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "r", PagingMode::Demand, &mut pmm).unwrap();
    let va = VirtualAddress::new(5);
    let first = space.demand_allocation(va, &fs, &mut pmm).unwrap();
    let second = space.demand_allocation(va, &fs, &mut pmm).unwrap();
    assert_eq!(first, second);
    assert_eq!(pmm.issued(), 1);
}

#[test]
fn fault_outside_the_space_is_rejected() {
    let fs = fs_with("o", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "o", PagingMode::Demand, &mut pmm).unwrap();
    let va = VirtualAddress::new(space.size());
    assert_eq!(
        space.demand_allocation(va, &fs, &mut pmm),
        Err(VmError::AddressOutOfRange(va))
    );
    assert_eq!(pmm.issued(), 0);
}

#[test]
fn missing_image_leaves_the_entry_invalid() {
    let fs = fs_with("m", image(&pattern(10, 0), &[], 0, ByteOrder::Native));
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "m", PagingMode::Demand, &mut pmm).unwrap();
    let empty = MemFileSystem::new();
    let err = space
        .demand_allocation(VirtualAddress::zero(), &empty, &mut pmm)
        .err()
        .unwrap();
    assert_eq!(err, VmError::ExecutableNotFound("m".into()));
    assert_eq!(pmm.issued(), 0);
    assert!(!space.page_table().lock().entries()[0].is_valid());
}

#[test]
fn exhausted_frames_fail_without_binding() {
    let fs = fs_with("x", image(&[], &[], 0, ByteOrder::Native));
    let mut pmm = pmm(8);
    let mut space = AddressSpace::open(&fs, "x", PagingMode::Demand, &mut pmm).unwrap();
    // another consumer takes one frame after construction
    pmm.allocate_frame(None).unwrap();
    for vpn in 0..7 {
        space
            .demand_allocation(VirtualAddress::new(vpn * PAGE_SIZE), &fs, &mut pmm)
            .unwrap();
    }
    let last = VirtualAddress::new(7 * PAGE_SIZE);
    let err = space.demand_allocation(last, &fs, &mut pmm).err().unwrap();
    assert!(matches!(err, VmError::Alloc(_)));
    assert!(!space.page_table().lock().entries()[7].is_valid());
    assert_eq!(pmm.issued(), 8);
}

#[test]
fn data_pages_are_read_from_the_code_offset() {
    // one page of code, 64 filler bytes, then one page of data
    let page = PAGE_SIZE as usize;
    let header_len = u32::try_from(NOFF_HEADER_SIZE).unwrap();
    let header = NoffHeader::new(
        Segment::new(0, header_len, PAGE_SIZE),
        Segment::new(PAGE_SIZE, header_len + PAGE_SIZE + 64, PAGE_SIZE),
        Segment::default(),
    );
    let mut bytes = header.to_bytes(ByteOrder::Native).to_vec();
    bytes.extend(pattern(page, 0x10));
    bytes.extend(pattern(64, 0xA0));
    bytes.extend(pattern(page, 0x40));
    let fs = fs_with("asym", bytes.clone());
    let mut pmm = pmm(32);
    let mut space = AddressSpace::open(&fs, "asym", PagingMode::Demand, &mut pmm).unwrap();

    let frame = space
        .demand_allocation(VirtualAddress::new(PAGE_SIZE), &fs, &mut pmm)
        .unwrap();

    // code.in_file_addr + PAGE_SIZE: the filler, then the start of the data
    let start = NOFF_HEADER_SIZE + page;
    let loaded = pmm.memory().frame(frame).unwrap();
    assert_eq!(loaded, &bytes[start..start + page]);
    let data_start = start + 64;
    assert_ne!(loaded, &bytes[data_start..data_start + page]);
}
