#![allow(dead_code)]

use kernel_alloc::PhysicalMemoryManager;
use kernel_info::config::VmConfig;
use kernel_noff::mem::MemFileSystem;
use kernel_noff::{ByteOrder, NOFF_HEADER_SIZE, NoffHeader, Segment};
use kernel_vmem::Scheduler;

/// Build a NOFF image with code at address 0 and data right after it.
pub fn image(code: &[u8], data: &[u8], bss: u32, order: ByteOrder) -> Vec<u8> {
    let code_len = u32::try_from(code.len()).unwrap();
    let data_len = u32::try_from(data.len()).unwrap();
    let header_len = u32::try_from(NOFF_HEADER_SIZE).unwrap();
    let header = NoffHeader::new(
        Segment::new(0, header_len, code_len),
        Segment::new(code_len, header_len + code_len, data_len),
        Segment::new(code_len + data_len, 0, bss),
    );
    let mut bytes = header.to_bytes(order).to_vec();
    bytes.extend_from_slice(code);
    bytes.extend_from_slice(data);
    bytes
}

/// `len` bytes counting upward from `seed`.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| seed.wrapping_add(u8::try_from(i % 251).unwrap()))
        .collect()
}

pub fn fs_with(name: &str, bytes: Vec<u8>) -> MemFileSystem {
    let mut fs = MemFileSystem::new();
    fs.insert(name, bytes);
    fs
}

pub fn pmm(frames: u32) -> PhysicalMemoryManager {
    PhysicalMemoryManager::new(&VmConfig::new().with_num_phys_pages(frames))
}

/// Scheduler double that advances time to every requested wake-up.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    pub ticks: u64,
    pub page_faults: u32,
    pub wake_ups: Vec<u64>,
}

impl Scheduler for RecordingScheduler {
    fn total_ticks(&self) -> u64 {
        self.ticks
    }

    fn record_page_fault(&mut self) {
        self.page_faults += 1;
    }

    fn sleep_until(&mut self, wake_tick: u64) {
        self.wake_ups.push(wake_tick);
        self.ticks = wake_tick;
    }
}
