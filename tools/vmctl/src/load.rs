use crate::CliError;
use crate::host_fs::{HostFile, HostFileSystem};
use kernel_alloc::PhysicalMemoryManager;
use kernel_info::config::VmConfig;
use kernel_info::machine::PAGE_SIZE;
use kernel_memory_addresses::VirtualPageNumber;
use kernel_noff::NoffHeader;
use kernel_registers::{RegisterFile, RegisterId, Registers};
use kernel_trace::{DebugFlags, StderrSink, TraceLogger};
use kernel_vmem::{AddressSpace, MmuException, Scheduler, SimulatedMmu, VmError};
use log::{LevelFilter, info};
use std::path::Path;

#[derive(Debug, Default)]
struct Options {
    flags: DebugFlags,
    config: VmConfig,
    shared_bytes: Option<u32>,
    touch: bool,
    fork: bool,
    file: String,
}

/// Scheduler stand-in for a single-threaded run: sleeping just advances time.
#[derive(Debug, Default)]
struct Clock {
    ticks: u64,
    page_faults: u32,
}

impl Scheduler for Clock {
    fn total_ticks(&self) -> u64 {
        self.ticks
    }

    fn record_page_fault(&mut self) {
        self.page_faults += 1;
    }

    fn sleep_until(&mut self, wake_tick: u64) {
        self.ticks = self.ticks.max(wake_tick);
    }
}

/// `load [-d flags] [-R selector] [-P frames] [-S shared-bytes] [--touch] [--fork] <file>`
pub fn run(args: impl Iterator<Item = String>) -> Result<(), CliError> {
    let opts = parse(args)?;
    TraceLogger::new(StderrSink, LevelFilter::Trace, opts.flags).init()?;
    opts.config.validate()?;

    let path = Path::new(&opts.file);
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::Usage(format!("not a file name: {}", opts.file)))?;
    let fs = HostFileSystem::new(dir);

    let mut pmm = PhysicalMemoryManager::new(&opts.config);
    let mut mmu = SimulatedMmu::new();
    let mut space = AddressSpace::open(&fs, name, opts.config.paging, &mut pmm)?;
    space.restore_context(&mut mmu);

    let mut regs = Registers::new();
    space.init_user_registers(&mut regs);

    if let Some(bytes) = opts.shared_bytes {
        let va = space.allocate_shared_memory(bytes, &mut pmm, &mut mmu)?;
        info!("shared region of {bytes} bytes at {va}");
    }
    if opts.touch {
        touch_all(&mut space, &fs, &mut pmm, &mmu)?;
    }

    println!("`{name}`: {} pages, {} paging", space.num_pages(), opts.config.paging);
    print_segments(&space)?;
    print_table(&space);
    println!(
        "PC={:#x} NEXT_PC={:#x} SP={:#x}",
        regs.read_register(RegisterId::PC),
        regs.read_register(RegisterId::NEXT_PC),
        regs.read_register(RegisterId::STACK)
    );

    if opts.fork {
        let mut clock = Clock::default();
        let child = space.fork(&fs, &mut pmm, &mut clock)?;
        println!(
            "forked child: {} pages copied, {} ticks charged",
            clock.page_faults, clock.ticks
        );
        print_table(&child);
    }

    space.log_page_table();
    println!("frames issued: {} of {}", pmm.issued(), pmm.capacity());
    Ok(())
}

/// Read every page once through the MMU, resolving faults on the way.
fn touch_all(
    space: &mut AddressSpace<HostFile>,
    fs: &HostFileSystem,
    pmm: &mut PhysicalMemoryManager,
    mmu: &SimulatedMmu,
) -> Result<(), CliError> {
    for vpn in 0..space.num_pages() {
        let va = VirtualPageNumber::new(vpn).base();
        match mmu.translate(va, false) {
            Ok(_) => {}
            Err(MmuException::PageFault(_)) => {
                space.demand_allocation(va, fs, pmm)?;
            }
            Err(e) => return Err(CliError::Usage(format!("unexpected MMU exception: {e}"))),
        }
    }
    Ok(())
}

fn print_segments(space: &AddressSpace<HostFile>) -> Result<(), CliError> {
    let header = NoffHeader::read_from(space.executable()).map_err(VmError::from)?;
    for (name, seg) in [
        ("code", header.code),
        ("data", header.init_data),
        ("bss", header.uninit_data),
    ] {
        println!(
            " {name:<4} at {}  {:>6} bytes  file offset {}",
            seg.virtual_address(),
            seg.size,
            seg.in_file_addr
        );
    }
    Ok(())
}

fn print_table(space: &AddressSpace<HostFile>) {
    println!(" vpn  frame  V U D R S");
    for e in space.page_table().lock().iter() {
        let frame = e
            .physical_page
            .map_or_else(|| "-".to_string(), |f| f.to_string());
        println!(
            "{:>4}  {frame:>5}  {} {} {} {} {}",
            e.virtual_page,
            u8::from(e.flags.valid()),
            u8::from(e.flags.used()),
            u8::from(e.flags.dirty()),
            u8::from(e.flags.read_only()),
            u8::from(e.flags.shared()),
        );
    }
    println!(" {} bytes of {PAGE_SIZE}-byte pages", space.size());
}

fn parse(mut args: impl Iterator<Item = String>) -> Result<Options, CliError> {
    let mut opts = Options::default();
    let mut file = None;
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))
        };
        match arg.as_str() {
            "-d" => {
                let Ok(flags) = value("-d")?.parse();
                opts.flags = flags;
            }
            "-R" => {
                let selector = parse_number(&value("-R")?, "-R")?;
                let frames = opts.config.num_phys_pages;
                opts.config = VmConfig::from_replacement_selector(selector).with_num_phys_pages(frames);
            }
            "-P" => {
                let frames = parse_number(&value("-P")?, "-P")?;
                opts.config = opts.config.with_num_phys_pages(frames);
            }
            "-S" => opts.shared_bytes = Some(parse_number(&value("-S")?, "-S")?),
            "--touch" => opts.touch = true,
            "--fork" => opts.fork = true,
            other if other.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option {other}")));
            }
            other => file = Some(other.to_string()),
        }
    }
    opts.file = file.ok_or_else(|| CliError::Usage("load needs an executable".into()))?;
    Ok(opts)
}

fn parse_number(s: &str, flag: &str) -> Result<u32, CliError> {
    s.parse()
        .map_err(|_| CliError::Usage(format!("{flag} expects a number, got `{s}`")))
}
