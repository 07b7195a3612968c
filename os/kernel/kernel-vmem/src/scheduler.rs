/// The parts of the thread scheduler the address-space code needs.
///
/// Fork uses it to charge simulated page-copy latency to the forking thread.
pub trait Scheduler {
    /// Current simulated time.
    fn total_ticks(&self) -> u64;

    /// Count one page fault in the statistics.
    fn record_page_fault(&mut self);

    /// Put the current thread on the timed wait queue until `wake_tick`.
    fn sleep_until(&mut self, wake_tick: u64);
}
