//! Transport statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Statistics for one capture handle
#[derive(Debug, Clone, Default)]
pub struct CaptureStats {
    /// Frames handed to the session engine
    pub frames_read: u64,
    /// Frames injected on the wire
    pub frames_written: u64,
    /// Bytes handed to the session engine
    pub bytes_read: u64,
    /// Bytes injected on the wire
    pub bytes_written: u64,
    /// Injections pcap rejected
    pub write_errors: u64,
    /// Packets dropped by the kernel
    pub kernel_dropped: u64,
    /// Packets dropped by the interface
    pub if_dropped: u64,
    /// Time since the handle was opened
    pub duration: Duration,
}

impl CaptureStats {
    /// Merge kernel counters reported by pcap
    pub fn with_pcap_stats(mut self, stats: pcap::Stat) -> Self {
        self.kernel_dropped = stats.dropped as u64;
        self.if_dropped = stats.if_dropped as u64;
        self
    }

    /// Format statistics as human-readable string
    pub fn format(&self) -> String {
        format!(
            "Read: {} frames ({} bytes)\n\
             Written: {} frames ({} bytes), {} failed\n\
             Dropped: {} kernel, {} interface\n\
             Duration: {:.2}s",
            self.frames_read,
            self.bytes_read,
            self.frames_written,
            self.bytes_written,
            self.write_errors,
            self.kernel_dropped,
            self.if_dropped,
            self.duration.as_secs_f64(),
        )
    }
}

/// Shareable counters; clones observe the same values
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    frames_read: Arc<AtomicU64>,
    frames_written: Arc<AtomicU64>,
    bytes_read: Arc<AtomicU64>,
    bytes_written: Arc<AtomicU64>,
    write_errors: Arc<AtomicU64>,
    start_time: Instant,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self {
            frames_read: Arc::new(AtomicU64::new(0)),
            frames_written: Arc::new(AtomicU64::new(0)),
            bytes_read: Arc::new(AtomicU64::new(0)),
            bytes_written: Arc::new(AtomicU64::new(0)),
            write_errors: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn record_read(&self, size: usize) {
        self.frames_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(size as u64, Ordering::Relaxed);
    }

    pub fn record_write(&self, size: usize) {
        self.frames_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(size as u64, Ordering::Relaxed);
    }

    pub fn record_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self) -> CaptureStats {
        CaptureStats {
            frames_read: self.frames_read.load(Ordering::Relaxed),
            frames_written: self.frames_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            kernel_dropped: 0,
            if_dropped: 0,
            duration: self.start_time.elapsed(),
        }
    }
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
