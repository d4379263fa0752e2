//! Simple profiling guards using thread-local storage
//!
//! Timing is collected per category without changing function signatures.
//! Enable with environment variable: BATTLESNAKE_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Profiled categories, in report order
pub const CATEGORIES: [&str; 4] = ["decision", "heuristics", "path_search", "contest"];

const LABELS: [&str; 4] = ["Decision", "Heuristic Passes", "Path Search", "Contest Checks"];

thread_local! {
    static LOCAL_TIME: RefCell<[u64; 4]> = RefCell::new([0; 4]);
    static LOCAL_COUNT: RefCell<[usize; 4]> = RefCell::new([0; 4]);
}

// Global aggregators, one slot per category
static GLOBAL_TIME: [AtomicU64; 4] = [
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
];
static GLOBAL_COUNT: [AtomicUsize; 4] = [
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
];

#[inline]
pub fn is_profiling_enabled() -> bool {
    std::env::var("BATTLESNAKE_PROFILE").is_ok()
}

fn slot(category: &str) -> Option<usize> {
    CATEGORIES.iter().position(|name| *name == category)
}

/// Records the time until drop under `category`; `None` when profiling is off
pub struct ProfileGuard {
    start: Instant,
    slot: usize,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if !is_profiling_enabled() {
            return None;
        }
        slot(category).map(|slot| ProfileGuard {
            start: Instant::now(),
            slot,
        })
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        LOCAL_TIME.with(|t| t.borrow_mut()[self.slot] += elapsed_ns);
        LOCAL_COUNT.with(|c| c.borrow_mut()[self.slot] += 1);
    }
}

/// Moves this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    LOCAL_TIME.with(|t| {
        let mut local = t.borrow_mut();
        for (global, value) in GLOBAL_TIME.iter().zip(local.iter()) {
            global.fetch_add(*value, Ordering::Relaxed);
        }
        *local = [0; 4];
    });
    LOCAL_COUNT.with(|c| {
        let mut local = c.borrow_mut();
        for (global, value) in GLOBAL_COUNT.iter().zip(local.iter()) {
            global.fetch_add(*value, Ordering::Relaxed);
        }
        *local = [0; 4];
    });
}

/// Global (time in ns, call count) for a category
pub fn totals(category: &str) -> (u64, usize) {
    match slot(category) {
        Some(slot) => (
            GLOBAL_TIME[slot].load(Ordering::Relaxed),
            GLOBAL_COUNT[slot].load(Ordering::Relaxed),
        ),
        None => (0, 0),
    }
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    for (category, label) in CATEGORIES.iter().zip(LABELS.iter()) {
        let (time, count) = totals(category);
        let ms = time as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * time as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if count > 0 { time as f64 / (count * 1000) as f64 } else { 0.0 };

        eprintln!("{}:", label);
        eprintln!("  Time:     {:.2}ms ({:.1}%)", ms, pct);
        eprintln!("  Calls:    {}", count);
        eprintln!("  Avg:      {:.2}µs/call\n", avg_us);
    }

    // Guards nest, so percentages add up past 100
    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    for global in GLOBAL_TIME.iter() {
        global.store(0, Ordering::Relaxed);
    }
    for global in GLOBAL_COUNT.iter() {
        global.store(0, Ordering::Relaxed);
    }
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
