//! Minimal run-time metrics sink.
//!
//! Prometheus export is intentionally left out; instead we allow the host
//! process to register a raw callback that receives name/value pairs.

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use once_cell::sync::OnceCell;
use std::ffi::CString;
use std::os::raw::{c_char, c_ulonglong};
use std::sync::Arc;

/// Signature for external collectors.
pub type StatsCallback = unsafe extern "C" fn(name: *const c_char, value: c_ulonglong);

static CALLBACK: OnceCell<StatsCallback> = OnceCell::new();

/// Register a callback from C/other languages. Only the first registration
/// takes effect.
#[no_mangle]
pub unsafe extern "C" fn prefix_trie_register_stats_callback(cb: StatsCallback) {
    let _ = CALLBACK.set(cb);
}

/// Metric handle that forwards every update to the registered callback.
/// The name is pre-converted once; metric names contain no interior NULs.
struct Forward {
    name: CString,
}

impl Forward {
    fn new(key: &Key) -> Self {
        Forward {
            name: CString::new(key.name()).unwrap_or_default(),
        }
    }

    fn emit(&self, value: u64) {
        if let Some(cb) = CALLBACK.get() {
            unsafe { cb(self.name.as_ptr(), value as c_ulonglong) };
        }
    }
}

impl metrics::CounterFn for Forward {
    fn increment(&self, value: u64) {
        self.emit(value);
    }
    fn absolute(&self, value: u64) {
        self.emit(value);
    }
}

impl metrics::GaugeFn for Forward {
    fn set(&self, value: f64) {
        self.emit(value as u64);
    }
    fn increment(&self, value: f64) {
        self.emit(value as u64);
    }
    fn decrement(&self, value: f64) {
        self.emit(value as u64);
    }
}

impl metrics::HistogramFn for Forward {
    fn record(&self, value: f64) {
        self.emit(value as u64);
    }
}

/// Forwarding recorder. Uses the callback **if** it was registered.
struct CallbackRecorder;

impl Recorder for CallbackRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(Forward::new(key)))
    }
    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Arc::new(Forward::new(key)))
    }
    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(Forward::new(key)))
    }
}

/// Install exactly **once** – called from the trie constructor.
pub fn init() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = metrics::set_global_recorder(CallbackRecorder);
    });
}
