use std::cell::RefCell;
use std::rc::Rc;

use recall_core::{PassInfo, Root};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassStats {
    pub passes: u64,
    pub hooks_called: usize,
    pub slots: usize,
    pub keyed_slots: usize,
    pub last_pass_ms: f32,
    pub smooth_pass_ms: f32,
}

impl PassStats {
    pub fn record(&mut self, info: &PassInfo) {
        self.passes += 1;
        self.hooks_called = info.hooks_called;
        self.slots = info.slots;
        self.keyed_slots = info.keyed_slots;

        let ms = info.duration.as_secs_f32() * 1000.0;
        self.last_pass_ms = ms;
        // simple EMA
        let a = 0.2;
        self.smooth_pass_ms = if self.passes == 1 {
            ms
        } else {
            (1.0 - a) * self.smooth_pass_ms + a * ms
        };
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("pass: {}", self.passes),
            format!("slots: {}", self.slots),
        ];
        if self.keyed_slots > 0 {
            parts.push(format!("keyed: {}", self.keyed_slots));
        }
        parts.push(format!("pass time: {:.2} ms", self.smooth_pass_ms));
        parts.join("  |  ")
    }
}

struct MonitorState {
    stats: PassStats,
    log_passes: bool,
}

/// Watches the passes of one root.
#[derive(Clone)]
pub struct PassMonitor {
    state: Rc<RefCell<MonitorState>>,
}

impl PassMonitor {
    pub fn attach(root: &Root) -> Self {
        let state = Rc::new(RefCell::new(MonitorState {
            stats: PassStats::default(),
            log_passes: false,
        }));
        root.on_pass({
            let state = state.clone();
            move |info| {
                let mut state = state.borrow_mut();
                state.stats.record(info);
                if state.log_passes {
                    log::info!("{}", state.stats.summary());
                }
            }
        });
        Self { state }
    }

    /// Log a summary line after every pass.
    pub fn toggle_logging(&self) {
        let mut state = self.state.borrow_mut();
        state.log_passes = !state.log_passes;
    }

    pub fn stats(&self) -> PassStats {
        self.state.borrow().stats.clone()
    }

    pub fn summary(&self) -> String {
        self.state.borrow().stats.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::Duration;

    fn info(pass: u64, ms: u64) -> PassInfo {
        PassInfo {
            pass,
            hooks_called: 2,
            slots: 2,
            keyed_slots: 0,
            duration: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_smoothed_pass_time() {
        let mut stats = PassStats::default();
        stats.record(&info(1, 10));
        assert!((stats.smooth_pass_ms - 10.0).abs() < 0.001);

        stats.record(&info(2, 20));
        assert!((stats.last_pass_ms - 20.0).abs() < 0.001);
        assert!((stats.smooth_pass_ms - 12.0).abs() < 0.001);
        assert_eq!(stats.passes, 2);
    }

    #[test]
    fn test_summary() {
        let mut stats = PassStats::default();
        stats.record(&info(1, 0));
        assert_eq!(stats.summary(), "pass: 1  |  slots: 2  |  pass time: 0.00 ms");
    }

    #[test]
    fn test_attached_monitor_counts_passes() {
        let root = Root::new().with_render(|hooks| {
            let _ = hooks.use_state(0u8);
            let _ = hooks.use_state_with_key("k", 1u8);
            Ok(())
        });
        let monitor = PassMonitor::attach(&root);
        monitor.toggle_logging();

        root.render().unwrap();
        root.render().unwrap();

        let stats = monitor.stats();
        assert_eq!(stats.passes, 2);
        assert_eq!(stats.hooks_called, 1);
        assert_eq!(stats.slots, 1);
        assert_eq!(stats.keyed_slots, 1);
        assert!(monitor.summary().contains("keyed: 1"));
    }
}
