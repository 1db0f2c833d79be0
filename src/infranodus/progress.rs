//! Progress reporting for multi-stage workflows

/// Receiver of `(percentage, message)` updates
///
/// Reporting is fire-and-forget: implementations must not block and a failed
/// delivery never affects the workflow.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percentage: u8, message: &str);
}

/// Optional sink; a workflow run without a caller token reports nowhere
#[derive(Clone, Copy)]
pub struct Reporter<'a> {
    sink: Option<&'a dyn ProgressSink>,
}

impl<'a> Reporter<'a> {
    pub fn new(sink: Option<&'a dyn ProgressSink>) -> Self {
        Self { sink }
    }

    pub fn report(&self, percentage: u8, message: &str) {
        tracing::debug!("progress {}%: {}", percentage, message);
        if let Some(sink) = self.sink {
            sink.report(percentage.min(100), message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<u8>>);

    impl ProgressSink for Recorder {
        fn report(&self, percentage: u8, _message: &str) {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(percentage);
            }
        }
    }

    #[test]
    fn test_reporter_forwards_and_clamps() {
        let recorder = Recorder::default();
        let reporter = Reporter::new(Some(&recorder));
        reporter.report(10, "start");
        reporter.report(150, "overflow");
        assert_eq!(*recorder.0.lock().unwrap(), vec![10, 100]);
    }

    #[test]
    fn test_reporter_without_sink() {
        Reporter::new(None).report(50, "nobody listens");
    }
}
