/// Progress events emitted by the workflows.
#[derive(Debug, Clone)]
pub enum Progress {
    /// A pipeline stage began; `steps` is 0 when the stage has no meaningful
    /// step count.
    StageStart { name: &'static str, steps: u64 },
    /// One step of the current stage completed.
    StageAdvance,
    /// The current stage finished.
    StageFinish,
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional consumer; a reporter without a
/// callback swallows them.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn events_reach_the_callback_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(format!("{event:?}"));
        }));

        reporter.report(Progress::StageStart {
            name: "load",
            steps: 2,
        });
        reporter.report(Progress::StageAdvance);
        reporter.report(Progress::StageFinish);
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("load"));
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::StageAdvance);
    }
}
