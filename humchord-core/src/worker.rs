//! AnalysisHandle: control-thread interface to a background analysis thread.
//!
//! Key detection and harmonization are pure, so they can run off the control
//! thread. Jobs go over a crossbeam channel; results come back on an MPSC
//! channel and are collected with `drain_feedback()`.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver as CrossbeamReceiver, Sender as CrossbeamSender};

use crate::analysis::{analyze, Analysis, HarmonySettings};
use crate::types::Note;

pub enum AnalysisCmd {
    Analyze {
        id: u64,
        notes: Vec<Note>,
        settings: HarmonySettings,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisFeedback {
    Complete { id: u64, analysis: Analysis },
}

impl AnalysisFeedback {
    pub fn id(&self) -> u64 {
        match self {
            AnalysisFeedback::Complete { id, .. } => *id,
        }
    }
}

struct AnalysisThread {
    cmd_rx: CrossbeamReceiver<AnalysisCmd>,
    feedback_tx: Sender<AnalysisFeedback>,
}

impl AnalysisThread {
    fn run(self) {
        loop {
            match self.cmd_rx.recv() {
                Ok(AnalysisCmd::Analyze {
                    id,
                    notes,
                    settings,
                }) => {
                    let analysis = analyze(notes, &settings);
                    if self
                        .feedback_tx
                        .send(AnalysisFeedback::Complete { id, analysis })
                        .is_err()
                    {
                        break; // Handle dropped
                    }
                }
                Ok(AnalysisCmd::Shutdown) | Err(_) => break,
            }
        }
        log::debug!(target: "analysis", "analysis thread exiting");
    }
}

pub struct AnalysisHandle {
    cmd_tx: CrossbeamSender<AnalysisCmd>,
    feedback_rx: Receiver<AnalysisFeedback>,
    /// Results received while waiting for a different job
    backlog: Vec<AnalysisFeedback>,
    next_id: u64,
    join_handle: Option<JoinHandle<()>>,
}

impl AnalysisHandle {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (feedback_tx, feedback_rx) = mpsc::channel();

        let join_handle = thread::spawn(move || {
            AnalysisThread {
                cmd_rx,
                feedback_tx,
            }
            .run();
        });

        Self {
            cmd_tx,
            feedback_rx,
            backlog: Vec::new(),
            next_id: 0,
            join_handle: Some(join_handle),
        }
    }

    /// Queue a melody for analysis. Returns the job id echoed in the feedback.
    pub fn submit(&mut self, notes: Vec<Note>, settings: HarmonySettings) -> Result<u64, String> {
        let id = self.next_id;
        self.next_id += 1;
        self.cmd_tx
            .send(AnalysisCmd::Analyze {
                id,
                notes,
                settings,
            })
            .map_err(|_| "Analysis thread disconnected".to_string())?;
        Ok(id)
    }

    /// Finished results, without blocking.
    pub fn drain_feedback(&mut self) -> Vec<AnalysisFeedback> {
        let mut out = std::mem::take(&mut self.backlog);
        while let Ok(msg) = self.feedback_rx.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Submit and wait up to `timeout` in total for that job's result.
    pub fn analyze_blocking(
        &mut self,
        notes: Vec<Note>,
        settings: HarmonySettings,
        timeout: Duration,
    ) -> Result<Analysis, String> {
        let id = self.submit(notes, settings)?;
        let deadline = Instant::now() + timeout;
        loop {
            let wait = deadline.saturating_duration_since(Instant::now());
            match self.feedback_rx.recv_timeout(wait) {
                Ok(AnalysisFeedback::Complete { id: done, analysis }) if done == id => {
                    return Ok(analysis)
                }
                Ok(other) => self.backlog.push(other),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(format!("analysis {} timed out after {:?}", id, timeout))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err("Analysis thread disconnected".to_string())
                }
            }
        }
    }
}

impl Default for AnalysisHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnalysisHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(AnalysisCmd::Shutdown);
        if let Some(handle) = self.join_handle.take() {
            if handle.join().is_err() {
                log::warn!(target: "analysis", "analysis thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Key, PitchClass};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn scale() -> Vec<Note> {
        use PitchClass::*;
        [G, A, B, C, D, E, Fs]
            .iter()
            .map(|&pc| Note::new(pc, 1.0))
            .collect()
    }

    #[test]
    fn blocking_analysis_returns_result() {
        let mut handle = AnalysisHandle::new();
        let analysis = handle
            .analyze_blocking(scale(), HarmonySettings::default(), TIMEOUT)
            .unwrap();
        assert_eq!(analysis.key, Some(Key::major(PitchClass::G)));
        assert!(!analysis.progression().is_empty());
    }

    #[test]
    fn submitted_jobs_complete_in_order() {
        let mut handle = AnalysisHandle::new();
        let first = handle.submit(scale(), HarmonySettings::default()).unwrap();
        let second = handle.submit(Vec::new(), HarmonySettings::default()).unwrap();
        // A blocking call after them drains both into the backlog
        handle
            .analyze_blocking(Vec::new(), HarmonySettings::default(), TIMEOUT)
            .unwrap();

        let ids: Vec<u64> = handle.drain_feedback().iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn timeout_covers_whole_wait() {
        use crate::types::PitchClass::*;
        let long: Vec<Note> = [C, E, G, F, A, D]
            .iter()
            .cycle()
            .take(200_000)
            .map(|&pc| Note::new(pc, 0.1))
            .collect();

        let mut handle = AnalysisHandle::new();
        for _ in 0..8 {
            handle.submit(long.clone(), HarmonySettings::default()).unwrap();
        }
        let started = Instant::now();
        let err = handle
            .analyze_blocking(long, HarmonySettings::default(), Duration::from_millis(1))
            .unwrap_err();
        assert!(err.contains("timed out"), "{}", err);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn drop_joins_thread() {
        let handle = AnalysisHandle::new();
        drop(handle);
    }
}
