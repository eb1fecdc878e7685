use crate::segment::Granularity;
use std::time::SystemTime;

/// Per-position classification of the typed sequence against the reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Typed unit equals the reference unit at this position.
    Match,
    /// Typed unit differs from the reference unit at this position.
    Mismatch,
    /// Position not yet typed.
    Pending,
    /// Typed past the end of the reference. The input guard makes this
    /// unreachable in practice; classified anyway so the comparator never
    /// has to reason about out-of-range positions.
    Overflow,
}

/// Result of comparing the typed sequence against the reference. Recomputed
/// from scratch on every read; nothing here is cached across updates.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub outcomes: Vec<Outcome>,
    pub correct_count: usize,
    /// Percentage of typed positions that match, rounded. 100 when nothing
    /// has been typed yet (avoids showing 0% before the first keystroke).
    pub accuracy: u8,
    /// Percentage of the reference covered by typed input, rounded and
    /// capped at 100. 0 when the reference is empty.
    pub progress: u8,
}

/// Timer state machine: idle until the first keystroke, running until the
/// typed length first reaches the reference length, then finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Tracks one transcription session: the quotation being copied, the user's
/// input so far, and the timing state. The reference is segmented once per
/// `load` and replaced wholesale; typed input is re-segmented on read so the
/// comparison can never desynchronize from the stored text.
#[derive(Debug)]
pub struct Transcription {
    reference_text: String,
    reference: Vec<String>,
    typed: String,
    granularity: Granularity,
    started_at: Option<SystemTime>,
    ended_at: Option<SystemTime>,
    completion_emitted: bool,
}

impl Transcription {
    pub fn new(reference_text: &str) -> Self {
        Self::with_granularity(reference_text, Granularity::Grapheme)
    }

    pub fn with_granularity(reference_text: &str, granularity: Granularity) -> Self {
        Self {
            reference_text: reference_text.to_owned(),
            reference: granularity.segment(reference_text),
            typed: String::new(),
            granularity,
            started_at: None,
            ended_at: None,
            completion_emitted: false,
        }
    }

    /// Replace the reference wholesale. Typed input and timers are destroyed
    /// with the old quotation; there is no partial mutation.
    pub fn load(&mut self, reference_text: &str) {
        self.reference_text = reference_text.to_owned();
        self.reference = self.granularity.segment(reference_text);
        self.reset();
    }

    /// Clear typed input and return to idle. The reference stays.
    pub fn reset(&mut self) {
        self.typed.clear();
        self.started_at = None;
        self.ended_at = None;
        self.completion_emitted = false;
    }

    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    pub fn reference_units(&self) -> &[String] {
        &self.reference
    }

    pub fn typed_text(&self) -> &str {
        &self.typed
    }

    pub fn typed_units(&self) -> Vec<String> {
        self.granularity.segment(&self.typed)
    }

    /// Admission control: accept `candidate` as the new typed text unless its
    /// unit count exceeds the reference's. Rejected updates leave all state
    /// untouched and return `false`.
    pub fn set_typed(&mut self, candidate: &str) -> bool {
        let units = self.granularity.segment(candidate);
        if units.len() > self.reference.len() {
            return false;
        }

        self.typed = candidate.to_owned();

        let m = units.len();
        if m > 0 && self.started_at.is_none() {
            self.started_at = Some(SystemTime::now());
        }
        // started_at is set above before this can fire, so ended_at can
        // never precede it
        if m == self.reference.len() && !self.reference.is_empty() && self.ended_at.is_none() {
            self.ended_at = Some(SystemTime::now());
        }

        true
    }

    /// Append one keystroke. Returns `false` when the guard rejects it.
    pub fn write(&mut self, c: char) -> bool {
        let mut candidate = self.typed.clone();
        candidate.push(c);
        self.set_typed(&candidate)
    }

    /// Remove the last typed unit (a whole grapheme cluster, not a code
    /// unit). No-op when nothing has been typed.
    pub fn backspace(&mut self) {
        let mut units = self.typed_units();
        if units.pop().is_some() {
            let candidate = units.concat();
            self.set_typed(&candidate);
        }
    }

    /// Pure comparison of (reference, typed), per position plus derived
    /// counters.
    pub fn comparison(&self) -> Comparison {
        let typed = self.typed_units();
        let n = self.reference.len();
        let m = typed.len();

        let mut outcomes = Vec::with_capacity(n.max(m));
        for i in 0..n.max(m) {
            let outcome = if i < m {
                if i >= n {
                    Outcome::Overflow
                } else if typed[i] == self.reference[i] {
                    Outcome::Match
                } else {
                    Outcome::Mismatch
                }
            } else {
                Outcome::Pending
            };
            outcomes.push(outcome);
        }

        let correct_count = outcomes.iter().filter(|o| **o == Outcome::Match).count();

        let accuracy = if m > 0 {
            ((correct_count as f64 / m as f64) * 100.0).round() as u8
        } else {
            100
        };
        let progress = if n > 0 {
            ((m as f64 / n as f64) * 100.0).min(100.0).round() as u8
        } else {
            0
        };

        Comparison {
            outcomes,
            correct_count,
            accuracy,
            progress,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.started_at, self.ended_at) {
            (None, _) => Phase::Idle,
            (Some(_), None) => Phase::Running,
            (Some(_), Some(_)) => Phase::Finished,
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Seconds between the first keystroke and either the finish instant or
    /// `now`, whichever applies. 0 while idle. Polled by the render loop so
    /// the displayed value tracks wall-clock time while running.
    pub fn elapsed_secs(&self, now: SystemTime) -> f64 {
        match self.started_at {
            None => 0.0,
            Some(start) => {
                let end = self.ended_at.unwrap_or(now);
                end.duration_since(start).unwrap_or_default().as_secs_f64()
            }
        }
    }

    /// Typed units per minute, rounded. 0 when no time has elapsed.
    pub fn speed(&self, now: SystemTime) -> u32 {
        let elapsed = self.elapsed_secs(now);
        if elapsed <= 0.0 {
            return 0;
        }
        let m = self.typed_units().len() as f64;
        (m / elapsed * 60.0).round() as u32
    }

    /// Completion edge: `true` exactly once per loaded quotation, on the
    /// first call after the running → finished transition. The caller fans
    /// this out to the celebration and the detached history submission.
    pub fn take_completion(&mut self) -> bool {
        if self.ended_at.is_some() && !self.completion_emitted {
            self.completion_emitted = true;
            true
        } else {
            false
        }
    }
}
