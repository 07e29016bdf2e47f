//! Cursor over the candidates of the latest detection pass.

use log::debug;

use crate::pipeline::Candidate;

/// Raised when a candidate is requested but none are loaded.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no candidate to show")]
pub struct NoCandidateError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    First,
    Last,
}

/// Outcome of a navigation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved to this index.
    Moved(usize),
    /// Already at an end of the list; the cursor did not move.
    Boundary(Boundary),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserState {
    Empty,
    Positioned(usize),
}

/// Ordered candidates plus a cursor with `0 <= cursor < len` while non-empty.
///
/// There is no wraparound.
#[derive(Clone, Debug, Default)]
pub struct CandidateBrowser {
    candidates: Vec<Candidate>,
    cursor: usize,
}

impl CandidateBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list wholesale and move to the first candidate.
    pub fn load(&mut self, candidates: Vec<Candidate>) -> BrowserState {
        self.candidates = candidates;
        self.cursor = 0;
        debug!("browser loaded {} candidates", self.candidates.len());
        self.state()
    }

    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    pub fn state(&self) -> BrowserState {
        if self.candidates.is_empty() {
            BrowserState::Empty
        } else {
            BrowserState::Positioned(self.cursor)
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state() {
            BrowserState::Empty => None,
            BrowserState::Positioned(c) => Some(c),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn current(&self) -> Result<&Candidate, NoCandidateError> {
        self.candidates.get(self.cursor).ok_or(NoCandidateError)
    }

    pub fn next(&mut self) -> Result<Navigation, NoCandidateError> {
        if self.candidates.is_empty() {
            return Err(NoCandidateError);
        }
        if self.cursor + 1 < self.candidates.len() {
            self.cursor += 1;
            Ok(Navigation::Moved(self.cursor))
        } else {
            debug!("already at last candidate");
            Ok(Navigation::Boundary(Boundary::Last))
        }
    }

    pub fn previous(&mut self) -> Result<Navigation, NoCandidateError> {
        if self.candidates.is_empty() {
            return Err(NoCandidateError);
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            Ok(Navigation::Moved(self.cursor))
        } else {
            debug!("already at first candidate");
            Ok(Navigation::Boundary(Boundary::First))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringscore_core::{GrayImage, Region};

    fn candidates(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate {
                region: Region::new(i * 10, 0, 5, 5),
                sub_image: GrayImage::new(5, 5),
                distance: i as f64,
                score: i as u32,
            })
            .collect()
    }

    #[test]
    fn next_walks_to_last_then_reports_boundary() {
        let mut b = CandidateBrowser::new();
        assert_eq!(b.load(candidates(4)), BrowserState::Positioned(0));
        for expected in 1..4 {
            assert_eq!(b.next(), Ok(Navigation::Moved(expected)));
        }
        assert_eq!(b.next(), Ok(Navigation::Boundary(Boundary::Last)));
        assert_eq!(b.cursor(), Some(3));
        assert_eq!(b.current().expect("current").score, 3);
    }

    #[test]
    fn previous_walks_back_then_reports_boundary() {
        let mut b = CandidateBrowser::new();
        b.load(candidates(3));
        assert_eq!(b.previous(), Ok(Navigation::Boundary(Boundary::First)));
        b.next().expect("next");
        b.next().expect("next");
        assert_eq!(b.previous(), Ok(Navigation::Moved(1)));
        assert_eq!(b.previous(), Ok(Navigation::Moved(0)));
        assert_eq!(b.previous(), Ok(Navigation::Boundary(Boundary::First)));
        assert_eq!(b.cursor(), Some(0));
    }

    #[test]
    fn single_candidate_is_both_ends() {
        let mut b = CandidateBrowser::new();
        b.load(candidates(1));
        assert_eq!(b.next(), Ok(Navigation::Boundary(Boundary::Last)));
        assert_eq!(b.previous(), Ok(Navigation::Boundary(Boundary::First)));
    }

    #[test]
    fn empty_browser_has_no_current() {
        let mut b = CandidateBrowser::new();
        assert_eq!(b.state(), BrowserState::Empty);
        assert_eq!(b.current(), Err(NoCandidateError));
        assert_eq!(b.next(), Err(NoCandidateError));
        assert_eq!(b.previous(), Err(NoCandidateError));
        assert_eq!(b.cursor(), None);
    }

    #[test]
    fn reload_resets_cursor() {
        let mut b = CandidateBrowser::new();
        b.load(candidates(5));
        b.next().expect("next");
        b.next().expect("next");
        assert_eq!(b.load(candidates(2)), BrowserState::Positioned(0));
        assert_eq!(b.load(Vec::new()), BrowserState::Empty);
        assert!(b.current().is_err());
    }
}
