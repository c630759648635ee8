/// Crawl phase definitions for tracking per-company progress
///
/// This module defines the phases a single company crawl passes through.
use crate::CrawlerError;
use std::fmt;

/// Represents the current phase of one company crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Turning the website string into a reachable URL
    Resolving,

    /// Fetching and extracting the resolved seed page
    FetchingSeed,

    /// Fetching and extracting the pages the seed links to
    FetchingSubpages,

    /// Combining page text and social links into the result
    Aggregating,

    // ===== Terminal Phases =====
    /// Result produced from crawled pages
    Done,

    /// The website never resolved; the result holds sentinels
    Aborted,
}

impl CrawlPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if `next` directly follows this phase
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Resolving, Self::FetchingSeed)
                | (Self::Resolving, Self::Aborted)
                | (Self::FetchingSeed, Self::FetchingSubpages)
                | (Self::FetchingSubpages, Self::Aggregating)
                | (Self::Aggregating, Self::Done)
        )
    }

    /// Converts the phase to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Resolving => "resolving",
            Self::FetchingSeed => "fetching_seed",
            Self::FetchingSubpages => "fetching_subpages",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    /// Parses a phase from a database string representation
    ///
    /// Returns None if the string doesn't match any known phase.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "resolving" => Some(Self::Resolving),
            "fetching_seed" => Some(Self::FetchingSeed),
            "fetching_subpages" => Some(Self::FetchingSubpages),
            "aggregating" => Some(Self::Aggregating),
            "done" => Some(Self::Done),
            "aborted" => Some(Self::Aborted),
            _ => None,
        }
    }

    /// Returns all phases in pipeline order
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Resolving,
            Self::FetchingSeed,
            Self::FetchingSubpages,
            Self::Aggregating,
            Self::Done,
            Self::Aborted,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Current phase of one crawl, advanced only along legal transitions
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    phase: CrawlPhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: CrawlPhase::Resolving,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, rejecting anything that skips or reverses a phase
    pub fn advance(&mut self, next: CrawlPhase) -> Result<(), CrawlerError> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
