// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline's seams to the outside world, as traits so the
// application layer never depends on a concrete file format or
// transport.
//
//   - MidiCorpusLoader implements NoteSource
//   - MidiScoreWriter  implements ScoreSink
//   - Any closure      implements ProgressSink
//
// A future AbcLoader or MusicXmlWriter would slot in without
// the use cases changing, and tests can substitute in-memory
// fakes for all three.
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;

// ─── NoteSource ───────────────────────────────────────────────────────────────
/// Anything that can produce the flat, ordered token stream the
/// pipeline trains on.
///
/// Implementations:
///   - MidiCorpusLoader → decodes every file behind a glob pattern
///     and concatenates the per-file streams in discovery order
pub trait NoteSource {
    /// Load the full token stream. An empty Vec is a valid result;
    /// deciding whether that is fatal is the caller's business.
    fn load(&self) -> Result<Vec<String>>;
}

// ─── ScoreSink ────────────────────────────────────────────────────────────────
/// Anything that can turn a finished token sequence into a playable
/// artifact.
///
/// Implementations:
///   - MidiScoreWriter → writes a .mid file with a fixed time step
///     per token and returns the generated filename
pub trait ScoreSink {
    /// Encode and persist the token sequence. Returns the name of
    /// the file that was written.
    fn write(&self, tokens: &[String]) -> Result<String>;
}

// ─── ProgressSink ─────────────────────────────────────────────────────────────
/// Receives human-readable milestone strings as a run moves through
/// its stages. The core has no opinion on transport: the CLI prints
/// them, a server could relay them over a socket, tests collect them.
pub trait ProgressSink {
    fn notify(&self, milestone: &str);
}

/// Any Fn(&str) is a ProgressSink, so call sites can pass a closure.
impl<F: Fn(&str)> ProgressSink for F {
    fn notify(&self, milestone: &str) {
        self(milestone)
    }
}

/// Sink that drops every milestone. Useful for tests and for callers
/// that only want the final result.
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn notify(&self, _milestone: &str) {}
}
