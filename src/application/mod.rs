// ============================================================
// Layer 2 — Application Layer (Use Cases)
// ============================================================
// One use case per pipeline, each a plain struct owning its
// config and exposing a single execute() entry point:
//
//   train_use_case.rs    — corpus ingestion → vocabulary build
//                          → windowing → training loop.
//                          Runs once, offline, and persists
//                          everything generation needs.
//
//   generate_use_case.rs — artifact loading → seed selection
//                          → greedy sampling → MIDI encoding.
//                          Runs once per request against the
//                          persisted artifacts, read-only.
//
// Both take a ProgressSink so whoever triggered the run (CLI,
// a server, a test) receives milestone strings without the
// pipeline knowing about the transport. Errors are fatal to
// the run that raised them; the caller may retry a whole run.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

/// Full training pipeline: ingest, build vocabulary, window, fit
pub mod train_use_case;

/// Full generation pipeline: load, seed, sample, encode
pub mod generate_use_case;
