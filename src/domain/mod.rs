// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// The core vocabulary of the system, shared by every other
// layer but depending on none of them:
//
//   token.rs  — The note/chord token alphabet.
//               A single pitched note serializes as its pitch
//               name ("C4", "F#3"); a chord serializes as its
//               pitch classes sorted ascending and joined with
//               dots ("0.4.7"). Both directions live here so
//               the corpus loader and the score writer agree
//               on one canonical string form.
//
//   error.rs  — The error taxonomy for the whole pipeline:
//               data errors (empty corpus, unknown token),
//               model errors (vocabulary mismatch, divergence)
//               and missing-artifact errors. Built with
//               thiserror so they convert into anyhow::Error
//               at the orchestration boundary.
//
//   traits.rs — The seams between the pipeline and the outside
//               world: where notes come from (NoteSource),
//               where the generated score goes (ScoreSink),
//               and how progress milestones leave the core
//               (ProgressSink).
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §10 (Traits)

/// Note and chord token canonicalization
pub mod token;

/// Pipeline error taxonomy
pub mod error;

/// Core traits (corpus source, score sink, progress observer)
pub mod traits;
