// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns used by training and
// generation alike:
//
//   checkpoint.rs — Model weight checkpoints. Saves weights
//                   through Burn's CompactRecorder under
//                   loss-tagged filenames, keeps a best.json
//                   pointer to the best checkpoint of the run,
//                   and persists/restores the TrainConfig so
//                   generation can rebuild the architecture.
//                   Also home of the best-so-far policy.
//
//   store.rs      — The note stream and vocabulary produced by
//                   ingestion, as JSON. Written the moment they
//                   exist so a crash mid-training loses neither,
//                   read-only for every generation run.
//
//   metrics.rs    — Per-epoch training metrics appended to a
//                   CSV file for later analysis and plotting.
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but
//   don't belong to any one of them. Keeping them here
//   prevents duplication and makes the storage format easy
//   to swap without touching the pipeline.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Records and Checkpointing)

/// Model checkpoint saving, loading and best-so-far selection
pub mod checkpoint;

/// Note stream + vocabulary persistence
pub mod store;

/// Training metrics CSV logger
pub mod metrics;
