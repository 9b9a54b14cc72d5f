// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw .mid files to tensor batches, and back
// out again for the generated score.
//
// The training direction flows in this order:
//
//   .mid files (glob)
//       │
//       ▼
//   MidiCorpusLoader  → decodes note/chord events into tokens
//       │
//       ▼
//   Vocabulary        → sorted distinct tokens ↔ dense indices
//       │
//       ▼
//   make_windows      → stride-1 sliding windows + next-token targets
//       │
//       ▼
//   WindowDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   WindowBatcher     → stacks windows into [batch, window, 1] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// The generation direction is the single step at the end:
//
//   token sequence → MidiScoreWriter → random-named .mid file
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Decodes .mid corpus files into a flat token stream
pub mod loader;

/// Sorted token vocabulary with bidirectional index mapping
pub mod vocab;

/// Sliding windows over the token stream + input normalization
pub mod windows;

/// Implements Burn's Dataset trait for training windows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Encodes a generated token sequence back into a .mid file
pub mod encoder;
