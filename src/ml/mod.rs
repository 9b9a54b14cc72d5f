// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly, except the two
// data adapters (dataset/batcher) that exist to feed it.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - The model architecture is clearly separated from
//     data preparation and application logic
//
// What's in this layer:
//
//   model.rs     — The recurrent next-note architecture:
//                  • Two stacked LSTM layers over the
//                    [batch, window, 1] normalized input
//                  • Last-timestep readout
//                  • Dropout regularization
//                  • Dense layer with relu
//                  • Linear projection to vocabulary logits
//                  Softmax at prediction time, cross-entropy
//                  at training time.
//
//   trainer.rs   — The training loop: forward pass, loss,
//                  backward pass, Adam step, best-so-far
//                  checkpointing and divergence detection
//
//   generator.rs — The composer: loads the best checkpoint,
//                  then autoregressively extends a seed window
//                  with greedy (argmax) decoding
//
// Backend: NdArray (CPU) wrapped in Autodiff for training.
// The whole pipeline is single-threaded and synchronous; any
// parallelism lives inside the tensor ops.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Hochreiter & Schmidhuber (1997) LSTM

/// Recurrent next-note model architecture
pub mod model;

/// Full training loop with checkpointing
pub mod trainer;

/// Greedy autoregressive note generation
pub mod generator;
