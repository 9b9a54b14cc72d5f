// ============================================================
// Layer 4 — Window Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<Window>
// into tensors for one forward pass.
//
// How batching works here:
//   Input:  N windows, each window_len indices + 1 target
//   Output: inputs  [N, window_len, 1] float tensor
//           targets [N]                int tensor
//
// The normalization (index / vocab_size) happens here, at the
// last moment before tensors are built, so everything upstream
// keeps working with plain indices. Targets stay as class
// indices: Burn's CrossEntropyLoss consumes them directly,
// which is equivalent to one-hot targets under categorical
// cross-entropy.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::prelude::*;

use burn::data::dataloader::batcher::Batcher;

use crate::data::windows::{self, Window};

// ─── WindowBatch ──────────────────────────────────────────────────────────────
/// A batch of training windows ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// Normalized window inputs, shape [batch, window_len, 1]
    pub inputs: Tensor<B, 3>,
    /// Next-token class indices, shape [batch]
    pub targets: Tensor<B, 1, Int>,
}

// ─── WindowBatcher ────────────────────────────────────────────────────────────
/// Holds the target device and the vocabulary size used for the
/// input scaling. Generic over the backend so the same batcher
/// serves training and inference.
#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    device: B::Device,
    vocab_size: usize,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device, vocab_size: usize) -> Self {
        Self { device, vocab_size }
    }
}

impl<B: Backend> Batcher<Window, WindowBatch<B>> for WindowBatcher<B> {
    fn batch(&self, items: Vec<Window>) -> WindowBatch<B> {
        let batch_size = items.len();
        // All windows have the same length by construction
        let window_len = items[0].indices.len();

        // Flatten all normalized windows into one Vec<f32>,
        // then reshape to [batch, window_len, 1]
        let input_flat: Vec<f32> = items
            .iter()
            .flat_map(|w| windows::normalize(&w.indices, self.vocab_size))
            .collect();

        let targets_flat: Vec<i32> = items.iter().map(|w| w.target as i32).collect();

        let inputs = Tensor::<B, 1>::from_floats(input_flat.as_slice(), &self.device)
            .reshape([batch_size, window_len, 1]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets_flat.as_slice(), &self.device);

        WindowBatch { inputs, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let batcher = WindowBatcher::<TestBackend>::new(device, 4);

        let items = vec![
            Window { indices: vec![0, 1, 2], target: 3 },
            Window { indices: vec![1, 2, 3], target: 0 },
        ];
        let batch = batcher.batch(items);

        assert_eq!(batch.inputs.dims(), [2, 3, 1]);
        assert_eq!(batch.targets.dims(), [2]);
    }

    #[test]
    fn test_inputs_are_scaled_by_vocab_size() {
        let device = Default::default();
        let batcher = WindowBatcher::<TestBackend>::new(device, 4);

        let batch = batcher.batch(vec![Window { indices: vec![0, 2], target: 1 }]);
        let values: Vec<f32> = batch.inputs.into_data().to_vec().unwrap();
        assert_eq!(values, vec![0.0, 0.5]);
    }
}
