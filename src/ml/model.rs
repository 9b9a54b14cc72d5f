use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ComposerModelConfig {
    pub vocab_size: usize,
    pub hidden_size: usize,
    pub dense_size: usize,
    pub dropout: f64,
}

impl ComposerModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ComposerModel<B> {
        // The input feature dimension is 1: each timestep is a single
        // vocabulary index scaled into [0, 1).
        let lstm1 = LstmConfig::new(1, self.hidden_size, true).init(device);
        let lstm2 = LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        let dense = LinearConfig::new(self.hidden_size, self.dense_size).init(device);
        let output = LinearConfig::new(self.dense_size, self.vocab_size).init(device);
        ComposerModel { lstm1, lstm2, dropout, dense, output }
    }
}

/// The next-note model: stacked LSTMs over the normalized window,
/// read out at the final timestep, projected onto the vocabulary.
#[derive(Module, Debug)]
pub struct ComposerModel<B: Backend> {
    pub lstm1: Lstm<B>,
    pub lstm2: Lstm<B>,
    pub dropout: Dropout,
    pub dense: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> ComposerModel<B> {
    /// inputs: [batch, window_len, 1] → logits: [batch, vocab_size]
    ///
    /// One forward pass, no internal state kept between calls: the
    /// LSTM state starts fresh for every window, which is what makes
    /// prediction deterministic for a given window and parameters.
    pub fn forward(&self, inputs: Tensor<B, 3>) -> Tensor<B, 2> {
        let (seq, _) = self.lstm1.forward(inputs, None);
        let (seq, _) = self.lstm2.forward(seq, None);

        // Only the final timestep carries the full window context
        let [batch, window_len, hidden] = seq.dims();
        let last = seq
            .slice([0..batch, window_len - 1..window_len, 0..hidden])
            .reshape([batch, hidden]);

        let x = self.dropout.forward(last);
        let x = burn::tensor::activation::relu(self.dense.forward(x));
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }

    /// Forward pass plus categorical cross-entropy against the
    /// next-token class indices.
    pub fn forward_loss(
        &self,
        inputs: Tensor<B, 3>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(inputs);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_forward_shape_is_batch_by_vocab() {
        let device = Default::default();
        let model: ComposerModel<TestBackend> =
            ComposerModelConfig::new(5, 8, 8, 0.3).init(&device);

        let inputs = Tensor::<TestBackend, 3>::zeros([2, 10, 1], &device);
        let logits = model.forward(inputs);
        assert_eq!(logits.dims(), [2, 5]);
    }

    #[test]
    fn test_softmax_over_logits_is_a_distribution() {
        let device = Default::default();
        let model: ComposerModel<TestBackend> =
            ComposerModelConfig::new(4, 8, 8, 0.3).init(&device);

        let inputs = Tensor::<TestBackend, 3>::zeros([1, 6, 1], &device);
        let probs: Vec<f32> = burn::tensor::activation::softmax(model.forward(inputs), 1)
            .into_data()
            .to_vec()
            .unwrap();

        assert_eq!(probs.len(), 4);
        assert!(probs.iter().all(|p| *p >= 0.0));
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }
}
