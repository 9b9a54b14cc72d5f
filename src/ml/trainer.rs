// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over the windows dataset using Burn's DataLoader
// and Adam.
//
// Checkpoint policy: best-so-far, never save-last. An epoch's
// mean loss is fed to the BestLossTracker and weights hit the
// disk only when the loss beats everything seen earlier in the
// run, so a long run that regresses near the end cannot
// overwrite a better earlier checkpoint.
//
// Divergence policy: a non-finite epoch loss aborts the run
// with TrainingDiverged. Checkpoints already written stay on
// disk and remain loadable.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::WindowBatcher, dataset::WindowDataset};
use crate::domain::error::ComposerError;
use crate::domain::traits::ProgressSink;
use crate::infra::checkpoint::{BestLossTracker, CheckpointManager};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{ComposerModel, ComposerModelConfig};

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

pub fn run_training(
    cfg: &TrainConfig,
    dataset: WindowDataset,
    ckpt_manager: &CheckpointManager,
    metrics: &MetricsLogger,
    progress: &dyn ProgressSink,
) -> Result<()> {
    let device = Default::default();

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg =
        ComposerModelConfig::new(cfg.vocab_size, cfg.hidden_size, cfg.dense_size, cfg.dropout);
    let mut model: ComposerModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: hidden={}, dense={}, vocab={}",
        cfg.hidden_size,
        cfg.dense_size,
        cfg.vocab_size
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Data loader ───────────────────────────────────────────────────────────
    // Windows are built in stream order; batching order is the one
    // place shuffling is allowed to happen.
    let batcher = WindowBatcher::<TrainBackend>::new(device.clone(), cfg.vocab_size);
    let loader = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut tracker = BestLossTracker::new();

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches = 0usize;

        for batch in loader.iter() {
            let (loss, _) = model.forward_loss(batch.inputs, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val;
            batches += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let epoch_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };

        if !epoch_loss.is_finite() {
            return Err(
                ComposerError::TrainingDiverged { epoch, loss: epoch_loss }.into(),
            );
        }

        let checkpointed = tracker.observe(epoch_loss);
        if checkpointed {
            ckpt_manager.save_model(&model, epoch, epoch_loss)?;
        }

        metrics.log(&EpochMetrics {
            epoch,
            loss: epoch_loss,
            best_loss: tracker.best().unwrap_or(epoch_loss),
            checkpointed,
        })?;

        tracing::info!(
            "Epoch {:>3}/{} | loss={:.4} | best={:.4}{}",
            epoch,
            cfg.epochs,
            epoch_loss,
            tracker.best().unwrap_or(epoch_loss),
            if checkpointed { " | checkpoint" } else { "" },
        );
        progress.notify(&format!("epoch {}/{}: loss {:.4}", epoch, cfg.epochs, epoch_loss));
    }

    tracing::info!("Training complete");
    Ok(())
}
