// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full fine-tuning loop using Burn's DataLoader and Adam.
//
// Key Burn insight:
//   - Training uses TrainBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on ValidBackend (Wgpu)
//   - Validation batcher must also use ValidBackend
//   - argmax(1) returns [batch,1] so we flatten before .equal()
//
// Checkpoint policy: a checkpoint is written only when the epoch's
// validation loss improves on the best seen so far, so the saved
// pointer always names the best-generalising weights.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ReviewBatcher, dataset::ReviewDataset};
use crate::domain::aspect::{self, Aspect};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::infra::pretrained::PretrainedBundle;
use crate::ml::model::{SentimentModel, SentimentModelConfig};

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
type ValidBackend = burn::backend::Wgpu;

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: ReviewDataset,
    val_dataset:   ReviewDataset,
    ckpt_manager:  CheckpointManager,
    pretrained:    &PretrainedBundle,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(cfg, train_dataset, val_dataset, ckpt_manager, pretrained, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    train_dataset: ReviewDataset,
    val_dataset:   ReviewDataset,
    ckpt_manager:  CheckpointManager,
    pretrained:    &PretrainedBundle,
    device:        burn::backend::wgpu::WgpuDevice,
) -> Result<()> {

    // ── Build model around the pretrained encoder ─────────────────────────────
    // Architecture comes from the bundle's config file; the trunk weights
    // come from its checkpoint. Only the seven heads start from scratch.
    let encoder_cfg = pretrained.load_config()?;
    if cfg.max_seq_len > encoder_cfg.max_seq_len {
        anyhow::bail!(
            "max_seq_len {} exceeds the pretrained encoder's position table ({})",
            cfg.max_seq_len,
            encoder_cfg.max_seq_len,
        );
    }

    let model_cfg = SentimentModelConfig::new(encoder_cfg)
        .with_head_dropout(cfg.head_dropout);
    let mut model: SentimentModel<TrainBackend> = model_cfg.init(&device);
    model.encoder = pretrained.load_encoder(model.encoder, &device)?;
    tracing::info!(
        "Model ready: {} encoder layers, d_model={}, {} heads",
        model_cfg.encoder.num_layers,
        model_cfg.encoder.d_model,
        model.heads.len(),
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = ReviewBatcher::<TrainBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = ReviewBatcher::<ValidBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let logger = MetricsLogger::new(&cfg.checkpoint_dir)?;
    let mut best_val_loss = f64::INFINITY;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(
                batch.token_ids,
                batch.segment_ids,
                batch.attention_mask,
                batch.labels,
            );

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → SentimentModel<ValidBackend>
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        let mut val_loss_sum  = 0.0f64;
        let mut val_batches   = 0usize;
        let mut correct       = [0usize; aspect::COUNT];
        let mut total_samples = 0usize;

        for batch in val_loader.iter() {
            let [batch_size, _] = batch.labels.dims();

            let (loss, logits) = model_valid.forward_loss(
                batch.token_ids,
                batch.segment_ids,
                batch.attention_mask,
                batch.labels.clone(),
            );

            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;
            total_samples += batch_size;

            for (i, head_logits) in logits.into_iter().enumerate() {
                // argmax(1) returns shape [batch, 1] — flatten to [batch]
                // before comparing with the label column
                let pred = head_logits.argmax(1).flatten::<1>(0, 1);
                let targets = batch.labels.clone()
                    .slice([0..batch_size, i..i + 1])
                    .reshape([batch_size]);

                let hits: i64 = pred
                    .equal(targets)
                    .int().sum().into_scalar().elem::<i64>();
                correct[i] += hits as usize;
            }
        }

        let avg_val_loss = if val_batches > 0 { val_loss_sum / val_batches as f64 } else { f64::NAN };
        let aspect_acc: Vec<f64> = correct
            .iter()
            .map(|&c| if total_samples > 0 { c as f64 / total_samples as f64 } else { 0.0 })
            .collect();
        let mean_acc = aspect_acc.iter().sum::<f64>() / aspect::COUNT as f64;
        let overall_acc = aspect_acc[aspect::COUNT - 1];

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | mean_acc={:.1}% | {}={:.1}%",
            epoch, cfg.epochs, avg_train_loss, avg_val_loss,
            mean_acc * 100.0,
            Aspect::Overall.key(),
            overall_acc * 100.0,
        );

        let metrics = EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, aspect_acc);
        logger.log(&metrics)?;

        // ── Checkpoint only on validation improvement ─────────────────────────
        if metrics.is_improvement(best_val_loss) {
            best_val_loss = metrics.val_loss;
            ckpt_manager.save_model(&model, epoch)?;
            tracing::info!("Validation loss improved — checkpoint saved for epoch {epoch}");
        } else {
            tracing::info!(
                "No improvement at epoch {epoch} (best val_loss {best_val_loss:.4}), checkpoint skipped"
            );
        }
    }

    tracing::info!("Training complete!");
    Ok(())
}
