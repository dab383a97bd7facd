//! In-process BERT sequence classifier for emotions.
//!
//! Loads a `BertForSequenceClassification` checkpoint (encoder, pooler and a
//! linear head) with candle and runs it on the CPU. The model is loaded once
//! at start-up and shared read-only between requests; inference runs on the
//! blocking pool so it never stalls the async workers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow};
use async_trait::async_trait;
use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::Deserialize;
use tokenizers::{
    Tokenizer,
    models::wordpiece::WordPiece,
    normalizers::{NormalizerWrapper, bert::BertNormalizer},
    pre_tokenizers::{PreTokenizerWrapper, bert::BertPreTokenizer},
    processors::{PostProcessorWrapper, bert::BertProcessing},
};
use tracing::info;

use crate::{classifier::EmotionBackend, error::BackendError, mood::NATIVE_LABELS};

/// Where the checkpoint files come from
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// Hugging Face model id, downloaded into the local hub cache
    Hub(String),
    /// Directory holding `config.json`, the weights and the vocabulary
    Local(PathBuf),
}

/// Only the classification-head fields of `config.json`
#[derive(Debug, Deserialize)]
struct HeadConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

struct CheckpointFiles {
    config: PathBuf,
    weights: PathBuf,
    tokenizer: Option<PathBuf>,
    vocab: Option<PathBuf>,
}

struct EmotionModel {
    bert: BertModel,
    pooler: Linear,
    head: Linear,
    tokenizer: Tokenizer,
    device: Device,
    max_len: usize,
}

pub struct BertEmotionBackend {
    model: Arc<EmotionModel>,
}

impl BertEmotionBackend {
    /// Blocking: downloads (if needed) and maps the weights into memory.
    pub fn load(source: &ModelSource) -> Result<Self> {
        let device = Device::Cpu;
        let files = resolve_files(source)?;

        let raw_config = std::fs::read(&files.config)
            .with_context(|| format!("reading {}", files.config.display()))?;
        let config: BertConfig = serde_json::from_slice(&raw_config)?;
        let head_config: HeadConfig = serde_json::from_slice(&raw_config)?;
        let num_labels = if head_config.id2label.is_empty() {
            NATIVE_LABELS.len()
        } else {
            head_config.id2label.len()
        };

        let vb = if files.weights.extension().is_some_and(|ext| ext == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&files.weights, DType::F32, &device)?
        };

        let bert = BertModel::load(vb.pp("bert"), &config)?;
        let pooler = candle_nn::linear(
            config.hidden_size,
            config.hidden_size,
            vb.pp("bert.pooler.dense"),
        )?;
        let head = candle_nn::linear(config.hidden_size, num_labels, vb.pp("classifier"))?;
        let tokenizer = load_tokenizer(&files)?;

        info!(
            weights = %files.weights.display(),
            num_labels,
            "Emotion classifier loaded"
        );

        Ok(Self {
            model: Arc::new(EmotionModel {
                bert,
                pooler,
                head,
                tokenizer,
                device,
                max_len: config.max_position_embeddings,
            }),
        })
    }
}

#[async_trait]
impl EmotionBackend for BertEmotionBackend {
    async fn scores(&self, text: &str) -> Result<Vec<f32>, BackendError> {
        let model = Arc::clone(&self.model);
        let input = text.to_owned();

        tokio::task::spawn_blocking(move || model.probabilities(&input))
            .await
            .map_err(|e| BackendError::Classification(format!("inference task failed: {e}")))?
            .map_err(|e| BackendError::Classification(e.to_string()))
    }
}

impl EmotionModel {
    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenizer encode error: {e}"))?;

        let mut ids = encoding.get_ids().to_vec();
        ids.truncate(self.max_len);

        let input_ids = Tensor::new(ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = input_ids.ones_like()?;

        let hidden = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        let logits = self.head.forward(&pooled)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;

        Ok(probs.squeeze(0)?.to_vec1::<f32>()?)
    }
}

fn resolve_files(source: &ModelSource) -> Result<CheckpointFiles> {
    match source {
        ModelSource::Local(dir) => {
            let existing = |name: &str| Some(dir.join(name)).filter(|p| p.exists());
            let weights = existing("model.safetensors")
                .or_else(|| existing("pytorch_model.bin"))
                .ok_or_else(|| anyhow!("no model weights found in {}", dir.display()))?;
            Ok(CheckpointFiles {
                config: dir.join("config.json"),
                weights,
                tokenizer: existing("tokenizer.json"),
                vocab: existing("vocab.txt"),
            })
        }
        ModelSource::Hub(model_id) => {
            info!(%model_id, "Fetching emotion classifier from the hub");
            let repo = hf_hub::api::sync::Api::new()?.model(model_id.clone());
            let weights = repo
                .get("model.safetensors")
                .or_else(|_| repo.get("pytorch_model.bin"))
                .with_context(|| format!("no model weights published for {model_id}"))?;
            Ok(CheckpointFiles {
                config: repo.get("config.json")?,
                weights,
                tokenizer: repo.get("tokenizer.json").ok(),
                vocab: repo.get("vocab.txt").ok(),
            })
        }
    }
}

fn load_tokenizer(files: &CheckpointFiles) -> Result<Tokenizer> {
    if let Some(path) = &files.tokenizer {
        return Tokenizer::from_file(path)
            .map_err(|e| anyhow!("Tokenizer load failed ({}): {e}", path.display()));
    }
    let vocab = files
        .vocab
        .as_deref()
        .ok_or_else(|| anyhow!("checkpoint has neither tokenizer.json nor vocab.txt"))?;
    wordpiece_tokenizer(vocab)
}

/// Uncased BERT WordPiece pipeline built from a bare `vocab.txt`.
fn wordpiece_tokenizer(vocab: &Path) -> Result<Tokenizer> {
    let vocab_path = vocab
        .to_str()
        .ok_or_else(|| anyhow!("Invalid vocab path"))?;
    let wordpiece = WordPiece::from_file(vocab_path)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| anyhow!("WordPiece build error: {e}"))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer.with_normalizer(Some(NormalizerWrapper::BertNormalizer(BertNormalizer::new(
        true, true, None, true,
    ))));
    tokenizer.with_pre_tokenizer(Some(PreTokenizerWrapper::BertPreTokenizer(
        BertPreTokenizer,
    )));

    let special = |token: &str| {
        tokenizer
            .token_to_id(token)
            .map(|id| (token.to_string(), id))
            .ok_or_else(|| anyhow!("{token} missing from vocabulary"))
    };
    let sep = special("[SEP]")?;
    let cls = special("[CLS]")?;
    tokenizer.with_post_processor(Some(PostProcessorWrapper::Bert(BertProcessing::new(sep, cls))));

    Ok(tokenizer)
}
