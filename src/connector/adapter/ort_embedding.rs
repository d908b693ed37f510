use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use tokenizers::Tokenizer;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig};

const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_DIMENSIONS: usize = 384;
const DEFAULT_MAX_SEQ_LENGTH: usize = 256;

/// Synchronous text-to-vector encoder produced by a model loader.
trait TextEncoder: Send + Sync {
    fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, DomainError>;
}

type ModelLoader = Arc<dyn Fn() -> Result<Arc<dyn TextEncoder>, DomainError> + Send + Sync>;

/// A loaded ONNX session and its tokenizer.
struct OrtModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    max_sequence_length: usize,
}

impl OrtModel {
    fn download(model_id: &str, max_sequence_length: usize) -> Result<Self, DomainError> {
        info!("Downloading embedding model: {}", model_id);

        let api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|e| DomainError::embedding(format!("Failed to create HF API: {}", e)))?;

        let repo = api.model(model_id.to_string());

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| DomainError::embedding(format!("Failed to download tokenizer: {}", e)))?;

        let model_path = repo
            .get("model.onnx")
            .or_else(|_| repo.get("onnx/model.onnx"))
            .map_err(|e| DomainError::embedding(format!("Failed to download ONNX model: {}", e)))?;

        Self::load(&model_path, &tokenizer_path, max_sequence_length)
    }

    fn load(
        model_path: &Path,
        tokenizer_path: &Path,
        max_sequence_length: usize,
    ) -> Result<Self, DomainError> {
        info!("Loading ONNX model from: {:?}", model_path);

        let session = Session::builder()
            .map_err(|e| DomainError::embedding(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DomainError::embedding(format!("Failed to set optimization level: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| DomainError::embedding(format!("Failed to load ONNX model: {}", e)))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| DomainError::embedding(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            max_sequence_length,
        })
    }

    /// Masked mean pooling over the last hidden state, then L2 normalization.
    fn run(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| DomainError::embedding(format!("Tokenization failed: {}", e)))?;

        let batch_size = encodings.len();
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(self.max_sequence_length);

        let mut input_ids: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut token_type_ids: Vec<i64> = Vec::with_capacity(batch_size * max_len);

        for encoding in &encodings {
            let len = encoding.get_ids().len().min(max_len);
            let padding = max_len - len;

            input_ids.extend(encoding.get_ids()[..len].iter().map(|&x| x as i64));
            attention_mask.extend(encoding.get_attention_mask()[..len].iter().map(|&x| x as i64));
            token_type_ids.extend(encoding.get_type_ids()[..len].iter().map(|&x| x as i64));

            input_ids.extend(std::iter::repeat_n(0i64, padding));
            attention_mask.extend(std::iter::repeat_n(0i64, padding));
            token_type_ids.extend(std::iter::repeat_n(0i64, padding));
        }

        let shape = [batch_size, max_len];
        let input_ids_tensor = Tensor::from_array((shape, input_ids))
            .map_err(|e| DomainError::embedding(format!("Failed to create input_ids tensor: {}", e)))?;
        let attention_mask_tensor = Tensor::from_array((shape, attention_mask)).map_err(|e| {
            DomainError::embedding(format!("Failed to create attention_mask tensor: {}", e))
        })?;
        let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids)).map_err(|e| {
            DomainError::embedding(format!("Failed to create token_type_ids tensor: {}", e))
        })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| DomainError::embedding(format!("Failed to lock session: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor,
            ])
            .map_err(|e| DomainError::embedding(format!("Inference failed: {}", e)))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| DomainError::embedding("No output tensor found"))?;

        let (shape, data) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| DomainError::embedding(format!("Failed to extract output tensor: {}", e)))?;

        let shape: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
        debug!("Output tensor shape: {:?}", shape);

        if shape.len() != 3 {
            return Err(DomainError::embedding(format!(
                "Unexpected output tensor shape: {:?}",
                shape
            )));
        }

        let seq_len = shape[1];
        let hidden_size = shape[2];

        let embeddings = encodings
            .iter()
            .enumerate()
            .map(|(i, encoding)| {
                let mask = encoding.get_attention_mask();
                let mut pooled = vec![0.0f32; hidden_size];
                let mut count = 0.0f32;

                for (j, &mask_val) in mask.iter().enumerate().take(seq_len.min(max_len)) {
                    if mask_val == 0 {
                        continue;
                    }
                    let offset = i * seq_len * hidden_size + j * hidden_size;
                    for (k, value) in pooled.iter_mut().enumerate() {
                        *value += data[offset + k];
                    }
                    count += 1.0;
                }

                if count > 0.0 {
                    for v in &mut pooled {
                        *v /= count;
                    }
                }

                l2_normalize(&mut pooled);
                pooled
            })
            .collect();

        Ok(embeddings)
    }
}

impl TextEncoder for OrtModel {
    fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, DomainError> {
        self.run(texts)
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Sentence embeddings computed locally with ONNX Runtime.
///
/// Construction is cheap: the model is downloaded and loaded on the first
/// embedding call and then shared by every later call. Concurrent first calls
/// wait on the same initialization instead of loading twice.
pub struct OrtEmbedding {
    loader: ModelLoader,
    model: OnceCell<Arc<dyn TextEncoder>>,
    config: EmbeddingConfig,
}

impl OrtEmbedding {
    pub fn new(model_id: Option<&str>) -> Self {
        let model_id = model_id.unwrap_or(DEFAULT_MODEL_ID).to_string();
        info!("Embedding model {} will load on first use", model_id);

        let config = EmbeddingConfig::new(
            model_id.clone(),
            DEFAULT_DIMENSIONS,
            DEFAULT_MAX_SEQ_LENGTH,
        );
        let max_sequence_length = config.max_sequence_length();
        let loader: ModelLoader = Arc::new(move || {
            let model = OrtModel::download(&model_id, max_sequence_length)?;
            Ok(Arc::new(model) as Arc<dyn TextEncoder>)
        });

        Self::with_loader(config, loader)
    }

    fn with_loader(config: EmbeddingConfig, loader: ModelLoader) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
            config,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    async fn model(&self) -> Result<Arc<dyn TextEncoder>, DomainError> {
        self.model
            .get_or_try_init(|| async {
                let loader = self.loader.clone();
                tokio::task::spawn_blocking(move || loader())
                    .await
                    .map_err(|e| DomainError::embedding(format!("Model loading task failed: {}", e)))?
            })
            .await
            .cloned()
    }

    async fn embed_owned(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
        let model = self.model().await?;

        tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            model.embed_texts(&refs)
        })
        .await
        .map_err(|e| DomainError::embedding(format!("Embedding task failed: {}", e)))?
    }
}

#[async_trait]
impl EmbeddingService for OrtEmbedding {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.embed_owned(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::embedding("Failed to generate query embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        self.embed_owned(texts.to_vec()).await
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}
