//! ONNX-based embedder using all-MiniLM-L6-v2.
//!
//! Loads a SentenceTransformers ONNX model and tokenizer once at
//! construction and produces 384-dimensional float32 vectors via
//! attention-mask mean pooling. Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;

    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::Tokenizer;
    use tracing::info;

    use memqa_core::{Error, Result};

    use crate::cache::EmbeddingCache;
    use crate::embedder::{check_input, Embedder};

    /// Maximum sequence length for the model.
    const MAX_SEQ_LEN: usize = 512;

    /// Output dimension of all-MiniLM-L6-v2.
    const DIM: usize = 384;

    pub struct OnnxEmbedder {
        session: Mutex<Session>,
        tokenizer: Tokenizer,
        cache: EmbeddingCache,
    }

    impl OnnxEmbedder {
        /// Load the model and tokenizer from `model_dir`.
        ///
        /// Expects `model_dir/model.onnx` and `model_dir/tokenizer.json`.
        /// This is the slow one-time load; construct at startup, not per
        /// request.
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");

            if !model_path.exists() {
                return Err(Error::Embedding(format!(
                    "model not found: {}",
                    model_path.display()
                )));
            }
            if !tokenizer_path.exists() {
                return Err(Error::Embedding(format!(
                    "tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            // With load-dynamic, ORT_DYLIB_PATH must point to libonnxruntime
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| Error::Embedding(format!("session builder: {e}")))?
                .with_intra_threads(2)
                .map_err(|e| Error::Embedding(format!("session threads: {e}")))?
                .commit_from_file(&model_path)
                .map_err(|e| Error::Embedding(format!("model load: {e}")))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| Error::Embedding(format!("tokenizer load: {e}")))?;

            info!(model = %model_path.display(), dim = DIM, "ONNX embedder loaded");

            Ok(Self {
                session: Mutex::new(session),
                tokenizer,
                cache: EmbeddingCache::default_cache(),
            })
        }

        fn infer(&self, text: &str) -> Result<Array1<f32>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| Error::Embedding(format!("tokenization: {e}")))?;

            let input_ids = encoding.get_ids();
            let attention_mask = encoding.get_attention_mask();

            let seq_len = input_ids.len().min(MAX_SEQ_LEN);
            let input_ids = &input_ids[..seq_len];
            let attention_mask = &attention_mask[..seq_len];

            let ids_data: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
            let mask_data: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
            let type_ids_data: Vec<i64> = vec![0i64; seq_len];

            let ids_tensor = Tensor::from_array(([1usize, seq_len], ids_data))
                .map_err(|e| Error::Embedding(format!("ids tensor: {e}")))?;
            let mask_tensor = Tensor::from_array(([1usize, seq_len], mask_data))
                .map_err(|e| Error::Embedding(format!("mask tensor: {e}")))?;
            let type_ids_tensor = Tensor::from_array(([1usize, seq_len], type_ids_data))
                .map_err(|e| Error::Embedding(format!("type_ids tensor: {e}")))?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(|e| Error::Embedding(format!("inference: {e}")))?;

            // Output is either [1, seq_len, dim] token embeddings needing
            // mean pooling, or an already-pooled [1, dim] sentence vector.
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| Error::Embedding(format!("output tensor: {e}")))?;

            let shape_dims: Vec<i64> = shape.iter().copied().collect();

            match shape_dims.len() {
                3 => {
                    let dim = shape_dims[2] as usize;
                    let mask_f32: Vec<f32> = attention_mask.iter().map(|&m| m as f32).collect();
                    let mask_sum: f32 = mask_f32.iter().sum();
                    if mask_sum < 1e-9 {
                        return Err(Error::Embedding("attention mask is all zero".into()));
                    }

                    let mut pooled = Array1::zeros(dim);
                    for (i, &m) in mask_f32.iter().enumerate() {
                        if m > 0.0 {
                            let offset = i * dim;
                            for d in 0..dim {
                                pooled[d] += data[offset + d] * m;
                            }
                        }
                    }
                    Ok(pooled / mask_sum)
                }
                2 => {
                    let dim = shape_dims[1] as usize;
                    Ok(Array1::from_vec(data[..dim].to_vec()))
                }
                _ => Err(Error::Embedding(format!(
                    "unexpected output shape: {shape_dims:?}"
                ))),
            }
        }
    }

    impl Embedder for OnnxEmbedder {
        fn embed(&self, text: &str) -> Result<Array1<f32>> {
            check_input(text)?;

            if let Some(cached) = self.cache.get(text) {
                return Ok(cached);
            }

            let vector = self.infer(text)?;
            self.cache.put(text.to_string(), vector.clone());
            Ok(vector)
        }

        fn dimension(&self) -> usize {
            DIM
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
