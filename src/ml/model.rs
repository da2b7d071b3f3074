use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

use crate::domain::aspect::{Aspect, POLARITY_CLASSES};

// Number of segment ids the embedding table can hold. Reviews are
// single-sentence input (all segment 0), but the pretrained table
// carries both BERT segments so its weights load unchanged.
const SEGMENT_VOCAB: usize = 2;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
/// Architecture of the pretrained text encoder. Read from the
/// `encoder_config.json` shipped alongside the pretrained weights.
#[derive(Config, Debug)]
pub struct EncoderConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
    pub dropout:     f64,
}

impl EncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TextEncoder<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let segment_embedding  = EmbeddingConfig::new(SEGMENT_VOCAB, self.d_model).init(device);
        let layers: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.d_model).init(device);
        let dropout    = DropoutConfig::new(self.dropout).init();
        TextEncoder {
            token_embedding, position_embedding, segment_embedding,
            layers, final_norm, dropout,
            max_seq_len: self.max_seq_len,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>, pad_mask: Option<Tensor<B, 2, Bool>>) -> Tensor<B, 3> {
        let mut attn_input = MhaInput::self_attn(x.clone());
        if let Some(mask) = pad_mask {
            // Padding positions must not receive attention weight
            attn_input = attn_input.mask_pad(mask);
        }
        let attn_output = self.self_attn.forward(attn_input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

/// The shared trunk: a BERT-style transformer encoder whose weights
/// come from the externally supplied pretrained checkpoint.
#[derive(Module, Debug)]
pub struct TextEncoder<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub segment_embedding:  Embedding<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub final_norm:         LayerNorm<B>,
    pub dropout:            Dropout,
    pub max_seq_len:        usize,
}

impl<B: Backend> TextEncoder<B> {
    /// token_ids, segment_ids: [batch, seq_len] → hidden states: [batch, seq_len, d_model]
    pub fn forward(
        &self,
        token_ids:   Tensor<B, 2, Int>,
        segment_ids: Tensor<B, 2, Int>,
        pad_mask:    Option<Tensor<B, 2, Bool>>,
    ) -> Tensor<B, 3> {
        let [batch_size, seq_len] = token_ids.dims();

        let tok_emb = self.token_embedding.forward(token_ids);
        let seg_emb = self.segment_embedding.forward(segment_ids);

        // Self-attention is permutation-invariant, so position must be injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        let mut x = self.dropout.forward(tok_emb + pos_emb + seg_emb);
        for layer in &self.layers {
            x = layer.forward(x, pad_mask.clone());
        }
        self.final_norm.forward(x) // [batch, seq_len, d_model]
    }
}

/// One independent classification head: dropout on the pooled
/// representation, then a linear projection to the three polarity logits.
#[derive(Module, Debug)]
pub struct AspectHead<B: Backend> {
    pub dropout: Dropout,
    pub output:  Linear<B>,
}

impl<B: Backend> AspectHead<B> {
    /// pooled: [batch, d_model] → logits: [batch, 3]
    pub fn forward(&self, pooled: Tensor<B, 2>) -> Tensor<B, 2> {
        self.output.forward(self.dropout.forward(pooled))
    }
}

#[derive(Config, Debug)]
pub struct SentimentModelConfig {
    pub encoder: EncoderConfig,
    /// Dropout applied per head on the pooled representation
    #[config(default = 0.5)]
    pub head_dropout: f64,
}

impl SentimentModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentModel<B> {
        let encoder = self.encoder.init(device);
        // One head per aspect, identical shape, independent weights
        let heads: Vec<AspectHead<B>> = Aspect::ALL
            .iter()
            .map(|_| AspectHead {
                dropout: DropoutConfig::new(self.head_dropout).init(),
                output:  LinearConfig::new(self.encoder.d_model, POLARITY_CLASSES).init(device),
            })
            .collect();
        SentimentModel { encoder, heads }
    }
}

/// Pretrained trunk plus seven independent softmax heads.
/// The heads share nothing with each other except the trunk.
#[derive(Module, Debug)]
pub struct SentimentModel<B: Backend> {
    pub encoder: TextEncoder<B>,
    pub heads:   Vec<AspectHead<B>>,
}

impl<B: Backend> SentimentModel<B> {
    /// Forward pass to raw logits.
    /// Returns one [batch, 3] tensor per aspect, in Aspect::ALL order.
    pub fn forward(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        segment_ids:    Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Vec<Tensor<B, 2>> {
        // Mask is 1 for real tokens; attention wants `true` on padding
        let pad_mask = attention_mask.equal_elem(0);
        let hidden = self.encoder.forward(token_ids, segment_ids, Some(pad_mask));

        // The first position is [CLS]; its embedding summarises the
        // whole sequence and feeds every head.
        let [batch_size, _seq_len, d_model] = hidden.dims();
        let pooled = hidden
            .slice([0..batch_size, 0..1, 0..d_model])
            .reshape([batch_size, d_model]);

        self.heads
            .iter()
            .map(|head| head.forward(pooled.clone()))
            .collect()
    }

    /// Forward pass plus the combined training objective.
    ///
    /// labels: [batch, aspects] class indices.
    /// Loss = Σ_a weight(a) · CrossEntropy(logits_a, labels_a),
    /// with the overall-verdict head weighted 2.0.
    pub fn forward_loss(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        segment_ids:    Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        labels:         Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Vec<Tensor<B, 2>>) {
        let logits = self.forward(token_ids, segment_ids, attention_mask);

        let device = logits[0].device();
        let ce = CrossEntropyLossConfig::new().init(&device);
        let [batch_size, _] = labels.dims();

        let mut loss = Tensor::<B, 1>::zeros([1], &device);
        for (i, aspect) in Aspect::ALL.iter().enumerate() {
            let targets = labels.clone()
                .slice([0..batch_size, i..i + 1])
                .reshape([batch_size]);
            loss = loss + ce.forward(logits[i].clone(), targets) * aspect.loss_weight();
        }

        (loss, logits)
    }
}
