use std::collections::HashMap;

use crate::error::{PipelineError, Result};

/// Fixed constants shared by the encoder and the model it feeds.
///
/// These values were fixed when the model was trained. The pipeline checks the
/// model's `config.json` against them at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Exclusive ceiling on emitted word indices (the embedding table size).
    pub vocab_size: u32,
    /// Length of every encoded sequence.
    pub max_len: usize,
    /// Added to raw vocabulary ranks to make room for the sentinels.
    pub index_offset: u32,
}

impl EncoderConfig {
    /// Padding sentinel.
    pub const PAD: u32 = 0;
    /// Start-of-review sentinel.
    pub const START: u32 = 1;
    /// Unknown or out-of-range word sentinel.
    pub const UNKNOWN: u32 = 2;

    /// The constants the IMDB LSTM was trained with.
    pub const IMDB: EncoderConfig = EncoderConfig {
        vocab_size: 10_000,
        max_len: 200,
        index_offset: 3,
    };
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::IMDB
    }
}

/// Immutable word → frequency-rank table.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    ranks: HashMap<String, u32>,
}

impl Vocabulary {
    /// Build a vocabulary from `(word, rank)` pairs.
    ///
    /// Fails on an empty table, which can only come from a corrupt word index.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let ranks: HashMap<String, u32> = entries
            .into_iter()
            .map(|(word, rank)| (word.into(), rank))
            .collect();

        if ranks.is_empty() {
            return Err(PipelineError::Artifact(
                "Word index is empty; expected a JSON object of word -> rank".into(),
            ));
        }

        Ok(Self { ranks })
    }

    /// Parse a Keras-style word index (`{"the": 1, "and": 2, ...}`).
    pub fn from_json(json: &str) -> Result<Self> {
        let ranks: HashMap<String, u32> = serde_json::from_str(json)
            .map_err(|e| PipelineError::Artifact(format!("Invalid word index JSON: {e}")))?;
        Self::new(ranks)
    }

    /// Rank of `word`, if present.
    pub fn rank(&self, word: &str) -> Option<u32> {
        self.ranks.get(word).copied()
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Always false for a constructed vocabulary.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Model input index for a single lower-cased word.
    pub fn index_of(&self, word: &str, config: &EncoderConfig) -> u32 {
        match self.rank(word) {
            Some(rank) => match rank.checked_add(config.index_offset) {
                Some(index) if index < config.vocab_size => index,
                _ => EncoderConfig::UNKNOWN,
            },
            None => EncoderConfig::UNKNOWN,
        }
    }
}

/// Whether `c` separates words in a review.
///
/// Unicode whitespace plus the ASCII file, group, record and unit separators
/// (`U+001C..=U+001F`), matching the tokenizer the word index was built with.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Encode `text` into exactly `config.max_len` model input indices.
///
/// The review is lower-cased and split on [`is_separator`], prefixed with
/// [`EncoderConfig::START`], then pre-padded with [`EncoderConfig::PAD`].
/// Sequences longer than `max_len` lose their earliest entries.
pub fn encode(text: &str, vocabulary: &Vocabulary, config: &EncoderConfig) -> Vec<u32> {
    let lowered = text.to_lowercase();

    let mut tokens = Vec::with_capacity(config.max_len.max(1));
    tokens.push(EncoderConfig::START);
    tokens.extend(
        lowered
            .split(is_separator)
            .filter(|word| !word.is_empty())
            .map(|word| vocabulary.index_of(word, config)),
    );

    pad_sequence(tokens, config.max_len)
}

/// Pre-pad with zeros or drop leading entries so the result is `max_len` long.
fn pad_sequence(mut tokens: Vec<u32>, max_len: usize) -> Vec<u32> {
    if tokens.len() >= max_len {
        return tokens.split_off(tokens.len() - max_len);
    }

    let mut padded = vec![EncoderConfig::PAD; max_len - tokens.len()];
    padded.extend(tokens);
    padded
}
