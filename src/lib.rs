//! IMDB movie review sentiment classification.
//!
//! Loads a frozen embedding + LSTM network with [Candle](https://github.com/huggingface/candle),
//! encodes reviews with the fixed IMDB word index, and serves a small web page
//! for classifying reviews interactively.

#![deny(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod pipelines;

// ============ Public API ============

pub mod config;
pub mod error;
pub mod web;

pub use pipelines::sentiment;
