//! Image and prediction processing components.
//!
//! This module contains the stages that sit on either side of the inference
//! backend: image normalization before it, confidence calibration and top-k
//! selection after it.

pub mod calibration;
pub mod normalization;
pub mod topk;

pub use calibration::ConfidenceCalibrator;
pub use normalization::{ChannelOrder, ImageNormalizer};
pub use topk::{Topk, TopkEntry};
