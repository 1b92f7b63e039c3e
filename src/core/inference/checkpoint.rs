//! ONNX checkpoint backend.
//!
//! Loads a trained classifier from a serialized ONNX artifact at startup and
//! runs forward-only inference through ONNX Runtime. Loading is fail-fast:
//! a missing, unloadable, or architecture-mismatched artifact is a fatal
//! `ModelLoad` error, never a per-request one.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::inference::InferenceBackend;
use crate::core::tensor::Tensor4D;
use crate::processors::ChannelOrder;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Trained-weights inference backend over an ONNX Runtime session.
///
/// Raw output scores are passed through a numerically-stable softmax to form
/// the probability distribution, so checkpoints must be exported without a
/// terminal softmax layer.
pub struct CheckpointBackend {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    num_classes: usize,
    input_size: (u32, u32),
    channel_order: ChannelOrder,
    model_path: PathBuf,
}

impl std::fmt::Debug for CheckpointBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckpointBackend")
            .field("model_path", &self.model_path)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("num_classes", &self.num_classes)
            .field("input_size", &self.input_size)
            .field("channel_order", &self.channel_order)
            .finish()
    }
}

impl CheckpointBackend {
    /// Loads a checkpoint and validates its architecture.
    ///
    /// The session's declared input shape decides the tensor layout (NCHW
    /// for torch exports, NHWC otherwise); dynamic dimensions fall back to
    /// `configured_input_size` or 224x224. The declared output class count,
    /// when static, must equal `expected_classes`.
    ///
    /// # Errors
    ///
    /// Returns `ModelLoad` if the artifact is missing, cannot be read by
    /// ONNX Runtime, declares no inputs/outputs, or disagrees with the
    /// expected architecture.
    pub fn load(
        model_path: impl AsRef<Path>,
        expected_classes: usize,
        configured_input_size: Option<(u32, u32)>,
    ) -> ClassifyResult<Self> {
        let path = model_path.as_ref();

        if expected_classes == 0 {
            return Err(ClassifyError::config_error(
                "checkpoint backend requires at least one category",
            ));
        }

        if !path.is_file() {
            return Err(ClassifyError::model_load(
                path,
                "model artifact not found",
                None,
            ));
        }

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| {
                ClassifyError::model_load(path, "failed to create ONNX session", Some(Box::new(e)))
            })?;

        let input = session.inputs.first().ok_or_else(|| {
            ClassifyError::model_load(path, "model declares no inputs", None)
        })?;
        let input_name = input.name.clone();
        let input_dims: Option<Vec<i64>> = match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        };

        let (channel_order, declared_size) = interpret_input_shape(input_dims.as_deref());
        let input_size = match (declared_size, configured_input_size) {
            (Some(declared), Some(configured)) if declared != configured => {
                return Err(ClassifyError::model_load(
                    path,
                    format!(
                        "model expects {}x{} input but configuration says {}x{}",
                        declared.0, declared.1, configured.0, configured.1
                    ),
                    None,
                ));
            }
            (Some(declared), _) => declared,
            (None, Some(configured)) => configured,
            (None, None) => (224, 224),
        };

        let output = session.outputs.first().ok_or_else(|| {
            ClassifyError::model_load(path, "model declares no outputs", None)
        })?;
        let output_name = output.name.clone();
        if let ValueType::Tensor { shape, .. } = &output.output_type {
            if let Some(&classes) = shape.last() {
                if classes > 0 && classes as usize != expected_classes {
                    return Err(ClassifyError::model_load(
                        path,
                        format!(
                            "model predicts {classes} classes but {expected_classes} categories are registered"
                        ),
                        None,
                    ));
                }
            }
        }

        debug!(
            model_path = %path.display(),
            input = %input_name,
            output = %output_name,
            ?channel_order,
            "loaded checkpoint backend"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            num_classes: expected_classes,
            input_size,
            channel_order,
            model_path: path.to_path_buf(),
        })
    }

    /// Path of the loaded model artifact.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl InferenceBackend for CheckpointBackend {
    fn predict(&self, input: &Tensor4D) -> ClassifyResult<Vec<f32>> {
        let input_tensor = TensorRef::from_array_view(input.view()).map_err(|e| {
            ClassifyError::inference_with_source("failed to convert input tensor", e)
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifyError::inference("session lock poisoned"))?;

        let outputs = session
            .run(inputs)
            .map_err(|e| ClassifyError::inference_with_source("forward pass failed", e))?;

        let (_, scores) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifyError::inference_with_source(
                    format!("failed to extract output tensor '{}'", self.output_name),
                    e,
                )
            })?;

        if scores.len() != self.num_classes {
            return Err(ClassifyError::inference(format!(
                "model produced {} scores, expected {} (architecture mismatch?)",
                scores.len(),
                self.num_classes
            )));
        }

        Ok(softmax(scores))
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    fn backend_info(&self) -> String {
        format!(
            "CheckpointBackend ('{}', {} classes)",
            self.model_path.display(),
            self.num_classes
        )
    }
}

/// Infers the tensor layout and spatial size from a declared input shape.
///
/// Dynamic dimensions (-1) leave the size undetermined. Layout defaults to
/// NHWC when the channel position cannot be identified.
fn interpret_input_shape(dims: Option<&[i64]>) -> (ChannelOrder, Option<(u32, u32)>) {
    let Some(dims) = dims else {
        return (ChannelOrder::HWC, None);
    };
    if dims.len() != 4 {
        return (ChannelOrder::HWC, None);
    }

    if dims[1] == 3 {
        let size = (dims[3] > 0 && dims[2] > 0).then(|| (dims[3] as u32, dims[2] as u32));
        (ChannelOrder::CHW, size)
    } else if dims[3] == 3 {
        let size = (dims[2] > 0 && dims[1] > 0).then(|| (dims[2] as u32, dims[1] as u32));
        (ChannelOrder::HWC, size)
    } else {
        (ChannelOrder::HWC, None)
    }
}

/// Numerically-stable softmax over raw scores.
fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_fails_fast() {
        let err = CheckpointBackend::load("/nonexistent/model.onnx", 7, None).unwrap_err();
        assert!(matches!(err, ClassifyError::ModelLoad { .. }));
    }

    #[test]
    fn zero_expected_classes_is_a_config_error() {
        let err = CheckpointBackend::load("/nonexistent/model.onnx", 0, None).unwrap_err();
        assert!(matches!(err, ClassifyError::Config { .. }));
    }

    #[test]
    fn softmax_sums_to_one_and_preserves_order() {
        let probs = softmax(&[1.0, 3.0, 2.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[1] > probs[2] && probs[2] > probs[0]);
    }

    #[test]
    fn softmax_is_stable_for_large_scores() {
        let probs = softmax(&[1000.0, 1001.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn nchw_input_shape_selects_chw_layout() {
        let (order, size) = interpret_input_shape(Some(&[1, 3, 224, 224]));
        assert_eq!(order, ChannelOrder::CHW);
        assert_eq!(size, Some((224, 224)));
    }

    #[test]
    fn nhwc_input_shape_selects_hwc_layout() {
        let (order, size) = interpret_input_shape(Some(&[-1, 224, 224, 3]));
        assert_eq!(order, ChannelOrder::HWC);
        assert_eq!(size, Some((224, 224)));
    }

    #[test]
    fn dynamic_shape_leaves_size_undetermined() {
        let (order, size) = interpret_input_shape(Some(&[-1, -1, -1, 3]));
        assert_eq!(order, ChannelOrder::HWC);
        assert_eq!(size, None);
    }
}
