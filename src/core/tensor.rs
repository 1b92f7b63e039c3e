//! Tensor type aliases used across the pipeline.

/// A 4-dimensional tensor represented as a 4D array of f32 values.
///
/// Normalized images travel through the pipeline in this shape: a leading
/// batch dimension of 1, then the spatial and channel dimensions in the
/// order the active backend expects.
pub type Tensor4D = ndarray::Array4<f32>;
