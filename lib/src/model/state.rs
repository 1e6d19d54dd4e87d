/// Marker for a model that is still being trained.
///
/// Only `Model<Unfitted>` implements [`TrainableModel`](super::TrainableModel).
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// Marker for a trained, inference-only model.
///
/// A `Fitted` model carries parameters only: no optimizer state and no
/// training hyperparameters.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;
