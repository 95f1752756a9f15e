use thiserror::Error;

/// Top-level error type for the gridspan build-mode core.
#[derive(Debug, Error)]
pub enum GridspanError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the point/bar connectivity graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Attempted to create a bar whose endpoints coincide.
    #[error("degenerate segment: endpoints coincide")]
    DegenerateSegment,

    /// Attempted to commit a segment longer than the material allows.
    #[error("segment length {length} exceeds material limit {max}")]
    SegmentTooLong { length: f64, max: f64 },

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid material: {0}")]
    InvalidMaterial(String),
}

/// Errors related to the snapping grid surface.
#[derive(Debug, Error)]
pub enum GridError {
    /// No camera (or other observation point) could be resolved to anchor
    /// the surface to. The surface stays inactive and snapping degrades to
    /// the identity.
    #[error("no observation point available to anchor the grid surface")]
    NoObservationPoint,

    #[error("invalid grid parameters: {0}")]
    InvalidParameters(String),
}

/// Errors related to build-session mode transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Entering while already building, or exiting while already normal.
    /// Benign: the session state is left untouched.
    #[error("invalid mode transition: already {current}")]
    InvalidModeTransition { current: &'static str },

    /// An expected external collaborator was not supplied. The affected
    /// step is skipped rather than aborting the whole transition.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
}

/// Convenience type alias for results using [`GridspanError`].
pub type Result<T> = std::result::Result<T, GridspanError>;
