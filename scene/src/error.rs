//! Scene loading errors
//!
//! Every malformed-input case has its own variant. Call sites wrap errors in
//! [`SceneError::Context`] on the way up, so a failure deep inside accessor
//! decoding still reports which mesh and primitive it happened in.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("{kind} index {index} out of bounds ({count} available)")]
    IndexOutOfBounds {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    #[error("accessor {0} has no buffer view")]
    MissingBufferView(usize),

    #[error("buffer {0} has no data")]
    EmptyBuffer(usize),

    #[error("buffer view {view} spans {offset}..{end} but buffer {buffer} is {len} bytes")]
    ViewOutOfBounds {
        view: usize,
        buffer: usize,
        offset: usize,
        end: usize,
        len: usize,
    },

    #[error("accessor {accessor} is {found}, expected {expected}")]
    TypeMismatch {
        accessor: usize,
        expected: String,
        found: String,
    },

    #[error("accessor {accessor} reads up to byte {end} but buffer is {len} bytes")]
    AccessorOutOfBounds {
        accessor: usize,
        end: usize,
        len: usize,
    },

    #[error("accessor {accessor} element is {element_size} bytes but stride is {stride}")]
    StrideTooSmall {
        accessor: usize,
        element_size: usize,
        stride: usize,
    },

    #[error("unsupported primitive topology {0:?}")]
    UnsupportedTopology(crate::document::Topology),

    #[error("missing required attribute {0}")]
    MissingAttribute(&'static str),

    #[error("vertex index {index} out of bounds ({count} vertices)")]
    VertexIndexOutOfBounds { index: u32, count: usize },

    #[error("attribute {attribute} has {found} entries, expected {expected}")]
    AttributeLengthMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid vertex count {count} for {topology:?}")]
    InvalidVertexCount {
        topology: crate::document::Topology,
        count: usize,
    },

    #[error("cycle detected in node graph at node {0}")]
    Cycle(usize),

    #[error("invalid sampler: {0}")]
    InvalidSampler(String),

    #[error("skin {skin} has {matrices} inverse bind matrices for {joints} joints")]
    MissingInverseBindMatrices {
        skin: usize,
        matrices: usize,
        joints: usize,
    },

    #[error("document has no scenes")]
    NoScene,

    #[error("document has {0} scenes and no default scene")]
    NoDefaultScene(usize),

    #[error("animation '{0}' not found")]
    AnimationNotFound(String),

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: Box<SceneError>,
    },
}

impl SceneError {
    pub(crate) fn out_of_bounds(kind: &'static str, index: usize, count: usize) -> Self {
        Self::IndexOutOfBounds { kind, index, count }
    }

    /// Innermost error, skipping any context layers.
    pub fn root_cause(&self) -> &SceneError {
        match self {
            Self::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Renders the chain outermost first, e.g.
    /// `loading mesh 2: assembling primitive 0: missing required attribute POSITION`.
    pub fn trace(&self) -> String {
        match self {
            Self::Context { message, source } => format!("{}: {}", message, source.trace()),
            other => other.to_string(),
        }
    }
}

/// `anyhow`-style context for [`Result`].
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> Result<T>;

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|source| SceneError::Context {
            message: message.into(),
            source: Box::new(source),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| SceneError::Context {
            message: f().into(),
            source: Box::new(source),
        })
    }
}
