use std::fmt;

/// A particle store or parameter buffer could not be sized.
///
/// Raised before any buffer is created, so a failed setup never leaves
/// partially allocated state behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The requested byte size exceeds a device limit.
    LimitExceeded {
        limit: &'static str,
        requested_bytes: u64,
        limit_bytes: u64,
    },
    /// The configuration describes a store with nothing in it.
    EmptyStore,
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::LimitExceeded { limit, requested_bytes, limit_bytes } => write!(
                f,
                "allocation of {requested_bytes} bytes exceeds {limit} ({limit_bytes} bytes)"
            ),
            AllocationError::EmptyStore => {
                write!(f, "particle store would be empty (zero particles or empty seed)")
            }
        }
    }
}

impl std::error::Error for AllocationError {}

/// Which pipeline a build failure belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PipelineKind {
    Compute,
    Render,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineKind::Compute => write!(f, "compute"),
            PipelineKind::Render => write!(f, "render"),
        }
    }
}

/// Pipeline construction failed.
///
/// Covers both sides of the contract: configuration that disagrees with
/// itself (malformed vertex layouts, stride mismatches) and configuration
/// the device rejects during validation (shader interface mismatches).
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineBuildError {
    pub kind: PipelineKind,
    pub message: String,
}

impl PipelineBuildError {
    pub(crate) fn compute(msg: impl Into<String>) -> Self {
        Self { kind: PipelineKind::Compute, message: msg.into() }
    }

    pub(crate) fn render(msg: impl Into<String>) -> Self {
        Self { kind: PipelineKind::Render, message: msg.into() }
    }
}

impl fmt::Display for PipelineBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to build {} pipeline: {}", self.kind, self.message)
    }
}

impl std::error::Error for PipelineBuildError {}

/// Any failure from pipeline setup.
///
/// Setup either returns a fully built [`crate::sim::FrameDriver`] or one of
/// these; there is no partially initialized in-between.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    Allocation(AllocationError),
    PipelineBuild(PipelineBuildError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Allocation(e) => write!(f, "{e}"),
            SetupError::PipelineBuild(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetupError::Allocation(e) => Some(e),
            SetupError::PipelineBuild(e) => Some(e),
        }
    }
}

impl From<AllocationError> for SetupError {
    fn from(e: AllocationError) -> Self {
        SetupError::Allocation(e)
    }
}

impl From<PipelineBuildError> for SetupError {
    fn from(e: PipelineBuildError) -> Self {
        SetupError::PipelineBuild(e)
    }
}

/// One tick's command stream never reached the queue.
///
/// The tick number it carries is consumed: the driver does not roll its
/// counter back, so a dropped tick shows up as a gap in the sequence rather
/// than a repeat.
#[derive(Debug)]
pub struct SubmissionError {
    /// Tick that was being encoded when acquisition failed.
    pub tick: u64,
    pub source: wgpu::SurfaceError,
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} dropped: {}", self.tick, self.source)
    }
}

impl std::error::Error for SubmissionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
