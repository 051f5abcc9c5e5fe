use thiserror::Error;

/// Fatal conditions that tear down the video surface.
///
/// Everything else in this crate is either a boolean refusal (a display
/// mode the target cannot satisfy) or a defined fallback (dirty-rect
/// overflow), so the error type stays small.
#[derive(Debug, Error)]
pub enum VideoError {
    /// Backing store or indexed buffer allocation failed.
    #[error("pixel buffer allocation of {bytes} bytes failed")]
    Allocation { bytes: usize },

    /// The display surface lost its drawing context and could not be rebuilt.
    #[error("display surface unavailable: {0}")]
    SurfaceLost(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_error_reports_size() {
        let err = VideoError::Allocation { bytes: 4096 };
        assert!(err.to_string().contains("4096"));
    }

    #[test]
    fn surface_error_carries_reason() {
        let err = VideoError::SurfaceLost("adapter gone".into());
        assert!(err.to_string().contains("adapter gone"));
    }
}
