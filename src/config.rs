use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "screenshot.png";

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Where the PNG is written, relative to the working directory.
    pub output: PathBuf,
    /// X display name; `None` reads `$DISPLAY`.
    pub display: Option<String>,
    /// Plane mask passed to `GetImage`.
    pub plane_mask: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            display: None,
            plane_mask: u32::MAX,
        }
    }
}

impl CaptureConfig {
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}
