use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};

/// Deterministic frame-index to URI mapping.
///
/// URIs have the shape `{folder}{prefix}{index zero-padded to pad_width}.{extension}`, e.g.
/// `/images/scene3/sequence/frame_0042.png`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameNaming {
    /// Folder prefix, usually ending in `/`.
    pub folder: String,
    /// File stem prefix placed before the padded index.
    pub prefix: String,
    /// File extension without the leading dot.
    pub extension: String,
    /// Minimum number of digits in the index.
    pub pad_width: usize,
}

fn default_pad_width() -> usize {
    4
}

impl Default for FrameNaming {
    fn default() -> Self {
        Self {
            folder: "/images/scene3/sequence/".to_string(),
            prefix: "frame_".to_string(),
            extension: "png".to_string(),
            pad_width: default_pad_width(),
        }
    }
}

impl FrameNaming {
    /// Source URI for `index`.
    pub fn uri_for(&self, index: FrameIndex) -> String {
        format!(
            "{}{}{:0width$}.{}",
            self.folder,
            self.prefix,
            index.0,
            self.extension,
            width = self.pad_width
        )
    }

    /// Validate that the naming yields usable, distinct file names.
    pub fn validate(&self) -> ReelResult<()> {
        if self.extension.is_empty() {
            return Err(ReelError::validation("frame extension must be non-empty"));
        }
        if self.extension.starts_with('.') {
            return Err(ReelError::validation(
                "frame extension must not start with '.'",
            ));
        }
        if self.pad_width == 0 || self.pad_width > 10 {
            return Err(ReelError::validation("frame pad_width must be in 1..=10"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/naming.rs"]
mod tests;
