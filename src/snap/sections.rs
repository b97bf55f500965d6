use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

/// Vertical extent of one content section, in page pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Section {
    /// Caller-chosen identifier.
    pub id: String,
    /// Offset of the section's top edge.
    pub top: f64,
    /// Offset of the section's bottom edge; always greater than `top`.
    pub bottom: f64,
}

impl Section {
    /// Validated constructor.
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> ReelResult<Self> {
        let s = Self {
            id: id.into(),
            top,
            bottom,
        };
        s.validate()?;
        Ok(s)
    }

    /// Build from a measured top offset and height.
    pub fn from_extent(id: impl Into<String>, top: f64, height: f64) -> ReelResult<Self> {
        Self::new(id, top, top + height)
    }

    /// Height of the section.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn validate(&self) -> ReelResult<()> {
        if !self.top.is_finite() || !self.bottom.is_finite() {
            return Err(ReelError::validation(format!(
                "section '{}' has non-finite offsets",
                self.id
            )));
        }
        if self.bottom <= self.top {
            return Err(ReelError::validation(format!(
                "section '{}' must have bottom > top (top={}, bottom={})",
                self.id, self.top, self.bottom
            )));
        }
        Ok(())
    }
}

/// Source of fresh section measurements, queried on every layout recompute.
pub trait SectionLayout {
    /// Measure all sections in document order.
    fn measure(&self) -> ReelResult<Vec<Section>>;
}

impl SectionLayout for Vec<Section> {
    fn measure(&self) -> ReelResult<Vec<Section>> {
        Ok(self.clone())
    }
}

/// Immutable view of the registry at one point in time.
///
/// Cloning is cheap. Snapshots never change; a recompute produces a new snapshot with a higher
/// generation.
#[derive(Clone, Debug, Default)]
pub struct SectionSnapshot {
    generation: u64,
    sections: Arc<[Section]>,
}

impl SectionSnapshot {
    /// Sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Generation this snapshot was taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the snapshot holds no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Holds the current section layout.
///
/// Single writer (layout-change handling), any number of readers holding snapshots. Readers never
/// observe a partially refreshed list because a refresh swaps in a whole new snapshot.
#[derive(Debug, Default)]
pub struct SectionRegistry {
    current: SectionSnapshot,
}

impl SectionRegistry {
    /// Empty registry at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry initialised with `sections`.
    pub fn with_sections(sections: Vec<Section>) -> ReelResult<Self> {
        let mut r = Self::new();
        r.replace(sections)?;
        Ok(r)
    }

    /// Replace all sections. On validation failure the previous snapshot stays current.
    pub fn replace(&mut self, sections: Vec<Section>) -> ReelResult<()> {
        for s in &sections {
            s.validate()?;
        }
        let generation = self.current.generation + 1;
        tracing::debug!(generation, count = sections.len(), "section layout refreshed");
        self.current = SectionSnapshot {
            generation,
            sections: sections.into(),
        };
        Ok(())
    }

    /// Re-measure the layout (e.g. after a resize) and publish a new snapshot.
    pub fn recompute(&mut self, layout: &dyn SectionLayout) -> ReelResult<()> {
        let sections = layout.measure()?;
        self.replace(sections)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SectionSnapshot {
        self.current.clone()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.current.generation
    }

    /// Whether `snapshot` is still the latest published layout.
    pub fn is_current(&self, snapshot: &SectionSnapshot) -> bool {
        snapshot.generation == self.current.generation
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snap/sections.rs"]
mod tests;
