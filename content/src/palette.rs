//! Placeholder gradients for items whose image cannot be resolved.

use crate::types::ResolvedImage;

/// Used for posts, services and pages.
pub const CONTENT_GRADIENTS: [&str; 5] = [
    "linear-gradient(135deg, #00D4CC 0%, #6C63FF 100%)",
    "linear-gradient(135deg, #FF6B35 0%, #00D4CC 100%)",
    "linear-gradient(135deg, #6C63FF 0%, #FF6B35 100%)",
    "linear-gradient(135deg, #10B981 0%, #00D4CC 100%)",
    "linear-gradient(135deg, #FF10F0 0%, #6C63FF 100%)",
];

/// Used for portfolio entries.
pub const PORTFOLIO_GRADIENTS: [&str; 6] = [
    "linear-gradient(135deg, #00D4CC 0%, #6C63FF 100%)",
    "linear-gradient(135deg, #FF6B35 0%, #00D4CC 100%)",
    "linear-gradient(135deg, #6C63FF 0%, #FF6B35 100%)",
    "linear-gradient(135deg, #10B981 0%, #00D4CC 100%)",
    "linear-gradient(135deg, #FF10F0 0%, #6C63FF 100%)",
    "linear-gradient(135deg, #00D4CC 0%, #FF6B35 100%)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    gradients: &'static [&'static str],
}

impl Palette {
    /// Returns `None` for an empty slice; a palette always has an entry to pick.
    pub fn new(gradients: &'static [&'static str]) -> Option<Self> {
        (!gradients.is_empty()).then_some(Self { gradients })
    }

    pub fn content() -> Self {
        Self {
            gradients: &CONTENT_GRADIENTS,
        }
    }

    pub fn portfolio() -> Self {
        Self {
            gradients: &PORTFOLIO_GRADIENTS,
        }
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }

    pub fn gradient_for(&self, id: u64) -> &'static str {
        self.gradients[(id % self.gradients.len() as u64) as usize]
    }

    pub fn placeholder(&self, id: u64) -> ResolvedImage {
        ResolvedImage::gradient(self.gradient_for(id))
    }
}
