// src/extractors/mod.rs
pub mod mask;
pub mod numbers;
pub mod section;

// Re-export key extraction types for convenience
pub use mask::{Mask, MaskSegment};
pub use numbers::{extract_numbers, Location, Number, NumericToken};
pub use section::{extract_section, Marker, SectionDescriptor};
