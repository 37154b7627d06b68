//! Shared YOLO-style label convention for the glyph detection datasets.
//!
//! Both dataset pipelines end up here: the SVHN conversion goes through
//! [`annotation`] and [`normalize`], the synthetic generator only needs
//! [`alphabet`] and [`label`].

pub mod alphabet;
pub mod annotation;
pub mod error;
pub mod label;
#[cfg(feature = "mat")]
pub mod mat;
pub mod normalize;

pub use alphabet::Alphabet;
pub use annotation::{AnnotationBox, AnnotationRecord, AnnotationStore, Field, Node, extract};
pub use error::LabelError;
pub use label::{LabelOptions, NormalizedBox, write_label_file};
pub use normalize::{ConvertSummary, Outcome, convert_all, normalize_record};
