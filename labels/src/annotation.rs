//! Annotation extraction from a reference-based hierarchical store.
//!
//! SVHN's `digitStruct.mat` keeps one `name` and one `bbox` reference per
//! image. Inside a `bbox` group every field is either a plain value (the
//! image has a single box) or an array of references to single values.

use tracing::debug;

use crate::error::LabelError;

pub const FIELDS: [&str; 5] = ["label", "left", "top", "width", "height"];

/// One character box as stored by SVHN, 1-based pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnnotationBox {
    pub label: i64,
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub filename: String,
    pub boxes: Vec<AnnotationBox>,
}

/// A bbox field as it comes out of the store, before references are resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum Node<R> {
    Scalar(f64),
    Refs(Vec<R>),
}

/// A bbox field with every reference resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Scalar(i64),
    Array(Vec<i64>),
}

impl Field {
    pub fn len(&self) -> usize {
        match self {
            Field::Scalar(_) => 1,
            Field::Array(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_values(self) -> Vec<i64> {
        match self {
            Field::Scalar(v) => vec![v],
            Field::Array(v) => v,
        }
    }
}

/// Read access to an annotation store.
pub trait AnnotationStore {
    type Ref;

    /// `(name, bbox)` reference pairs in source order.
    fn entries(&self) -> Result<Vec<(Self::Ref, Self::Ref)>, LabelError>;

    /// UTF-16 code units of the image file name.
    fn char_codes(&self, name: &Self::Ref) -> Result<Vec<u16>, LabelError>;

    fn bbox_field(&self, bbox: &Self::Ref, key: &str) -> Result<Node<Self::Ref>, LabelError>;

    fn scalar(&self, r: &Self::Ref) -> Result<f64, LabelError>;
}

fn resolve_field<S: AnnotationStore>(
    store: &S,
    bbox: &S::Ref,
    key: &str,
) -> Result<Field, LabelError> {
    Ok(match store.bbox_field(bbox, key)? {
        Node::Scalar(v) => Field::Scalar(v as i64),
        Node::Refs(refs) => Field::Array(
            refs.iter()
                .map(|r| store.scalar(r).map(|v| v as i64))
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn read_record<S: AnnotationStore>(
    store: &S,
    index: usize,
    name: &S::Ref,
    bbox: &S::Ref,
) -> Result<AnnotationRecord, LabelError> {
    let filename = char::decode_utf16(store.char_codes(name)?)
        .collect::<Result<String, _>>()
        .map_err(|_| LabelError::InvalidName { index })?;

    let mut columns: Vec<Vec<i64>> = Vec::with_capacity(FIELDS.len());
    for key in FIELDS {
        columns.push(resolve_field(store, bbox, key)?.into_values());
    }

    let expected = columns[0].len();
    for (&field, column) in FIELDS.iter().zip(&columns).skip(1) {
        if column.len() != expected {
            return Err(LabelError::FieldLengthMismatch {
                index,
                filename,
                field,
                expected,
                found: column.len(),
            });
        }
    }

    let boxes = (0..expected)
        .map(|i| AnnotationBox {
            label: columns[0][i],
            left: columns[1][i],
            top: columns[2][i],
            width: columns[3][i],
            height: columns[4][i],
        })
        .collect();

    Ok(AnnotationRecord { filename, boxes })
}

/// Reads every entry of the store into records, failing on the first
/// inconsistent entry.
pub fn extract<S: AnnotationStore>(store: &S) -> Result<Vec<AnnotationRecord>, LabelError> {
    let entries = store.entries()?;
    debug!("extracting {} annotation entries", entries.len());

    entries
        .iter()
        .enumerate()
        .map(|(index, (name, bbox))| read_record(store, index, name, bbox))
        .collect()
}
