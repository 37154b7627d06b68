//! Matlab v7.3 (HDF5) `digitStruct.mat` reader.

use std::path::Path;

use hdf5::{Dataset, File, Group, ObjectReference1, ReferencedObject};

use crate::{
    annotation::{AnnotationStore, Node},
    error::LabelError,
};

fn store_err(err: hdf5::Error) -> LabelError {
    LabelError::Store(err.to_string())
}

pub struct MatStore {
    file: File,
}

impl MatStore {
    pub fn open(path: &Path) -> Result<Self, LabelError> {
        let file = File::open(path).map_err(store_err)?;
        Ok(Self { file })
    }

    fn references(&self, path: &str) -> Result<Vec<ObjectReference1>, LabelError> {
        self.file
            .dataset(path)
            .and_then(|ds| ds.read_raw::<ObjectReference1>())
            .map_err(store_err)
    }

    fn dataset(&self, r: &ObjectReference1) -> Result<Dataset, LabelError> {
        match self.file.dereference(r).map_err(store_err)? {
            ReferencedObject::Dataset(ds) => Ok(ds),
            _ => Err(LabelError::Store("reference does not point to a dataset".into())),
        }
    }

    fn group(&self, r: &ObjectReference1) -> Result<Group, LabelError> {
        match self.file.dereference(r).map_err(store_err)? {
            ReferencedObject::Group(g) => Ok(g),
            _ => Err(LabelError::Store("reference does not point to a group".into())),
        }
    }
}

fn first_value(ds: &Dataset) -> Result<f64, LabelError> {
    ds.read_raw::<f64>()
        .map_err(store_err)?
        .first()
        .copied()
        .ok_or_else(|| LabelError::Store(format!("dataset {} is empty", ds.name())))
}

impl AnnotationStore for MatStore {
    type Ref = ObjectReference1;

    fn entries(&self) -> Result<Vec<(Self::Ref, Self::Ref)>, LabelError> {
        let names = self.references("digitStruct/name")?;
        let bboxes = self.references("digitStruct/bbox")?;
        if names.len() != bboxes.len() {
            return Err(LabelError::Store(format!(
                "digitStruct has {} names but {} bbox groups",
                names.len(),
                bboxes.len()
            )));
        }
        Ok(names.into_iter().zip(bboxes).collect())
    }

    fn char_codes(&self, name: &Self::Ref) -> Result<Vec<u16>, LabelError> {
        self.dataset(name)?.read_raw::<u16>().map_err(store_err)
    }

    fn bbox_field(&self, bbox: &Self::Ref, key: &str) -> Result<Node<Self::Ref>, LabelError> {
        let ds = self.group(bbox)?.dataset(key).map_err(store_err)?;
        if ds.shape().first() == Some(&1) {
            Ok(Node::Scalar(first_value(&ds)?))
        } else {
            Ok(Node::Refs(ds.read_raw::<ObjectReference1>().map_err(store_err)?))
        }
    }

    fn scalar(&self, r: &Self::Ref) -> Result<f64, LabelError> {
        first_value(&self.dataset(r)?)
    }
}
