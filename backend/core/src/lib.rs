pub mod annotation;
pub mod error;
pub mod event;
pub mod outcome;
pub mod traits;

pub use annotation::{
    AnnotateImageRequest, AnnotateImageResponse, BatchAnnotateImagesRequest,
    BatchAnnotateImagesResponse, Feature, FeatureType, Image, ImageSource, Status, TextAnnotation,
};
pub use error::HandlerError;
pub use event::{InvalidEvent, ObjectRef, StorageEvent};
pub use outcome::Outcome;
pub use traits::{ImageAnnotator, ObjectStore};
