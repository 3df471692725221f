mod decode;
mod letterbox;
mod model;
mod nms;
mod preprocess;
mod project;
mod rect;

pub use decode::{RawDetection, decode};
pub use letterbox::{FrameDimensions, LetterboxTransform};
pub use model::{COCO_LABELS, ModelDescriptor, TensorLayout};
pub use nms::{NmsParams, suppress};
pub use preprocess::{Preprocessor, prepare};
pub use project::{Detection, project};
pub use rect::Rect;
