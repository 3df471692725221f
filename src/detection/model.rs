//! Model input/output contract.

use serde::Deserialize;

use crate::detection::FrameDimensions;
use crate::error::{PipelineError, Result};

/// COCO class names (80 classes), the label set of the stock YOLOv8 models.
pub const COCO_LABELS: &[&str] = &[
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat",
    "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack",
    "umbrella", "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball",
    "kite", "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket",
    "bottle", "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple",
    "sandwich", "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair",
    "couch", "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator",
    "book", "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// Memory layout of the input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, height, width, 3]`
    #[default]
    Nhwc,
    /// `[1, 3, height, width]`
    Nchw,
}

impl TensorLayout {
    pub fn shape(&self, dims: FrameDimensions) -> [usize; 4] {
        let (h, w) = (dims.height as usize, dims.width as usize);
        match self {
            Self::Nhwc => [1, h, w, 3],
            Self::Nchw => [1, 3, h, w],
        }
    }
}

/// Input size, output layout and labels of a loaded model.
///
/// Immutable for the lifetime of an inference session.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    input_dims: FrameDimensions,
    labels: Vec<String>,
    layout: TensorLayout,
}

impl ModelDescriptor {
    pub fn new(input_dims: FrameDimensions, labels: Vec<String>) -> Result<Self> {
        if input_dims.is_empty() {
            return Err(PipelineError::InvalidDimensions {
                width: input_dims.width,
                height: input_dims.height,
            });
        }
        if labels.is_empty() {
            return Err(PipelineError::InvalidDescriptor(
                "a model needs at least one label".to_string(),
            ));
        }
        Ok(Self {
            input_dims,
            labels,
            layout: TensorLayout::default(),
        })
    }

    /// 640x640 YOLOv8 trained on COCO.
    pub fn yolov8_coco() -> Self {
        Self {
            input_dims: FrameDimensions::new(640, 640),
            labels: COCO_LABELS.iter().map(|l| l.to_string()).collect(),
            layout: TensorLayout::Nhwc,
        }
    }

    pub fn with_layout(mut self, layout: TensorLayout) -> Self {
        self.layout = layout;
        self
    }

    #[inline]
    pub fn input_dims(&self) -> FrameDimensions {
        self.input_dims
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[inline]
    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Shape of the input tensor the network expects.
    pub fn input_shape(&self) -> [usize; 4] {
        self.layout.shape(self.input_dims)
    }

    /// Rows per candidate in the network output: four box values plus class scores.
    pub fn output_rows(&self) -> usize {
        4 + self.num_classes()
    }
}
