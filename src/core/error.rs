// Copyright @yucwang 2026

use std::fmt;

#[derive(Debug)]
pub enum CameraError {
    Io(std::io::Error),
    Xml(quick_xml::Error),
    Parse(String),
    InvalidConfig(String),
    Image(image::ImageError),
    Exr(String),
    AlreadyFinished,
    NothingAccumulated,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Io(err) => write!(f, "io error: {}", err),
            CameraError::Xml(err) => write!(f, "camera document error: {}", err),
            CameraError::Parse(msg) => write!(f, "parse error: {}", msg),
            CameraError::InvalidConfig(msg) => write!(f, "invalid camera configuration: {}", msg),
            CameraError::Image(err) => write!(f, "image write error: {}", err),
            CameraError::Exr(msg) => write!(f, "exr write error: {}", msg),
            CameraError::AlreadyFinished => {
                write!(f, "rendering already finished, no contributions since the last finish")
            }
            CameraError::NothingAccumulated => write!(f, "no samples were accumulated"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::Io(err)
    }
}

impl From<quick_xml::Error> for CameraError {
    fn from(err: quick_xml::Error) -> Self {
        CameraError::Xml(err)
    }
}

impl From<image::ImageError> for CameraError {
    fn from(err: image::ImageError) -> Self {
        CameraError::Image(err)
    }
}
