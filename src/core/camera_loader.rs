// Copyright @yucwang 2026

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::error::CameraError;
use crate::core::lens::{ElementOrder, LensInterface, LensStack};
use crate::math::constants::{Float, Vector3f};

pub const DEFAULT_SENSOR_DIAGONAL: Float = 1.0;
pub const DEFAULT_FOCAL_DISTANCE: Float = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct OpticalSystem {
    pub sensor_diagonal: Float,
    pub stack: LensStack,
}

/// Thin-lens settings. Disabled unless the document enables them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DofSettings {
    pub enabled: bool,
    pub lens_radius: Float,
    pub focal_distance: Float,
}

impl Default for DofSettings {
    fn default() -> Self {
        Self { enabled: false, lens_radius: 0.0, focal_distance: DEFAULT_FOCAL_DISTANCE }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraDocument {
    pub name: Option<String>,
    pub optical_system: Option<OpticalSystem>,
    pub dof: DofSettings,
}

impl CameraDocument {
    /// Sensor diagonal and lens stack, or the degenerate empty stack (with a
    /// warning) when the document has no optical system.
    pub fn optical_system_or_empty(&self) -> OpticalSystem {
        match &self.optical_system {
            Some(system) => system.clone(),
            None => {
                log::warn!(
                    "No optical_system found for camera '{}'; every ray will be discarded.",
                    self.name.as_deref().unwrap_or("")
                );
                OpticalSystem { sensor_diagonal: DEFAULT_SENSOR_DIAGONAL, stack: LensStack::empty() }
            }
        }
    }
}

pub fn load_camera_document<P: AsRef<Path>>(path: P) -> Result<CameraDocument, CameraError> {
    let xml = fs::read_to_string(path.as_ref())?;
    log::info!("Loading camera parameters from: {}.", path.as_ref().display());
    parse_camera_str(&xml)
}

#[derive(Clone, Copy, PartialEq)]
enum TextField {
    EnableDof,
    LensRadius,
    Position,
    LookAt,
}

struct OpticalSystemBuilder {
    sensor_diagonal: Option<Float>,
    scale: Float,
    order: ElementOrder,
    lines: Vec<(i32, LensInterface)>,
}

impl OpticalSystemBuilder {
    fn build(self) -> OpticalSystem {
        let sensor_diagonal = match self.sensor_diagonal {
            Some(d) => d,
            None => {
                log::warn!("optical_system has no sensor_diagonal, using {}.", DEFAULT_SENSOR_DIAGONAL);
                DEFAULT_SENSOR_DIAGONAL
            }
        };
        OpticalSystem { sensor_diagonal, stack: LensStack::from_tagged(self.lines, self.order) }
    }
}

pub fn parse_camera_str(xml: &str) -> Result<CameraDocument, CameraError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut found_camera = false;
    let mut in_camera = false;
    let mut document = CameraDocument::default();
    let mut builder: Option<OpticalSystemBuilder> = None;
    let mut text_field: Option<TextField> = None;

    let mut enable_dof: Option<i32> = None;
    let mut lens_radius: Float = 0.0;
    let mut position: Option<Vector3f> = None;
    let mut look_at: Option<Vector3f> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        let self_closing = matches!(event, Event::Empty(_));
        match event {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) => {
                match e.name().as_ref() {
                    b"camera" => {
                        found_camera = true;
                        in_camera = true;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"name" {
                                document.name = Some(attr.unescape_value().unwrap_or_default().to_string());
                            }
                        }
                    }
                    b"optical_system" if in_camera => {
                        let mut system = OpticalSystemBuilder {
                            sensor_diagonal: None,
                            scale: 1.0,
                            order: ElementOrder::SensorToScene,
                            lines: Vec::new(),
                        };
                        for attr in e.attributes().flatten() {
                            let value = attr.unescape_value().unwrap_or_default();
                            match attr.key.as_ref() {
                                b"sensor_diagonal" => system.sensor_diagonal = Some(parse_float(&value)?),
                                b"scale" => system.scale = parse_float(&value)?,
                                b"order" => {
                                    if value.as_ref() == "scene_to_sensor" {
                                        system.order = ElementOrder::SceneToSensor;
                                    }
                                }
                                _ => {}
                            }
                        }
                        builder = Some(system);
                    }
                    b"line" => {
                        if let Some(system) = builder.as_mut() {
                            let line = parse_line(&e, system.scale, system.lines.len() as i32)?;
                            system.lines.push(line);
                        }
                    }
                    b"enable_dof" if in_camera => text_field = Some(TextField::EnableDof),
                    b"dof_lens_radius" if in_camera => text_field = Some(TextField::LensRadius),
                    b"position" if in_camera => text_field = Some(TextField::Position),
                    b"look_at" if in_camera => text_field = Some(TextField::LookAt),
                    _ => {}
                }
                if self_closing {
                    text_field = None;
                }
            }
            Event::Text(e) => {
                if let Some(field) = text_field {
                    let text = e.unescape()?;
                    let text = text.trim();
                    match field {
                        TextField::EnableDof => enable_dof = Some(parse_int(text)?),
                        TextField::LensRadius => lens_radius = parse_float(text)?,
                        TextField::Position => position = Some(parse_vec3(text)?),
                        TextField::LookAt => look_at = Some(parse_vec3(text)?),
                    }
                }
            }
            Event::End(e) => {
                match e.name().as_ref() {
                    b"camera" => in_camera = false,
                    b"optical_system" => {
                        if let Some(system) = builder.take() {
                            document.optical_system = Some(system.build());
                        }
                    }
                    _ => {}
                }
                text_field = None;
            }
            _ => {}
        }
        buf.clear();
    }

    if !found_camera {
        return Err(CameraError::Parse(String::from("no <camera> element in camera document")));
    }
    // An empty <optical_system/> never produces an End event.
    if let Some(system) = builder.take() {
        document.optical_system = Some(system.build());
    }

    if enable_dof.map_or(false, |v| v > 0) {
        document.dof.enabled = true;
        document.dof.lens_radius = lens_radius;
        match (position, look_at) {
            (Some(p), Some(t)) => document.dof.focal_distance = (p - t).norm(),
            _ => log::warn!(
                "enable_dof is set without position and look_at, using focal distance {}.",
                DEFAULT_FOCAL_DISTANCE
            ),
        }
    }

    Ok(document)
}

fn parse_line(
    e: &BytesStart,
    scale: Float,
    ordinal: i32,
) -> Result<(i32, LensInterface), CameraError> {
    let mut id = ordinal;
    let mut element = LensInterface::default();
    let mut semi_diameter: Option<Float> = None;
    let mut aperture_radius: Option<Float> = None;
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value().unwrap_or_default();
        match attr.key.as_ref() {
            b"id" => id = parse_int(&value)?,
            b"curvature_radius" => element.curvature_radius = scale * parse_float(&value)?,
            b"thickness" => element.thickness = scale * parse_float(&value)?,
            b"ior" => element.eta = parse_float(&value)?,
            b"semi_diameter" => semi_diameter = Some(parse_float(&value)?),
            b"aperture_radius" => aperture_radius = Some(parse_float(&value)?),
            _ => {}
        }
    }

    element.aperture_radius = match (semi_diameter, aperture_radius) {
        (Some(s), _) => scale * 2.0 * s,
        (None, Some(a)) => scale * a,
        (None, None) => {
            log::warn!("Lens line {} has no semi_diameter or aperture_radius; it will clip every ray.", id);
            0.0
        }
    };
    Ok((id, element))
}

fn parse_float(value: &str) -> Result<Float, CameraError> {
    value.trim().parse::<Float>().map_err(|_| CameraError::Parse(format!("invalid float: {}", value)))
}

fn parse_int(value: &str) -> Result<i32, CameraError> {
    value.trim().parse::<i32>().map_err(|_| CameraError::Parse(format!("invalid integer: {}", value)))
}

fn parse_vec3(value: &str) -> Result<Vector3f, CameraError> {
    let parts: Vec<&str> = value.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()).collect();
    if parts.len() != 3 {
        return Err(CameraError::Parse(format!("invalid vector: {}", value)));
    }
    Ok(Vector3f::new(parse_float(parts[0])?, parse_float(parts[1])?, parse_float(parts[2])?))
}
