// Copyright @yucwang 2026

use crate::math::constants::Float;

/// One optical surface. A zero curvature radius marks a flat aperture stop.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LensInterface {
    pub curvature_radius: Float,
    /// Axial distance from the previous interface on the sensor side
    /// (for index 0, from the film plane).
    pub thickness: Float,
    /// Index of refraction of the medium this interface bounds. 0 means air.
    pub eta: Float,
    pub aperture_radius: Float,
}

impl LensInterface {
    pub fn new(curvature_radius: Float, thickness: Float, eta: Float, aperture_radius: Float) -> Self {
        Self { curvature_radius, thickness, eta, aperture_radius }
    }

    pub fn stop(thickness: Float, aperture_radius: Float) -> Self {
        Self::new(0.0, thickness, 0.0, aperture_radius)
    }

    pub fn is_stop(&self) -> bool {
        self.curvature_radius == 0.0
    }

    /// Refractive index with the unspecified value resolved to vacuum.
    pub fn medium_eta(&self) -> Float {
        if self.eta == 0.0 { 1.0 } else { self.eta }
    }
}

/// Storage direction of the lines in a lens table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOrder {
    SensorToScene,
    SceneToSensor,
}

/// Immutable ordered lens stack. Index 0 is the rear element, nearest the film.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LensStack {
    interfaces: Vec<LensInterface>,
}

impl LensStack {
    pub fn new(interfaces: Vec<LensInterface>) -> Self {
        Self { interfaces }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from table lines tagged with ids. Lines are stably sorted by id so
    /// that storage index 0 ends up on the sensor side.
    pub fn from_tagged(mut lines: Vec<(i32, LensInterface)>, order: ElementOrder) -> Self {
        match order {
            ElementOrder::SceneToSensor => lines.sort_by(|a, b| b.0.cmp(&a.0)),
            ElementOrder::SensorToScene => lines.sort_by(|a, b| a.0.cmp(&b.0)),
        }
        Self::new(lines.into_iter().map(|(_, e)| e).collect())
    }

    pub fn interfaces(&self) -> &[LensInterface] {
        &self.interfaces
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Axial distance from the film to the rear vertex; 0 for an empty stack.
    pub fn rear_z(&self) -> Float {
        self.interfaces.first().map_or(0.0, |e| e.thickness)
    }

    pub fn rear_radius(&self) -> Float {
        self.interfaces.first().map_or(0.0, |e| e.aperture_radius)
    }

    /// Axial distance from the film to the front element.
    pub fn front_z(&self) -> Float {
        self.interfaces.iter().map(|e| e.thickness).sum()
    }

    pub fn describe(&self) -> String {
        let mut s = format!(
            "LensStack: {} interfaces, rear z = {}, rear radius = {}, front z = {}",
            self.len(), self.rear_z(), self.rear_radius(), self.front_z()
        );
        for (i, e) in self.interfaces.iter().enumerate() {
            s.push_str(&format!(
                "\n  [{}] {} r = {} t = {} eta = {} aperture = {}",
                i,
                if e.is_stop() { "stop  " } else { "sphere" },
                e.curvature_radius, e.thickness, e.eta, e.aperture_radius
            ));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rear_and_front() {
        let stack = LensStack::new(vec![
            LensInterface::stop(1.0, 2.0),
            LensInterface::new(5.0, 2.0, 1.5, 3.0),
        ]);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.rear_z(), 1.0);
        assert_eq!(stack.rear_radius(), 2.0);
        assert_eq!(stack.front_z(), 3.0);
        assert!(stack.interfaces()[0].is_stop());
        assert_eq!(stack.interfaces()[0].medium_eta(), 1.0);
        assert_eq!(stack.interfaces()[1].medium_eta(), 1.5);
    }

    #[test]
    fn test_empty_stack_is_degenerate() {
        let stack = LensStack::empty();
        assert!(stack.is_empty());
        assert_eq!(stack.rear_z(), 0.0);
        assert_eq!(stack.rear_radius(), 0.0);
    }

    #[test]
    fn test_from_tagged_orders() {
        let a = LensInterface::new(10.0, 1.0, 1.5, 4.0);
        let b = LensInterface::stop(2.0, 3.0);
        let c = LensInterface::new(-8.0, 3.0, 1.0, 5.0);
        let lines = vec![(0, a), (1, b), (2, c)];

        let forward = LensStack::from_tagged(lines.clone(), ElementOrder::SensorToScene);
        assert_eq!(forward.interfaces(), &[a, b, c]);

        let reversed = LensStack::from_tagged(lines, ElementOrder::SceneToSensor);
        assert_eq!(reversed.interfaces(), &[c, b, a]);
        assert_eq!(reversed.rear_z(), 3.0);
    }
}
