use crate::error::SimulationError;
use glam::Vec3;

/// Result of resolving one coordinate against the box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisClamp {
    pub value: f32,
    pub crossed_low: bool,
    pub crossed_high: bool,
}

impl AxisClamp {
    pub fn crossed(&self) -> bool {
        self.crossed_low || self.crossed_high
    }
}

/// Axis-aligned box bounding the simulation domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryVolume {
    origin: Vec3,
    bound: Vec3,
}

impl BoundaryVolume {
    /// Build a box from its low corner `origin` and high corner `bound`.
    ///
    /// Infinite components are accepted and disable collision on that side.
    pub fn new(origin: Vec3, bound: Vec3) -> Result<Self, SimulationError> {
        if origin.is_nan() || bound.is_nan() {
            return Err(SimulationError::invalid(format!(
                "boundary has NaN components: origin {} bound {}",
                origin, bound
            )));
        }
        for axis in 0..3 {
            if origin[axis] > bound[axis] {
                return Err(SimulationError::invalid(format!(
                    "boundary origin exceeds bound on axis {}: {} > {}",
                    axis, origin[axis], bound[axis]
                )));
            }
        }
        Ok(Self { origin, bound })
    }

    /// A volume with no walls
    pub fn unbounded() -> Self {
        Self {
            origin: Vec3::NEG_INFINITY,
            bound: Vec3::INFINITY,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn bound(&self) -> Vec3 {
        self.bound
    }

    pub fn extent(&self) -> Vec3 {
        self.bound - self.origin
    }

    pub fn center(&self) -> Vec3 {
        (self.origin + self.bound) * 0.5
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.origin).all() && point.cmple(self.bound).all()
    }

    /// Clamp `value` into the box range on `axis`, reporting which face was crossed
    pub fn clamp_axis(&self, axis: usize, value: f32) -> AxisClamp {
        let (low, high) = (self.origin[axis], self.bound[axis]);
        if value < low {
            AxisClamp {
                value: low,
                crossed_low: true,
                crossed_high: false,
            }
        } else if value > high {
            AxisClamp {
                value: high,
                crossed_low: false,
                crossed_high: true,
            }
        } else {
            AxisClamp {
                value,
                crossed_low: false,
                crossed_high: false,
            }
        }
    }

    /// Mirror `value` back across the face it went through.
    ///
    /// When the overshoot is larger than the box is wide the mirrored value
    /// would land past the opposite face, so it is clamped into range.
    pub fn reflect_axis(&self, axis: usize, value: f32) -> AxisClamp {
        let (low, high) = (self.origin[axis], self.bound[axis]);
        let clamp = self.clamp_axis(axis, value);
        let mirrored = if clamp.crossed_low {
            low + (low - value)
        } else if clamp.crossed_high {
            high - (value - high)
        } else {
            return clamp;
        };
        AxisClamp {
            value: mirrored.clamp(low, high),
            ..clamp
        }
    }
}

impl Default for BoundaryVolume {
    /// The 5 x 5 x 5 box resting on the ground plane
    fn default() -> Self {
        Self {
            origin: Vec3::new(-2.5, 0.0, -2.5),
            bound: Vec3::new(2.5, 5.0, 2.5),
        }
    }
}
