use crate::error::GraphError;

/// Physical and cost parameters for one kind of structural bar.
///
/// Mirrors the designer-authored material sheet: mass scales with segment
/// length, costs are flat per segment, and `max_length` bounds how long a
/// single segment may be at commit time.
#[derive(Debug, Clone)]
pub struct BarMaterial {
    name: String,
    mass_per_meter: f64,
    max_length: f64,
    wood_cost: u32,
    metal_cost: u32,
}

impl BarMaterial {
    /// Creates a new material.
    ///
    /// # Errors
    ///
    /// Returns an error if `mass_per_meter` or `max_length` is not positive.
    pub fn new(
        name: impl Into<String>,
        mass_per_meter: f64,
        max_length: f64,
        wood_cost: u32,
        metal_cost: u32,
    ) -> Result<Self, GraphError> {
        if mass_per_meter <= 0.0 {
            return Err(GraphError::InvalidMaterial(
                "mass per meter must be positive".to_owned(),
            ));
        }
        if max_length <= 0.0 {
            return Err(GraphError::InvalidMaterial(
                "max length must be positive".to_owned(),
            ));
        }
        Ok(Self {
            name: name.into(),
            mass_per_meter,
            max_length,
            wood_cost,
            metal_cost,
        })
    }

    /// Display name of the material.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mass contributed by a segment of the given length.
    #[must_use]
    pub fn mass_of(&self, length: f64) -> f64 {
        self.mass_per_meter * length
    }

    /// Longest segment this material allows.
    #[must_use]
    pub fn max_length(&self) -> f64 {
        self.max_length
    }

    /// Returns `true` if a segment of the given length may be committed.
    #[must_use]
    pub fn allows_length(&self, length: f64) -> bool {
        length <= self.max_length
    }

    /// Wood cost per committed segment.
    #[must_use]
    pub fn wood_cost(&self) -> u32 {
        self.wood_cost
    }

    /// Metal cost per committed segment.
    #[must_use]
    pub fn metal_cost(&self) -> u32 {
        self.metal_cost
    }
}

impl Default for BarMaterial {
    /// Plain wooden plank: light, cheap, six units max span.
    fn default() -> Self {
        Self {
            name: "wood".to_owned(),
            mass_per_meter: 2.0,
            max_length: 6.0,
            wood_cost: 5,
            metal_cost: 0,
        }
    }
}

/// Aggregate resource cost of a built structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildCost {
    /// Total wood units.
    pub wood: u32,
    /// Total metal units.
    pub metal: u32,
}
