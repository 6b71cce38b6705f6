use serde::{Deserialize, Serialize};

/// Optional field overlays the user can switch on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayElement {
    Origin,
    Velocity,
    AngularVelocity,
    Trail,
}

impl DisplayElement {
    pub fn all() -> &'static [DisplayElement] {
        &[
            DisplayElement::Origin,
            DisplayElement::Velocity,
            DisplayElement::AngularVelocity,
            DisplayElement::Trail,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayElement::Origin => "Origin",
            DisplayElement::Velocity => "Velocity Indicator",
            DisplayElement::AngularVelocity => "Angular V Indicator",
            DisplayElement::Trail => "Trail",
        }
    }
}

/// Visibility of each overlay; read only by the field renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayFlags {
    pub origin: bool,
    pub velocity: bool,
    pub angular_velocity: bool,
    pub trail: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            origin: true,
            velocity: true,
            angular_velocity: true,
            trail: true,
        }
    }
}

impl DisplayFlags {
    fn slot(&mut self, element: DisplayElement) -> &mut bool {
        match element {
            DisplayElement::Origin => &mut self.origin,
            DisplayElement::Velocity => &mut self.velocity,
            DisplayElement::AngularVelocity => &mut self.angular_velocity,
            DisplayElement::Trail => &mut self.trail,
        }
    }

    pub fn is_enabled(&self, element: DisplayElement) -> bool {
        match element {
            DisplayElement::Origin => self.origin,
            DisplayElement::Velocity => self.velocity,
            DisplayElement::AngularVelocity => self.angular_velocity,
            DisplayElement::Trail => self.trail,
        }
    }

    pub fn set(&mut self, element: DisplayElement, enabled: bool) {
        *self.slot(element) = enabled;
    }

    pub fn toggle(&mut self, element: DisplayElement) {
        let slot = self.slot(element);
        *slot = !*slot;
    }
}
