/// One recorded trajectory sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the start of the recording
    pub time: f64,

    /// Position in metres
    pub pos_x: f64,
    pub pos_y: f64,

    /// Heading in radians
    pub heading: f64,

    /// Linear velocity in metres/second
    pub vel_x: f64,
    pub vel_y: f64,

    /// Angular velocity in radians/second
    pub angular_vel: f64,
}

impl Sample {
    /// Pose part of the sample
    pub fn pose(&self) -> Pose {
        Pose {
            x: self.pos_x,
            y: self.pos_y,
            heading: self.heading,
        }
    }

    /// Linear velocity part of the sample
    pub fn velocity(&self) -> Velocity {
        Velocity {
            x: self.vel_x,
            y: self.vel_y,
        }
    }
}

/// Robot pose on the field
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    /// Pose at the field origin facing +X
    pub const ORIGIN: Pose = Pose { x: 0.0, y: 0.0, heading: 0.0 };
}

/// Planar velocity vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    /// Magnitude in metres/second
    pub fn speed(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_splits_into_pose_and_velocity() {
        let sample = Sample {
            time: 1.5,
            pos_x: 1.0,
            pos_y: -2.0,
            heading: 0.5,
            vel_x: 3.0,
            vel_y: 4.0,
            angular_vel: 0.25,
        };

        assert_eq!(sample.pose(), Pose { x: 1.0, y: -2.0, heading: 0.5 });
        assert_eq!(sample.velocity(), Velocity { x: 3.0, y: 4.0 });
        assert_eq!(sample.velocity().speed(), 5.0);
    }

    #[test]
    fn test_default_pose_is_origin() {
        assert_eq!(Pose::default(), Pose::ORIGIN);
    }
}
