//! Actuation subsystem seams.
//!
//! The physical chassis kinematics, gimbal servo control, and shooter
//! firing control live outside this unit; the control event loop drives
//! them through these traits, and the telemetry relay queries them for
//! snapshots. Implementations handle their own interior mutability, so
//! all methods take `&self` and none may block.

/// Shoot actuator command code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ShootCommand {
    #[default]
    Stop = 0,
    Single = 1,
    Continuous = 2,
}

impl ShootCommand {
    /// Decode the wire byte. Unknown codes degrade to `Stop`.
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Single,
            2 => Self::Continuous,
            _ => Self::Stop,
        }
    }
}

/// Chassis state at the moment of a telemetry snapshot, in engineering
/// units (degrees, deg/s, mm, mm/s).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChassisState {
    pub angle_deg: f32,
    pub yaw_gyro_angle: f32,
    pub yaw_gyro_rate: f32,
    pub position_x_mm: i32,
    pub position_y_mm: i32,
    pub v_x_mm: i16,
    pub v_y_mm: i16,
}

/// Gimbal state at the moment of a telemetry snapshot, in degrees and
/// deg/s.
#[derive(Debug, Clone, Copy, Default)]
pub struct GimbalState {
    pub mode: u8,
    pub pitch_ecd_angle: f32,
    pub pitch_gyro_angle: f32,
    pub pitch_rate: f32,
    pub yaw_ecd_angle: f32,
    pub yaw_gyro_angle: f32,
    pub yaw_rate: f32,
}

pub trait ChassisDriver: Send + Sync {
    /// Linear speed in mm/s, angular speed in deg/s.
    fn set_speed(&self, vx: f32, vy: f32, vw: f32);
    /// Linear acceleration in mm/s², angular in deg/s².
    fn set_acceleration(&self, ax: f32, ay: f32, wz: f32);
    /// Rotation center offset in mm.
    fn set_offset(&self, x: f32, y: f32);
    /// Chassis-to-gimbal reference angle in degrees.
    fn set_relative_angle(&self, yaw_deg: f32);
    fn info(&self) -> ChassisState;
}

pub trait GimbalDriver: Send + Sync {
    /// Absolute pitch angle in degrees.
    fn set_pitch_angle(&self, deg: f32);
    /// Absolute yaw angle in degrees.
    fn set_yaw_angle(&self, deg: f32);
    /// Kick off the mechanical zero-point adjustment routine.
    fn auto_adjust_start(&self);
    /// False until the gimbal has found its zero; telemetry reports a
    /// zero yaw encoder angle until then.
    fn is_initialized(&self) -> bool;
    fn info(&self) -> GimbalState;
}

pub trait ShooterDriver: Send + Sync {
    fn set_cmd(&self, cmd: ShootCommand, add_count: u8);
    /// Magazine turn frequency in rounds/s.
    fn set_turn_speed(&self, freq: u16);
    /// Friction wheel speed pair (raw PWM units).
    fn set_friction_speed(&self, left: u16, right: u16);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shoot_command_decode() {
        assert_eq!(ShootCommand::from_u8(0), ShootCommand::Stop);
        assert_eq!(ShootCommand::from_u8(1), ShootCommand::Single);
        assert_eq!(ShootCommand::from_u8(2), ShootCommand::Continuous);
        // Unknown codes are safe.
        assert_eq!(ShootCommand::from_u8(99), ShootCommand::Stop);
    }
}
