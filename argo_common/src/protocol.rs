//! Command identifiers and bus addresses.
//!
//! Every frame on the inter-board bus carries a `u16` command identifier.
//! Both boards share this identifier space; which identifiers a board
//! actually listens to is decided once at startup by its role.

// ─── Bus Addresses ──────────────────────────────────────────────────

/// Chassis board address.
pub const CHASSIS_ADDR: u8 = 0x01;
/// Gimbal/shooter board address.
pub const GIMBAL_ADDR: u8 = 0x02;
/// Onboard host computer (vision / targeting) address.
pub const HOST_ADDR: u8 = 0x03;
/// Broadcast address — every node on the bus receives the frame.
pub const BROADCAST_ADDR: u8 = 0xFF;

// ─── Command Identifiers ────────────────────────────────────────────

/// Wire-level command identifier.
///
/// Grouped by function: `0x01xx` chassis control, `0x02xx` gimbal/shooter
/// control, `0x03xx` telemetry, `0x04xx` passthrough traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CmdId {
    /// Chassis linear/angular speed target.
    SetChassisSpeed = 0x0101,
    /// Chassis speed target with explicit acceleration.
    SetChassisSpdAcc = 0x0102,
    /// Gimbal pitch/yaw angle (or rate-mode override).
    SetGimbalAngle = 0x0201,
    /// Friction wheel speed pair.
    SetFrictionSpeed = 0x0202,
    /// Shoot command, count, and turn frequency.
    SetShootFrequency = 0x0203,
    /// Trigger the gimbal auto-adjust routine (empty payload).
    GimbalAdjust = 0x0204,
    /// Gimbal state snapshot broadcast.
    PushGimbalInfo = 0x0301,
    /// Chassis odometry snapshot to the host computer.
    PushChassisInfo = 0x0302,
    /// Chassis power flags/current/voltage/buffer.
    ChassisPower = 0x0303,
    /// Shooter barrel heat pair.
    ShooterHeat = 0x0304,
    /// Robot level and hit points.
    RobotState = 0x0305,
    /// Referee-system data passthrough (embedded sub-identifier).
    StudentData = 0x0401,
    /// Raw RC frame forwarded from the chassis board to the gimbal board.
    RcDataForward = 0x0402,
}

impl CmdId {
    /// Decode a raw identifier. Unknown values return `None`; on a shared
    /// bus that is expected traffic, not a fault.
    pub const fn from_u16(raw: u16) -> Option<Self> {
        match raw {
            0x0101 => Some(Self::SetChassisSpeed),
            0x0102 => Some(Self::SetChassisSpdAcc),
            0x0201 => Some(Self::SetGimbalAngle),
            0x0202 => Some(Self::SetFrictionSpeed),
            0x0203 => Some(Self::SetShootFrequency),
            0x0204 => Some(Self::GimbalAdjust),
            0x0301 => Some(Self::PushGimbalInfo),
            0x0302 => Some(Self::PushChassisInfo),
            0x0303 => Some(Self::ChassisPower),
            0x0304 => Some(Self::ShooterHeat),
            0x0305 => Some(Self::RobotState),
            0x0401 => Some(Self::StudentData),
            0x0402 => Some(Self::RcDataForward),
            _ => None,
        }
    }

    /// Raw wire value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self as u16
    }
}
