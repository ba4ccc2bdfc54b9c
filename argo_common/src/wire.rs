//! Fixed-layout payload records.
//!
//! Every record has a `WIRE_SIZE`, an `encode()` producing exactly that
//! many little-endian bytes, and a `decode()` that fails on any length
//! mismatch without partial effect. A truncated or oversized frame must
//! never half-update a mailbox slot, so length is checked before any
//! field is read.

use static_assertions::const_assert_eq;
use thiserror::Error;

/// Wire decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WireError {
    /// Payload length does not match the record's fixed layout.
    #[error("payload length {got}, expected {expected}")]
    Length { expected: usize, got: usize },
}

#[inline]
fn check_len(buf: &[u8], expected: usize) -> Result<(), WireError> {
    if buf.len() != expected {
        return Err(WireError::Length {
            expected,
            got: buf.len(),
        });
    }
    Ok(())
}

#[inline]
fn i16_at(buf: &[u8], i: usize) -> i16 {
    i16::from_le_bytes([buf[i], buf[i + 1]])
}

#[inline]
fn u16_at(buf: &[u8], i: usize) -> u16 {
    u16::from_le_bytes([buf[i], buf[i + 1]])
}

#[inline]
fn i32_at(buf: &[u8], i: usize) -> i32 {
    i32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]])
}

#[inline]
fn u32_at(buf: &[u8], i: usize) -> u32 {
    u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]])
}

#[inline]
fn f32_at(buf: &[u8], i: usize) -> f32 {
    f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]])
}

// ─── Chassis Commands ───────────────────────────────────────────────

/// Chassis speed target.
///
/// `vx`/`vy` in mm/s, `vw` in deci-deg/s, rotation center offsets in mm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChassisSpeed {
    pub vx: i16,
    pub vy: i16,
    pub vw: i16,
    pub rotate_x_offset: i16,
    pub rotate_y_offset: i16,
}

impl ChassisSpeed {
    pub const WIRE_SIZE: usize = 10;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0..2].copy_from_slice(&self.vx.to_le_bytes());
        b[2..4].copy_from_slice(&self.vy.to_le_bytes());
        b[4..6].copy_from_slice(&self.vw.to_le_bytes());
        b[6..8].copy_from_slice(&self.rotate_x_offset.to_le_bytes());
        b[8..10].copy_from_slice(&self.rotate_y_offset.to_le_bytes());
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            vx: i16_at(buf, 0),
            vy: i16_at(buf, 2),
            vw: i16_at(buf, 4),
            rotate_x_offset: i16_at(buf, 6),
            rotate_y_offset: i16_at(buf, 8),
        })
    }
}

/// Chassis speed target with explicit acceleration.
///
/// Same units as [`ChassisSpeed`]; `ax`/`ay` in mm/s², `wz` in deci-deg/s².
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChassisSpdAcc {
    pub vx: i16,
    pub vy: i16,
    pub vw: i16,
    pub ax: i16,
    pub ay: i16,
    pub wz: i16,
    pub rotate_x_offset: i16,
    pub rotate_y_offset: i16,
}

impl ChassisSpdAcc {
    pub const WIRE_SIZE: usize = 16;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        for (i, v) in [
            self.vx,
            self.vy,
            self.vw,
            self.ax,
            self.ay,
            self.wz,
            self.rotate_x_offset,
            self.rotate_y_offset,
        ]
        .into_iter()
        .enumerate()
        {
            b[i * 2..i * 2 + 2].copy_from_slice(&v.to_le_bytes());
        }
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            vx: i16_at(buf, 0),
            vy: i16_at(buf, 2),
            vw: i16_at(buf, 4),
            ax: i16_at(buf, 6),
            ay: i16_at(buf, 8),
            wz: i16_at(buf, 10),
            rotate_x_offset: i16_at(buf, 12),
            rotate_y_offset: i16_at(buf, 14),
        })
    }
}

// ─── Gimbal / Shooter Commands ──────────────────────────────────────

/// Gimbal angle command.
///
/// `pitch`/`yaw` in centi-deg. The control byte selects, per axis,
/// between absolute angle mode (bit clear) and rate/override mode
/// (bit set). `time_pc` is the sender's frame timestamp, carried through
/// to the targeting override latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GimbalAngle {
    pub ctrl: u8,
    pub pitch: i16,
    pub yaw: i16,
    pub time_pc: u32,
}

impl GimbalAngle {
    pub const WIRE_SIZE: usize = 9;

    /// Control bit: pitch axis in rate/override mode.
    pub const CTRL_PITCH_RATE: u8 = 1 << 0;
    /// Control bit: yaw axis in rate/override mode.
    pub const CTRL_YAW_RATE: u8 = 1 << 1;

    #[inline]
    pub const fn pitch_rate_mode(&self) -> bool {
        self.ctrl & Self::CTRL_PITCH_RATE != 0
    }

    #[inline]
    pub const fn yaw_rate_mode(&self) -> bool {
        self.ctrl & Self::CTRL_YAW_RATE != 0
    }

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0] = self.ctrl;
        b[1..3].copy_from_slice(&self.pitch.to_le_bytes());
        b[3..5].copy_from_slice(&self.yaw.to_le_bytes());
        b[5..9].copy_from_slice(&self.time_pc.to_le_bytes());
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            ctrl: buf[0],
            pitch: i16_at(buf, 1),
            yaw: i16_at(buf, 3),
            time_pc: u32_at(buf, 5),
        })
    }
}

/// Friction wheel speed pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrictionSpeed {
    pub left: u16,
    pub right: u16,
}

impl FrictionSpeed {
    pub const WIRE_SIZE: usize = 4;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0..2].copy_from_slice(&self.left.to_le_bytes());
        b[2..4].copy_from_slice(&self.right.to_le_bytes());
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            left: u16_at(buf, 0),
            right: u16_at(buf, 2),
        })
    }
}

/// Shoot command: action code, additional round count, turn frequency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShootNum {
    pub shoot_cmd: u8,
    pub shoot_add_num: u8,
    pub shoot_freq: u16,
}

impl ShootNum {
    pub const WIRE_SIZE: usize = 4;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0] = self.shoot_cmd;
        b[1] = self.shoot_add_num;
        b[2..4].copy_from_slice(&self.shoot_freq.to_le_bytes());
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            shoot_cmd: buf[0],
            shoot_add_num: buf[1],
            shoot_freq: u16_at(buf, 2),
        })
    }
}

// ─── Telemetry Snapshots ────────────────────────────────────────────

/// Gimbal state snapshot. Angles and rates in deci units (×10).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GimbalInfo {
    pub mode: u8,
    pub pitch_ecd_angle: i16,
    pub pitch_gyro_angle: i16,
    pub pitch_rate: i16,
    pub yaw_ecd_angle: i16,
    pub yaw_gyro_angle: i16,
    pub yaw_rate: i16,
}

impl GimbalInfo {
    pub const WIRE_SIZE: usize = 13;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0] = self.mode;
        for (i, v) in [
            self.pitch_ecd_angle,
            self.pitch_gyro_angle,
            self.pitch_rate,
            self.yaw_ecd_angle,
            self.yaw_gyro_angle,
            self.yaw_rate,
        ]
        .into_iter()
        .enumerate()
        {
            b[1 + i * 2..3 + i * 2].copy_from_slice(&v.to_le_bytes());
        }
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            mode: buf[0],
            pitch_ecd_angle: i16_at(buf, 1),
            pitch_gyro_angle: i16_at(buf, 3),
            pitch_rate: i16_at(buf, 5),
            yaw_ecd_angle: i16_at(buf, 7),
            yaw_gyro_angle: i16_at(buf, 9),
            yaw_rate: i16_at(buf, 11),
        })
    }
}

/// Chassis odometry snapshot. Angles in deci-deg, positions in mm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChassisInfo {
    pub angle_deg: i16,
    pub gyro_angle: i16,
    pub gyro_palstance: i16,
    pub position_x_mm: i32,
    pub position_y_mm: i32,
    pub v_x_mm: i16,
    pub v_y_mm: i16,
}

impl ChassisInfo {
    pub const WIRE_SIZE: usize = 18;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0..2].copy_from_slice(&self.angle_deg.to_le_bytes());
        b[2..4].copy_from_slice(&self.gyro_angle.to_le_bytes());
        b[4..6].copy_from_slice(&self.gyro_palstance.to_le_bytes());
        b[6..10].copy_from_slice(&self.position_x_mm.to_le_bytes());
        b[10..14].copy_from_slice(&self.position_y_mm.to_le_bytes());
        b[14..16].copy_from_slice(&self.v_x_mm.to_le_bytes());
        b[16..18].copy_from_slice(&self.v_y_mm.to_le_bytes());
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            angle_deg: i16_at(buf, 0),
            gyro_angle: i16_at(buf, 2),
            gyro_palstance: i16_at(buf, 4),
            position_x_mm: i32_at(buf, 6),
            position_y_mm: i32_at(buf, 10),
            v_x_mm: i16_at(buf, 14),
            v_y_mm: i16_at(buf, 16),
        })
    }
}

/// Chassis power status: limit flags plus raw measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerStatus {
    pub current_flag: u8,
    pub voltage_flag: u8,
    pub current: f32,
    pub voltage: f32,
    pub buffer: f32,
}

impl PowerStatus {
    pub const WIRE_SIZE: usize = 14;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0] = self.current_flag;
        b[1] = self.voltage_flag;
        b[2..6].copy_from_slice(&self.current.to_le_bytes());
        b[6..10].copy_from_slice(&self.voltage.to_le_bytes());
        b[10..14].copy_from_slice(&self.buffer.to_le_bytes());
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            current_flag: buf[0],
            voltage_flag: buf[1],
            current: f32_at(buf, 2),
            voltage: f32_at(buf, 6),
            buffer: f32_at(buf, 10),
        })
    }
}

/// Shooter barrel heat pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShooterHeat {
    pub heat0: u16,
    pub heat1: u16,
}

impl ShooterHeat {
    pub const WIRE_SIZE: usize = 4;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0..2].copy_from_slice(&self.heat0.to_le_bytes());
        b[2..4].copy_from_slice(&self.heat1.to_le_bytes());
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            heat0: u16_at(buf, 0),
            heat1: u16_at(buf, 2),
        })
    }
}

/// Robot state mirror from the referee system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RobotState {
    pub robot_id: u8,
    pub robot_level: u8,
    pub remain_hp: u16,
}

impl RobotState {
    pub const WIRE_SIZE: usize = 4;

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut b = [0u8; Self::WIRE_SIZE];
        b[0] = self.robot_id;
        b[1] = self.robot_level;
        b[2..4].copy_from_slice(&self.remain_hp.to_le_bytes());
        b
    }

    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        check_len(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            robot_id: buf[0],
            robot_level: buf[1],
            remain_hp: u16_at(buf, 2),
        })
    }
}

// ─── Layout Checks ──────────────────────────────────────────────────

const_assert_eq!(ChassisSpeed::WIRE_SIZE, 10);
const_assert_eq!(ChassisSpdAcc::WIRE_SIZE, 16);
const_assert_eq!(GimbalAngle::WIRE_SIZE, 9);
const_assert_eq!(FrictionSpeed::WIRE_SIZE, 4);
const_assert_eq!(ShootNum::WIRE_SIZE, 4);
const_assert_eq!(GimbalInfo::WIRE_SIZE, 13);
const_assert_eq!(ChassisInfo::WIRE_SIZE, 18);
const_assert_eq!(PowerStatus::WIRE_SIZE, 14);
const_assert_eq!(ShooterHeat::WIRE_SIZE, 4);
const_assert_eq!(RobotState::WIRE_SIZE, 4);

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chassis_speed_round_trip() {
        let v = ChassisSpeed {
            vx: 1200,
            vy: -300,
            vw: 55,
            rotate_x_offset: 10,
            rotate_y_offset: -10,
        };
        assert_eq!(ChassisSpeed::decode(&v.encode()), Ok(v));
    }

    #[test]
    fn gimbal_angle_layout_and_ctrl_bits() {
        let v = GimbalAngle {
            ctrl: GimbalAngle::CTRL_YAW_RATE,
            pitch: 450,
            yaw: -1200,
            time_pc: 0xDEAD_BEEF,
        };
        let buf = v.encode();
        assert_eq!(buf.len(), 9);
        let back = GimbalAngle::decode(&buf).unwrap();
        assert!(!back.pitch_rate_mode());
        assert!(back.yaw_rate_mode());
        assert_eq!(back.pitch, 450);
        assert_eq!(back.time_pc, 0xDEAD_BEEF);
    }

    #[test]
    fn decode_rejects_short_and_long() {
        let good = ChassisSpeed::default().encode();
        assert!(ChassisSpeed::decode(&good[..9]).is_err());
        let mut long = good.to_vec();
        long.push(0);
        assert_eq!(
            ChassisSpeed::decode(&long),
            Err(WireError::Length {
                expected: 10,
                got: 11
            })
        );
        assert!(GimbalAngle::decode(&[]).is_err());
    }

    #[test]
    fn power_status_round_trip() {
        let v = PowerStatus {
            current_flag: 1,
            voltage_flag: 0,
            current: 7.25,
            voltage: 23.9,
            buffer: 58.0,
        };
        assert_eq!(PowerStatus::decode(&v.encode()), Ok(v));
    }

    #[test]
    fn chassis_info_mixed_widths() {
        let v = ChassisInfo {
            angle_deg: 123,
            gyro_angle: -45,
            gyro_palstance: 7,
            position_x_mm: 1_000_000,
            position_y_mm: -2_000_000,
            v_x_mm: 300,
            v_y_mm: -300,
        };
        assert_eq!(ChassisInfo::decode(&v.encode()), Ok(v));
    }

    #[test]
    fn small_records_round_trip() {
        let f = FrictionSpeed {
            left: 1240,
            right: 1240,
        };
        assert_eq!(FrictionSpeed::decode(&f.encode()), Ok(f));

        let s = ShootNum {
            shoot_cmd: 2,
            shoot_add_num: 3,
            shoot_freq: 8,
        };
        assert_eq!(ShootNum::decode(&s.encode()), Ok(s));

        let h = ShooterHeat {
            heat0: 120,
            heat1: 35,
        };
        assert_eq!(ShooterHeat::decode(&h.encode()), Ok(h));

        let r = RobotState {
            robot_id: 3,
            robot_level: 2,
            remain_hp: 400,
        };
        assert_eq!(RobotState::decode(&r.encode()), Ok(r));
    }
}
