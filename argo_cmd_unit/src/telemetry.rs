//! Telemetry caches and relay.
//!
//! Two halves:
//!
//! - [`TelemetryStore`] — last-known values received from the peer board,
//!   readable by any subsystem at any time. Zero until first receipt,
//!   overwritten on every receipt, never cleared. Each field has exactly
//!   one writer (the receive handler bound to its command identifier);
//!   readers may see any previously committed value (last-write-wins,
//!   no staleness alarm).
//! - Relay functions — stateless, called by an external scheduler. Each
//!   snapshots local actuator state, scales into the wire representation,
//!   and emits one outbound frame. No retries, no delivery confirmation.

use parking_lot::RwLock;

use argo_common::fixed::encode_deci;
use argo_common::protocol::{BROADCAST_ADDR, CmdId, GIMBAL_ADDR, HOST_ADDR};
use argo_common::wire::{ChassisInfo, GimbalInfo, PowerStatus, RobotState, ShooterHeat};

use crate::actuation::{ChassisDriver, GimbalDriver};
use crate::bus::BusTx;

/// Latched auto-aim override, in degrees.
///
/// Written by the control event loop when a gimbal-angle command arrives
/// while targeting is engaged; consumed by the external targeting
/// algorithm. Never cleared, only overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetingOverride {
    pub pitch_deg: f32,
    pub yaw_deg: f32,
    pub time_pc: u32,
}

/// Process-wide last-known telemetry state.
#[derive(Default)]
pub struct TelemetryStore {
    gimbal_info: RwLock<GimbalInfo>,
    chassis_power: RwLock<PowerStatus>,
    shooter_heat: RwLock<ShooterHeat>,
    robot_state: RwLock<RobotState>,
    targeting: RwLock<TargetingOverride>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Writers (one call site each) ──

    pub(crate) fn set_gimbal_info(&self, info: GimbalInfo) {
        *self.gimbal_info.write() = info;
    }

    pub(crate) fn set_chassis_power(&self, status: PowerStatus) {
        *self.chassis_power.write() = status;
    }

    pub(crate) fn set_shooter_heat(&self, heat: ShooterHeat) {
        *self.shooter_heat.write() = heat;
    }

    pub(crate) fn set_robot_state(&self, state: RobotState) {
        *self.robot_state.write() = state;
    }

    pub(crate) fn set_targeting_override(&self, ov: TargetingOverride) {
        *self.targeting.write() = ov;
    }

    // ── Read accessors (any subsystem) ──

    pub fn gimbal_info(&self) -> GimbalInfo {
        *self.gimbal_info.read()
    }

    pub fn chassis_power(&self) -> PowerStatus {
        *self.chassis_power.read()
    }

    pub fn shooter_heat(&self) -> ShooterHeat {
        *self.shooter_heat.read()
    }

    pub fn robot_state(&self) -> RobotState {
        *self.robot_state.read()
    }

    pub fn robot_level(&self) -> u8 {
        self.robot_state.read().robot_level
    }

    pub fn targeting_override(&self) -> TargetingOverride {
        *self.targeting.read()
    }
}

// ─── Relay Functions ────────────────────────────────────────────────

/// Broadcast a gimbal state snapshot (deci fixed-point).
///
/// The yaw encoder angle is forced to zero until the gimbal has found
/// its mechanical zero, so the chassis never steers against a garbage
/// reference.
pub fn push_gimbal_info(gimbal: &dyn GimbalDriver, bus: &dyn BusTx) {
    let s = gimbal.info();
    let mut info = GimbalInfo {
        mode: s.mode,
        pitch_ecd_angle: encode_deci(s.pitch_ecd_angle),
        pitch_gyro_angle: encode_deci(s.pitch_gyro_angle),
        pitch_rate: encode_deci(s.pitch_rate),
        yaw_ecd_angle: encode_deci(s.yaw_ecd_angle),
        yaw_gyro_angle: encode_deci(s.yaw_gyro_angle),
        yaw_rate: encode_deci(s.yaw_rate),
    };
    if !gimbal.is_initialized() {
        info.yaw_ecd_angle = 0;
    }
    bus.send(BROADCAST_ADDR, CmdId::PushGimbalInfo, &info.encode());
}

/// Send a chassis odometry snapshot to the host computer.
pub fn push_chassis_info(chassis: &dyn ChassisDriver, bus: &dyn BusTx) {
    let s = chassis.info();
    let info = ChassisInfo {
        angle_deg: encode_deci(s.angle_deg),
        gyro_angle: encode_deci(s.yaw_gyro_angle),
        gyro_palstance: encode_deci(s.yaw_gyro_rate),
        position_x_mm: s.position_x_mm,
        position_y_mm: s.position_y_mm,
        v_x_mm: s.v_x_mm,
        v_y_mm: s.v_y_mm,
    };
    bus.send(HOST_ADDR, CmdId::PushChassisInfo, &info.encode());
}

/// Mirror chassis power data to the gimbal board.
pub fn send_power_status(bus: &dyn BusTx, status: &PowerStatus) {
    bus.send(GIMBAL_ADDR, CmdId::ChassisPower, &status.encode());
}

/// Mirror shooter heat data to the gimbal board.
pub fn send_shooter_heat(bus: &dyn BusTx, heat: &ShooterHeat) {
    bus.send(GIMBAL_ADDR, CmdId::ShooterHeat, &heat.encode());
}

/// Mirror referee robot state to the gimbal board.
pub fn send_robot_state(bus: &dyn BusTx, state: &RobotState) {
    bus.send(GIMBAL_ADDR, CmdId::RobotState, &state.encode());
}

// ─── Tests ──────────────────────────────────────────────────────────
