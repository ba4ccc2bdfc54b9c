//! Role bootstrap: the one place board topology exists.
//!
//! A board is either the chassis or the gimbal/shooter side of the bus.
//! The role is read once from config at startup and decides which command
//! identifiers get handlers and which input transport feeds the
//! safety/mode reads. Nothing else in the unit branches on role.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use argo_common::fixed::decode_deci;
use argo_common::protocol::CmdId;
use argo_common::wire::{
    ChassisSpdAcc, ChassisSpeed, FrictionSpeed, GimbalAngle, GimbalInfo, PowerStatus, RobotState,
    ShootNum, ShooterHeat,
};

use crate::actuation::{ChassisDriver, GimbalDriver};
use crate::bus::RefereeTx;
use crate::mailbox::CommandMailbox;
use crate::registry::CommandRegistry;
use crate::telemetry::TelemetryStore;

/// Static board role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardRole {
    Chassis,
    Gimbal,
}

/// Which transport backs the safety/mode input reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// Local UART RC receiver (chassis board).
    UartRc,
    /// RC frames forwarded over the bus (gimbal board).
    CanRc,
}

impl BoardRole {
    pub const fn input_source(self) -> InputSource {
        match self {
            Self::Chassis => InputSource::UartRc,
            Self::Gimbal => InputSource::CanRc,
        }
    }
}

/// Collaborators the receive handlers capture.
pub struct RoleWiring {
    pub mailbox: Arc<CommandMailbox>,
    pub telemetry: Arc<TelemetryStore>,
    pub chassis: Arc<dyn ChassisDriver>,
    pub gimbal: Arc<dyn GimbalDriver>,
    pub referee: Arc<dyn RefereeTx>,
}

/// Register the handlers relevant to `role`.
///
/// Every handler validates exact payload length via the wire decode and
/// drops malformed frames without touching its slot or cache.
pub fn register_role_handlers(registry: &mut CommandRegistry, role: BoardRole, wiring: &RoleWiring) {
    match role {
        BoardRole::Chassis => register_chassis_handlers(registry, wiring),
        BoardRole::Gimbal => register_gimbal_handlers(registry, wiring),
    }
    info!(?role, handlers = registry.len(), "role bootstrap complete");
}

fn register_chassis_handlers(registry: &mut CommandRegistry, wiring: &RoleWiring) {
    let referee = Arc::clone(&wiring.referee);
    registry.register(
        CmdId::StudentData,
        Box::new(move |buf| {
            // Leading u16 is the embedded referee sub-identifier.
            if buf.len() < 2 {
                return;
            }
            let cmd_id = u16::from_le_bytes([buf[0], buf[1]]);
            referee.transmit(cmd_id, &buf[2..]);
        }),
    );

    let chassis = Arc::clone(&wiring.chassis);
    let telemetry = Arc::clone(&wiring.telemetry);
    registry.register(
        CmdId::PushGimbalInfo,
        Box::new(move |buf| {
            let Ok(info) = GimbalInfo::decode(buf) else {
                return;
            };
            chassis.set_relative_angle(decode_deci(info.yaw_ecd_angle));
            telemetry.set_gimbal_info(info);
        }),
    );

    let mailbox = Arc::clone(&wiring.mailbox);
    registry.register(
        CmdId::SetChassisSpeed,
        Box::new(move |buf| {
            if let Ok(v) = ChassisSpeed::decode(buf) {
                mailbox.post_chassis_speed(v);
            }
        }),
    );

    let mailbox = Arc::clone(&wiring.mailbox);
    registry.register(
        CmdId::SetChassisSpdAcc,
        Box::new(move |buf| {
            if let Ok(v) = ChassisSpdAcc::decode(buf) {
                mailbox.post_chassis_spd_acc(v);
            }
        }),
    );
}

fn register_gimbal_handlers(registry: &mut CommandRegistry, wiring: &RoleWiring) {
    let mailbox = Arc::clone(&wiring.mailbox);
    registry.register(
        CmdId::SetGimbalAngle,
        Box::new(move |buf| {
            if let Ok(v) = GimbalAngle::decode(buf) {
                mailbox.post_gimbal_angle(v);
            }
        }),
    );

    let mailbox = Arc::clone(&wiring.mailbox);
    registry.register(
        CmdId::SetFrictionSpeed,
        Box::new(move |buf| {
            if let Ok(v) = FrictionSpeed::decode(buf) {
                mailbox.post_friction_speed(v);
            }
        }),
    );

    let mailbox = Arc::clone(&wiring.mailbox);
    registry.register(
        CmdId::SetShootFrequency,
        Box::new(move |buf| {
            if let Ok(v) = ShootNum::decode(buf) {
                mailbox.post_shoot(v);
            }
        }),
    );

    let gimbal = Arc::clone(&wiring.gimbal);
    registry.register(
        CmdId::GimbalAdjust,
        // Trigger-only command; payload carries nothing.
        Box::new(move |_buf| gimbal.auto_adjust_start()),
    );

    let telemetry = Arc::clone(&wiring.telemetry);
    registry.register(
        CmdId::ChassisPower,
        Box::new(move |buf| {
            if let Ok(v) = PowerStatus::decode(buf) {
                telemetry.set_chassis_power(v);
            }
        }),
    );

    let telemetry = Arc::clone(&wiring.telemetry);
    registry.register(
        CmdId::ShooterHeat,
        Box::new(move |buf| {
            if let Ok(v) = ShooterHeat::decode(buf) {
                telemetry.set_shooter_heat(v);
            }
        }),
    );

    let telemetry = Arc::clone(&wiring.telemetry);
    registry.register(
        CmdId::RobotState,
        Box::new(move |buf| {
            if let Ok(v) = RobotState::decode(buf) {
                telemetry.set_robot_state(v);
            }
        }),
    );
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuation::{ChassisState, GimbalState};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct NullChassis {
        relative_angles: Mutex<Vec<f32>>,
    }

    impl ChassisDriver for NullChassis {
        fn set_speed(&self, _: f32, _: f32, _: f32) {}
        fn set_acceleration(&self, _: f32, _: f32, _: f32) {}
        fn set_offset(&self, _: f32, _: f32) {}
        fn set_relative_angle(&self, yaw_deg: f32) {
            self.relative_angles.lock().push(yaw_deg);
        }
        fn info(&self) -> ChassisState {
            ChassisState::default()
        }
    }

    #[derive(Default)]
    struct NullGimbal {
        adjust_starts: Mutex<u32>,
    }

    impl GimbalDriver for NullGimbal {
        fn set_pitch_angle(&self, _: f32) {}
        fn set_yaw_angle(&self, _: f32) {}
        fn auto_adjust_start(&self) {
            *self.adjust_starts.lock() += 1;
        }
        fn is_initialized(&self) -> bool {
            true
        }
        fn info(&self) -> GimbalState {
            GimbalState::default()
        }
    }

    #[derive(Default)]
    struct NullReferee {
        sent: Mutex<Vec<(u16, Vec<u8>)>>,
    }

    impl RefereeTx for NullReferee {
        fn transmit(&self, cmd_id: u16, data: &[u8]) {
            self.sent.lock().push((cmd_id, data.to_vec()));
        }
    }

    struct Fixture {
        registry: CommandRegistry,
        mailbox: Arc<CommandMailbox>,
        telemetry: Arc<TelemetryStore>,
        chassis: Arc<NullChassis>,
        gimbal: Arc<NullGimbal>,
        referee: Arc<NullReferee>,
    }

    fn fixture(role: BoardRole) -> Fixture {
        let mailbox = Arc::new(CommandMailbox::new());
        let telemetry = Arc::new(TelemetryStore::new());
        let chassis = Arc::new(NullChassis::default());
        let gimbal = Arc::new(NullGimbal::default());
        let referee = Arc::new(NullReferee::default());
        let wiring = RoleWiring {
            mailbox: Arc::clone(&mailbox),
            telemetry: Arc::clone(&telemetry),
            chassis: chassis.clone() as Arc<dyn ChassisDriver>,
            gimbal: gimbal.clone() as Arc<dyn GimbalDriver>,
            referee: referee.clone() as Arc<dyn RefereeTx>,
        };
        let mut registry = CommandRegistry::new();
        register_role_handlers(&mut registry, role, &wiring);
        Fixture {
            registry,
            mailbox,
            telemetry,
            chassis,
            gimbal,
            referee,
        }
    }

    #[test]
    fn input_source_per_role() {
        assert_eq!(BoardRole::Chassis.input_source(), InputSource::UartRc);
        assert_eq!(BoardRole::Gimbal.input_source(), InputSource::CanRc);
    }

    #[test]
    fn chassis_role_registration_table() {
        let f = fixture(BoardRole::Chassis);
        assert!(f.registry.is_registered(CmdId::SetChassisSpeed));
        assert!(f.registry.is_registered(CmdId::SetChassisSpdAcc));
        assert!(f.registry.is_registered(CmdId::PushGimbalInfo));
        assert!(f.registry.is_registered(CmdId::StudentData));
        assert!(!f.registry.is_registered(CmdId::SetGimbalAngle));
        assert!(!f.registry.is_registered(CmdId::ChassisPower));
    }

    #[test]
    fn gimbal_role_registration_table() {
        let f = fixture(BoardRole::Gimbal);
        assert!(f.registry.is_registered(CmdId::SetGimbalAngle));
        assert!(f.registry.is_registered(CmdId::SetFrictionSpeed));
        assert!(f.registry.is_registered(CmdId::SetShootFrequency));
        assert!(f.registry.is_registered(CmdId::GimbalAdjust));
        assert!(f.registry.is_registered(CmdId::ChassisPower));
        assert!(f.registry.is_registered(CmdId::ShooterHeat));
        assert!(f.registry.is_registered(CmdId::RobotState));
        assert!(!f.registry.is_registered(CmdId::SetChassisSpeed));
    }

    #[test]
    fn malformed_length_leaves_slot_and_flag_untouched() {
        let f = fixture(BoardRole::Chassis);
        let good = ChassisSpeed {
            vx: 100,
            ..Default::default()
        }
        .encode();
        // One byte short and one byte long.
        f.registry
            .dispatch(CmdId::SetChassisSpeed.raw(), &good[..9]);
        let mut long = good.to_vec();
        long.push(0);
        f.registry.dispatch(CmdId::SetChassisSpeed.raw(), &long);
        assert!(f.mailbox.pending().is_empty());
        assert_eq!(f.mailbox.snapshot().chassis_speed, ChassisSpeed::default());
    }

    #[test]
    fn gimbal_info_updates_relative_angle_and_cache() {
        let f = fixture(BoardRole::Chassis);
        let info = GimbalInfo {
            yaw_ecd_angle: 123, // 12.3°
            ..Default::default()
        };
        f.registry
            .dispatch(CmdId::PushGimbalInfo.raw(), &info.encode());
        assert_eq!(*f.chassis.relative_angles.lock(), vec![12.3]);
        assert_eq!(f.telemetry.gimbal_info(), info);
    }

    #[test]
    fn student_data_forwards_sub_identifier() {
        let f = fixture(BoardRole::Chassis);
        f.registry
            .dispatch(CmdId::StudentData.raw(), &[0x01, 0x03, 0xAA, 0xBB]);
        assert_eq!(*f.referee.sent.lock(), vec![(0x0301, vec![0xAA, 0xBB])]);
        // Too short to carry the sub-identifier: dropped.
        f.registry.dispatch(CmdId::StudentData.raw(), &[0x01]);
        assert_eq!(f.referee.sent.lock().len(), 1);
    }

    #[test]
    fn gimbal_adjust_triggers_routine_without_mailbox_effect() {
        let f = fixture(BoardRole::Gimbal);
        f.registry.dispatch(CmdId::GimbalAdjust.raw(), &[]);
        assert_eq!(*f.gimbal.adjust_starts.lock(), 1);
        assert!(f.mailbox.pending().is_empty());
    }

    #[test]
    fn telemetry_callbacks_cache_last_value() {
        let f = fixture(BoardRole::Gimbal);
        let heat = ShooterHeat {
            heat0: 120,
            heat1: 40,
        };
        f.registry.dispatch(CmdId::ShooterHeat.raw(), &heat.encode());
        assert_eq!(f.telemetry.shooter_heat(), heat);

        let state = RobotState {
            robot_id: 3,
            robot_level: 2,
            remain_hp: 350,
        };
        f.registry.dispatch(CmdId::RobotState.raw(), &state.encode());
        assert_eq!(f.telemetry.robot_level(), 2);
    }
}
