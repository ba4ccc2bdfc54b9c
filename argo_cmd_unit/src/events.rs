//! Control event loop: the real-time consumer of the command mailbox.
//!
//! Tick-driven state machine:
//!
//! - **Disabled** — the hardware disable switch is engaged. The whole
//!   mailbox is cleared and the loop idles for a short poll interval, so
//!   re-enabling never replays a command from before the disable.
//! - **Awaiting** — bounded wait on the mailbox pending flags.
//! - **Applying** — every flag drained at wake is applied exactly once,
//!   in fixed priority order: chassis-speed, chassis-spd-acc,
//!   gimbal-angle, shoot, friction. Speed and acceleration for the same
//!   actuator must not be applied out of order within one tick.
//! - **Fail-safe** — timeout with nothing pending (bus silence): command
//!   zero velocity, zero acceleration, and shoot-stop rather than holding
//!   the last command indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, trace};

use argo_common::fixed::decode_centi;
use argo_common::wire::GimbalAngle;

use crate::actuation::{ChassisDriver, GimbalDriver, ShootCommand, ShooterDriver};
use crate::input::ControlInput;
use crate::mailbox::{CommandMailbox, MailboxSnapshot, Pending};
use crate::telemetry::{TargetingOverride, TelemetryStore};

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Disable switch engaged; mailbox cleared.
    Disabled,
    /// At least one pending command applied (the drained set).
    Applied(Pending),
    /// Bus silence; safe-stop commands issued.
    FailSafe,
}

pub struct ControlEvents {
    mailbox: Arc<CommandMailbox>,
    telemetry: Arc<TelemetryStore>,
    chassis: Arc<dyn ChassisDriver>,
    gimbal: Arc<dyn GimbalDriver>,
    shooter: Arc<dyn ShooterDriver>,
    input: Arc<dyn ControlInput>,
    silence_timeout: Duration,
    disabled_poll: Duration,
}

impl ControlEvents {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mailbox: Arc<CommandMailbox>,
        telemetry: Arc<TelemetryStore>,
        chassis: Arc<dyn ChassisDriver>,
        gimbal: Arc<dyn GimbalDriver>,
        shooter: Arc<dyn ShooterDriver>,
        input: Arc<dyn ControlInput>,
        silence_timeout: Duration,
        disabled_poll: Duration,
    ) -> Self {
        Self {
            mailbox,
            telemetry,
            chassis,
            gimbal,
            shooter,
            input,
            silence_timeout,
            disabled_poll,
        }
    }

    /// Run forever. The bounded mailbox wait paces enabled iterations;
    /// the disabled branch sleeps its own poll interval.
    pub fn run(&self) {
        info!(
            silence_timeout_ms = self.silence_timeout.as_millis() as u64,
            "control event loop running"
        );
        loop {
            match self.tick() {
                TickOutcome::Disabled => std::thread::sleep(self.disabled_poll),
                TickOutcome::Applied(flags) => trace!(?flags, "commands applied"),
                TickOutcome::FailSafe => debug!("bus silence, safe stop issued"),
            }
        }
    }

    /// One loop iteration. Split out from [`run`] so the state machine
    /// is drivable from tests without threads.
    pub fn tick(&self) -> TickOutcome {
        if self.input.disable_engaged() {
            self.mailbox.clear_all();
            return TickOutcome::Disabled;
        }

        match self.mailbox.wait_pending(self.silence_timeout) {
            Some(snap) => {
                self.apply(&snap);
                TickOutcome::Applied(snap.pending)
            }
            None => {
                self.fail_safe();
                TickOutcome::FailSafe
            }
        }
    }

    /// Apply every drained flag in fixed priority order, each at most once.
    fn apply(&self, snap: &MailboxSnapshot) {
        if snap.pending.contains(Pending::CHASSIS_SPEED) {
            let v = &snap.chassis_speed;
            self.chassis
                .set_offset(v.rotate_x_offset as f32, v.rotate_y_offset as f32);
            self.chassis.set_acceleration(0.0, 0.0, 0.0);
            self.chassis
                .set_speed(v.vx as f32, v.vy as f32, v.vw as f32 / 10.0);
        }

        if snap.pending.contains(Pending::CHASSIS_ACC) {
            let v = &snap.chassis_spd_acc;
            self.chassis
                .set_offset(v.rotate_x_offset as f32, v.rotate_y_offset as f32);
            self.chassis
                .set_acceleration(v.ax as f32, v.ay as f32, v.wz as f32 / 10.0);
            self.chassis
                .set_speed(v.vx as f32, v.vy as f32, v.vw as f32 / 10.0);
        }

        if snap.pending.contains(Pending::GIMBAL_ANGLE) {
            self.apply_gimbal(&snap.gimbal_angle);
        }

        if snap.pending.contains(Pending::SHOOT) {
            let v = &snap.shoot;
            self.shooter
                .set_cmd(ShootCommand::from_u8(v.shoot_cmd), v.shoot_add_num);
            self.shooter.set_turn_speed(v.shoot_freq);
        }

        if snap.pending.contains(Pending::FRICTION) {
            let v = &snap.friction_speed;
            self.shooter.set_friction_speed(v.left, v.right);
        }
    }

    /// Gimbal-angle application with the per-axis mode bit.
    ///
    /// Engagement (trigger held or secondary switch up) gates the
    /// rate/override path: while engaged, the command is latched into the
    /// targeting override for the external auto-aim algorithm, and a
    /// rate-mode axis is not applied directly. Without engagement, angle
    /// mode is forced regardless of the bit.
    fn apply_gimbal(&self, angle: &GimbalAngle) {
        let engaged = self.input.trigger_pressed() || self.input.secondary_up();
        let pitch_deg = decode_centi(angle.pitch);
        let yaw_deg = decode_centi(angle.yaw);

        if engaged {
            self.telemetry.set_targeting_override(TargetingOverride {
                pitch_deg,
                yaw_deg,
                time_pc: angle.time_pc,
            });
        }

        if !(engaged && angle.pitch_rate_mode()) {
            self.gimbal.set_pitch_angle(pitch_deg);
        }
        if !(engaged && angle.yaw_rate_mode()) {
            self.gimbal.set_yaw_angle(yaw_deg);
        }
    }

    fn fail_safe(&self) {
        self.chassis.set_speed(0.0, 0.0, 0.0);
        self.chassis.set_acceleration(0.0, 0.0, 0.0);
        self.shooter.set_cmd(ShootCommand::Stop, 0);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
