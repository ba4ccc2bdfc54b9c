//! Command mailbox: latest value per command type plus pending flags.
//!
//! Not a queue. Each slot holds at most the single most recent value for
//! one command type; a value that arrives before the previous one is
//! consumed overwrites it. That is correct here because every slot is an
//! absolute or rate command for a loop that re-reads each tick —
//! staleness beyond one tick is immaterial once superseded.
//!
//! The pending flags are accumulating state, not one-shot notifications:
//! a flag raised while the consumer is applying the previous drain is
//! observed on its next wait, so there is no missed-wakeup window.
//! Writers commit the slot value and raise the flag under the same lock
//! (write-then-flag), so the consumer never sees a torn value.

use std::time::{Duration, Instant};

use bitflags::bitflags;
use parking_lot::{Condvar, Mutex};

use argo_common::wire::{ChassisSpdAcc, ChassisSpeed, FrictionSpeed, GimbalAngle, ShootNum};

bitflags! {
    /// Pending-update flag per mailbox slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pending: u8 {
        const CHASSIS_SPEED = 1 << 0;
        const GIMBAL_ANGLE  = 1 << 1;
        const SHOOT         = 1 << 2;
        const FRICTION      = 1 << 3;
        const CHASSIS_ACC   = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Inner {
    chassis_speed: ChassisSpeed,
    chassis_spd_acc: ChassisSpdAcc,
    gimbal_angle: GimbalAngle,
    friction_speed: FrictionSpeed,
    shoot: ShootNum,
    pending: Pending,
}

/// Copy of all slots plus the flag set drained at one wake.
///
/// Slot values are meaningful only for the flags present in `pending`;
/// the rest are whatever was last written (possibly already consumed).
#[derive(Debug, Clone, Copy)]
pub struct MailboxSnapshot {
    pub pending: Pending,
    pub chassis_speed: ChassisSpeed,
    pub chassis_spd_acc: ChassisSpdAcc,
    pub gimbal_angle: GimbalAngle,
    pub friction_speed: FrictionSpeed,
    pub shoot: ShootNum,
}

/// Shared command mailbox.
///
/// Producers are the registered bus-receive handlers (one per slot);
/// the sole consumer is the control event loop.
pub struct CommandMailbox {
    inner: Mutex<Inner>,
    cond: Condvar,
}

impl CommandMailbox {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            cond: Condvar::new(),
        }
    }

    fn post(&self, flag: Pending, write: impl FnOnce(&mut Inner)) {
        let mut inner = self.inner.lock();
        write(&mut inner);
        inner.pending |= flag;
        drop(inner);
        self.cond.notify_one();
    }

    pub fn post_chassis_speed(&self, v: ChassisSpeed) {
        self.post(Pending::CHASSIS_SPEED, |i| i.chassis_speed = v);
    }

    pub fn post_chassis_spd_acc(&self, v: ChassisSpdAcc) {
        self.post(Pending::CHASSIS_ACC, |i| i.chassis_spd_acc = v);
    }

    pub fn post_gimbal_angle(&self, v: GimbalAngle) {
        self.post(Pending::GIMBAL_ANGLE, |i| i.gimbal_angle = v);
    }

    pub fn post_friction_speed(&self, v: FrictionSpeed) {
        self.post(Pending::FRICTION, |i| i.friction_speed = v);
    }

    pub fn post_shoot(&self, v: ShootNum) {
        self.post(Pending::SHOOT, |i| i.shoot = v);
    }

    /// Block until at least one flag is pending or `timeout` elapses.
    ///
    /// On wake with flags set, returns a snapshot of every slot plus the
    /// drained flag set, and clears the flags atomically under the lock.
    /// Returns `None` only when the timeout elapsed with nothing pending
    /// (bus silence).
    pub fn wait_pending(&self, timeout: Duration) -> Option<MailboxSnapshot> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        while inner.pending.is_empty() {
            if self.cond.wait_until(&mut inner, deadline).timed_out() {
                break;
            }
        }
        if inner.pending.is_empty() {
            return None;
        }
        let snap = MailboxSnapshot {
            pending: inner.pending,
            chassis_speed: inner.chassis_speed,
            chassis_spd_acc: inner.chassis_spd_acc,
            gimbal_angle: inner.gimbal_angle,
            friction_speed: inner.friction_speed,
            shoot: inner.shoot,
        };
        inner.pending = Pending::empty();
        Some(snap)
    }

    /// Zero every slot and clear every flag.
    ///
    /// Called from the disabled branch so that re-enabling never replays
    /// a command from before the disable.
    pub fn clear_all(&self) {
        let mut inner = self.inner.lock();
        *inner = Inner::default();
    }

    /// Current pending set without consuming anything.
    pub fn pending(&self) -> Pending {
        self.inner.lock().pending
    }

    /// Non-consuming copy of the mailbox (diagnostics and tests).
    pub fn snapshot(&self) -> MailboxSnapshot {
        let inner = self.inner.lock();
        MailboxSnapshot {
            pending: inner.pending,
            chassis_speed: inner.chassis_speed,
            chassis_spd_acc: inner.chassis_spd_acc,
            gimbal_angle: inner.gimbal_angle,
            friction_speed: inner.friction_speed,
            shoot: inner.shoot,
        }
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn wait_returns_immediately_when_already_pending() {
        let mb = CommandMailbox::new();
        mb.post_chassis_speed(ChassisSpeed {
            vx: 100,
            ..Default::default()
        });
        let snap = mb.wait_pending(Duration::from_millis(1)).unwrap();
        assert_eq!(snap.pending, Pending::CHASSIS_SPEED);
        assert_eq!(snap.chassis_speed.vx, 100);
        // Drained: nothing pending anymore.
        assert!(mb.pending().is_empty());
    }

    #[test]
    fn most_recent_wins_before_consumption() {
        let mb = CommandMailbox::new();
        mb.post_chassis_speed(ChassisSpeed {
            vx: 100,
            ..Default::default()
        });
        mb.post_chassis_speed(ChassisSpeed {
            vx: 250,
            ..Default::default()
        });
        let snap = mb.wait_pending(Duration::from_millis(1)).unwrap();
        assert_eq!(snap.chassis_speed.vx, 250);
        // The first value is gone, not queued.
        assert!(mb.wait_pending(Duration::from_millis(1)).is_none());
    }

    #[test]
    fn timeout_with_nothing_pending_returns_none() {
        let mb = CommandMailbox::new();
        let start = Instant::now();
        assert!(mb.wait_pending(Duration::from_millis(20)).is_none());
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn flags_accumulate_across_a_drain() {
        let mb = CommandMailbox::new();
        mb.post_gimbal_angle(GimbalAngle {
            pitch: 450,
            ..Default::default()
        });
        let first = mb.wait_pending(Duration::from_millis(1)).unwrap();
        assert_eq!(first.pending, Pending::GIMBAL_ANGLE);

        // Posted after the drain, before the next wait: must be seen.
        mb.post_shoot(ShootNum {
            shoot_cmd: 1,
            ..Default::default()
        });
        let second = mb.wait_pending(Duration::from_millis(1)).unwrap();
        assert_eq!(second.pending, Pending::SHOOT);
    }

    #[test]
    fn multiple_flags_drained_in_one_wake() {
        let mb = CommandMailbox::new();
        mb.post_chassis_speed(ChassisSpeed::default());
        mb.post_friction_speed(FrictionSpeed {
            left: 1200,
            right: 1200,
        });
        let snap = mb.wait_pending(Duration::from_millis(1)).unwrap();
        assert_eq!(snap.pending, Pending::CHASSIS_SPEED | Pending::FRICTION);
    }

    #[test]
    fn clear_all_zeroes_slots_and_flags() {
        let mb = CommandMailbox::new();
        mb.post_chassis_spd_acc(ChassisSpdAcc {
            ax: 7,
            ..Default::default()
        });
        mb.clear_all();
        assert!(mb.pending().is_empty());
        assert_eq!(mb.snapshot().chassis_spd_acc, ChassisSpdAcc::default());
        assert!(mb.wait_pending(Duration::from_millis(5)).is_none());
    }

    #[test]
    fn cross_thread_post_wakes_waiter() {
        let mb = Arc::new(CommandMailbox::new());
        let producer = Arc::clone(&mb);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            producer.post_gimbal_angle(GimbalAngle {
                yaw: -1200,
                ..Default::default()
            });
        });
        let snap = mb.wait_pending(Duration::from_millis(500)).unwrap();
        assert_eq!(snap.pending, Pending::GIMBAL_ANGLE);
        assert_eq!(snap.gimbal_angle.yaw, -1200);
        handle.join().unwrap();
    }
}
