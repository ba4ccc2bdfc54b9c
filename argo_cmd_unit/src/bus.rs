//! Outbound bus and referee-system seams.
//!
//! Frame framing, CRC, and addressing live in the bus driver outside
//! this unit. Sends are fire-and-forget: no delivery confirmation is
//! surfaced, and loss is tolerated because the peer's last-known caches
//! degrade gracefully.

use argo_common::protocol::{CmdId, GIMBAL_ADDR};

/// Outbound command transmitter.
pub trait BusTx: Send + Sync {
    fn send(&self, target: u8, cmd: CmdId, payload: &[u8]);
}

/// Referee/judging system transmitter (student-data passthrough sink).
pub trait RefereeTx: Send + Sync {
    fn transmit(&self, cmd_id: u16, data: &[u8]);
}

/// Forward a raw RC frame from the chassis board to the gimbal board.
pub fn forward_rc_data(bus: &dyn BusTx, raw: &[u8]) {
    bus.send(GIMBAL_ADDR, CmdId::RcDataForward, raw);
}

/// Ask the gimbal board to start its auto-adjust routine.
pub fn request_gimbal_adjust(bus: &dyn BusTx) {
    bus.send(GIMBAL_ADDR, CmdId::GimbalAdjust, &[]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingBus {
        frames: Mutex<Vec<(u8, CmdId, Vec<u8>)>>,
    }

    impl BusTx for RecordingBus {
        fn send(&self, target: u8, cmd: CmdId, payload: &[u8]) {
            self.frames.lock().push((target, cmd, payload.to_vec()));
        }
    }

    #[test]
    fn rc_forward_targets_gimbal_board_verbatim() {
        let bus = RecordingBus::default();
        forward_rc_data(&bus, &[0x11, 0x22, 0x33]);
        assert_eq!(
            *bus.frames.lock(),
            vec![(GIMBAL_ADDR, CmdId::RcDataForward, vec![0x11, 0x22, 0x33])]
        );
    }

    #[test]
    fn adjust_request_carries_empty_payload() {
        let bus = RecordingBus::default();
        request_gimbal_adjust(&bus);
        let frames = bus.frames.lock();
        assert_eq!(frames[0].1, CmdId::GimbalAdjust);
        assert!(frames[0].2.is_empty());
    }
}
