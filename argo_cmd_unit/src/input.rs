//! Safety/mode input seam.
//!
//! The RC receiver driver is external; the control event loop only polls
//! three derived conditions from it. Which physical transport backs the
//! reads (local UART receiver vs bus-forwarded frames) is decided once
//! by the board role.

pub trait ControlInput: Send + Sync {
    /// Hardware kill condition — the disable switch is engaged.
    fn disable_engaged(&self) -> bool;
    /// Secondary switch in its up position (targeting enable).
    fn secondary_up(&self) -> bool;
    /// Momentary trigger held (auto-aim engagement).
    fn trigger_pressed(&self) -> bool;
}
