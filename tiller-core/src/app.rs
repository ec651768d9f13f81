//! Application task wiring
//!
//! The canonical task table for a vehicle control unit: an always-run
//! transport pump (plus keep-alive) and the 100 ms application
//! iteration. The platform boot code builds a [`VcuContext`] around its
//! transport implementation, hands [`task_table`] to the scheduler and
//! loops on `iteration` forever.

use tiller_protocol::heartbeat;

use crate::scheduler::TaskDef;
use crate::traits::CanTransport;
use crate::vehicle::VehicleControl;

/// Period of the application iteration task
pub const APP_TASK_PERIOD_MS: u64 = 100;

/// Everything the scheduler tasks operate on
#[derive(Debug)]
pub struct VcuContext<T: CanTransport> {
    /// The CAN transport, already initialized by boot code
    pub can: T,
    /// The vehicle state machine
    pub vehicle: VehicleControl,
}

impl<T: CanTransport> VcuContext<T> {
    pub fn new(can: T, vehicle: VehicleControl) -> Self {
        Self { can, vehicle }
    }
}

/// The task table, in dispatch order
pub fn task_table<T: CanTransport>() -> [TaskDef<VcuContext<T>>; 2] {
    [
        TaskDef::always(can_pump::<T>),
        TaskDef::every_ms(APP_TASK_PERIOD_MS, vehicle_iteration::<T>),
    ]
}

/// Every pass: run the transport queues and keep the bus alive.
///
/// The keep-alive is skipped while the transmit mailbox is busy; the
/// next pass retries naturally.
fn can_pump<T: CanTransport>(ctx: &mut VcuContext<T>) {
    ctx.can.service();

    if !ctx.can.is_tx_busy() && ctx.can.send(&heartbeat()).is_err() {
        ctx.vehicle.note_send_failure();
    }
}

/// Every 100 ms: one vehicle-control iteration.
///
/// A failed bus-off recovery has no fatal path inside a void task; it is
/// counted and retried on the next iteration.
fn vehicle_iteration<T: CanTransport>(ctx: &mut VcuContext<T>) {
    if ctx.vehicle.poll(&mut ctx.can).is_err() {
        ctx.vehicle.note_recovery_failure();
    }
}
