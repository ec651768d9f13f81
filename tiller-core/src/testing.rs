//! Shared test doubles for the collaborator traits

use core::cell::Cell;

use heapless::{Deque, Vec};
use tiller_protocol::CanFrame;

use crate::config::CanBusConfig;
use crate::traits::{CanTransport, LinkStatus, MillisTimer, TransportError};

/// A settable clock; tests hold the `TestClock` and hand `&TestClock`
/// to the scheduler so they can move time while the scheduler runs.
pub struct TestClock {
    now: Cell<u64>,
    started: Cell<bool>,
    fail_start: bool,
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            started: Cell::new(false),
            fail_start: false,
        }
    }

    /// A clock whose `start` fails, for the boot error path
    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::new()
        }
    }

    pub fn set_now(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn started(&self) -> bool {
        self.started.get()
    }
}

impl MillisTimer for &TestClock {
    type Error = ();

    fn start(&mut self) -> Result<(), Self::Error> {
        if self.fail_start {
            return Err(());
        }
        self.started.set(true);
        Ok(())
    }

    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// In-memory CAN transport recording everything the core does to it
pub struct MockTransport {
    pub sent: Vec<CanFrame, 64>,
    pub rx: Deque<CanFrame, 16>,
    pub tx_busy: bool,
    pub link: LinkStatus,
    pub fail_sends: bool,
    pub fail_init: bool,
    pub deinit_calls: u32,
    pub init_calls: u32,
    pub service_calls: u32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            rx: Deque::new(),
            tx_busy: false,
            link: LinkStatus::Operational,
            fail_sends: false,
            fail_init: false,
            deinit_calls: 0,
            init_calls: 0,
            service_calls: 0,
        }
    }

    /// Queue a frame for the core to pick up via `try_receive`
    pub fn push_rx(&mut self, frame: CanFrame) {
        let _ = self.rx.push_back(frame);
    }
}

impl CanTransport for MockTransport {
    fn send(&mut self, frame: &CanFrame) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Busy);
        }
        self.sent
            .push(frame.clone())
            .map_err(|_| TransportError::Hardware)?;
        Ok(())
    }

    fn try_receive(&mut self) -> Option<CanFrame> {
        self.rx.pop_front()
    }

    fn is_tx_busy(&self) -> bool {
        self.tx_busy
    }

    fn status(&self) -> LinkStatus {
        self.link
    }

    fn service(&mut self) {
        self.service_calls += 1;
    }

    fn deinit(&mut self) -> Result<(), TransportError> {
        self.deinit_calls += 1;
        Ok(())
    }

    fn init(&mut self, _config: &CanBusConfig) -> Result<(), TransportError> {
        if self.fail_init {
            return Err(TransportError::Hardware);
        }
        self.init_calls += 1;
        self.link = LinkStatus::Operational;
        Ok(())
    }
}
