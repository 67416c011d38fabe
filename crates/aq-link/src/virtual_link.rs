//! In-memory virtual link
//!
//! A [`VirtualChannel`] stands in for a serial port when no hardware is
//! attached. Its [`VirtualLinkProbe`] shares the same state, so a simulation or
//! test can inject traffic and inspect everything the owner wrote after the
//! channel itself has been handed over.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use crate::channel::{Channel, ChannelEvent, LinkState};
use crate::error::LinkError;
use crate::params::ConnectionParams;

#[derive(Debug, Default)]
struct VirtualLinkState {
    session: Option<ConnectionParams>,
    writes: Vec<Vec<u8>>,
    opens: Vec<ConnectionParams>,
    close_count: usize,
    pending: VecDeque<ChannelEvent>,
    fail_next_open: Option<String>,
    last_error: Option<String>,
}

/// Channel whose wire is a shared in-memory log
#[derive(Debug)]
pub struct VirtualChannel {
    state: Rc<RefCell<VirtualLinkState>>,
    last_error: Option<String>,
}

/// Observer and driver for a [`VirtualChannel`]
#[derive(Debug, Clone)]
pub struct VirtualLinkProbe {
    state: Rc<RefCell<VirtualLinkState>>,
}

/// Create a virtual channel and the probe attached to it
pub fn create_virtual_link() -> (VirtualChannel, VirtualLinkProbe) {
    let state = Rc::new(RefCell::new(VirtualLinkState::default()));
    (
        VirtualChannel {
            state: Rc::clone(&state),
            last_error: None,
        },
        VirtualLinkProbe { state },
    )
}

impl Channel for VirtualChannel {
    fn open(&mut self, params: &ConnectionParams) -> Result<(), LinkError> {
        let mut state = self.state.borrow_mut();
        // Any existing session ends, even if the new one fails to open
        state.session = None;
        if let Some(reason) = state.fail_next_open.take() {
            return Err(LinkError::OpenFailed {
                port: params.port.clone(),
                reason,
            });
        }
        debug!("Virtual link opened on {}", params);
        state.opens.push(params.clone());
        state.session = Some(params.clone());
        state.last_error = None;
        self.last_error = None;
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        state.close_count += 1;
        state.session = None;
    }

    fn write(&mut self, data: &[u8]) {
        self.state.borrow_mut().writes.push(data.to_vec());
    }

    fn state(&self) -> LinkState {
        if self.state.borrow().session.is_some() {
            LinkState::Open
        } else {
            LinkState::Closed
        }
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn poll_event(&mut self) -> Option<ChannelEvent> {
        let mut state = self.state.borrow_mut();
        let event = state.pending.pop_front()?;
        if let ChannelEvent::Error(text) = &event {
            state.last_error = Some(text.clone());
            self.last_error = Some(text.clone());
        }
        Some(event)
    }
}

impl VirtualLinkProbe {
    /// Every write call made on the channel, open or not, in order
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    /// Take and clear the recorded writes
    pub fn take_writes(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.state.borrow_mut().writes)
    }

    /// Number of write calls recorded so far
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes.len()
    }

    /// Parameters of every successful open, in order
    pub fn opens(&self) -> Vec<ConnectionParams> {
        self.state.borrow().opens.clone()
    }

    /// Number of close calls
    pub fn close_count(&self) -> usize {
        self.state.borrow().close_count
    }

    /// Check if a session is open
    pub fn is_open(&self) -> bool {
        self.state.borrow().session.is_some()
    }

    /// Most recent error event handed to the owner
    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    /// Queue bytes as if they arrived from the flight controller
    pub fn inject_data(&self, data: &[u8]) {
        self.state
            .borrow_mut()
            .pending
            .push_back(ChannelEvent::DataAvailable(data.to_vec()));
    }

    /// Queue an operational error without changing the session state
    pub fn inject_error(&self, message: impl Into<String>) {
        self.state
            .borrow_mut()
            .pending
            .push_back(ChannelEvent::Error(message.into()));
    }

    /// Simulate the device disappearing: the session ends and an error is queued
    pub fn unplug(&self, message: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.session = None;
        state.pending.push_back(ChannelEvent::Error(message.into()));
    }

    /// Make the next open fail with `reason`
    pub fn fail_next_open(&self, reason: impl Into<String>) {
        self.state.borrow_mut().fail_next_open = Some(reason.into());
    }
}
