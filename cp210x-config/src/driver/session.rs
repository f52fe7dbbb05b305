use std::ops::{Deref, DerefMut};

use log::{debug, warn};

use crate::Error;
use crate::transfer::ControlTransferChannel;

/// Channel borrowed for one configuration session.
///
/// Opens the channel if it was closed, and closes it again when the session ends.
/// A channel that was already open is never closed. Dropping the session without
/// calling [`OpenSession::finish`] (as happens when an error is propagated) still
/// closes the channel, logging any failure to do so.
pub(super) struct OpenSession<'a, C: ControlTransferChannel> {
    channel: &'a mut C,
    close_when_done: bool,
}

impl<'a, C: ControlTransferChannel> OpenSession<'a, C> {
    pub(super) fn begin(channel: &'a mut C) -> Result<Self, Error> {
        let close_when_done = !channel.is_open();
        if close_when_done {
            debug!("Opening device");
            channel.open()?;
        }
        Ok(Self {
            channel,
            close_when_done,
        })
    }

    /// End the session, closing the channel if the session opened it.
    pub(super) fn finish(mut self) -> Result<(), Error> {
        if self.close_when_done {
            self.close_when_done = false;
            debug!("Closing device");
            self.channel.close()?;
        }
        Ok(())
    }
}

impl<C: ControlTransferChannel> Deref for OpenSession<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.channel
    }
}

impl<C: ControlTransferChannel> DerefMut for OpenSession<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.channel
    }
}

impl<C: ControlTransferChannel> Drop for OpenSession<'_, C> {
    fn drop(&mut self) {
        if self.close_when_done {
            debug!("Closing device after failed configuration");
            if let Err(e) = self.channel.close() {
                warn!("Failed to close device: {e}");
            }
        }
    }
}
