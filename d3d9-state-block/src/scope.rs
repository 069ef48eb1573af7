use crate::{NativeStateBlock, StateBlock, StateBlockDevice, StateBlockError, Status};

/// Guard returned by [`StateBlock::scope`].
///
/// The device state was captured when the guard was created and is applied
/// again when it is dropped, so anything drawn in between can set whatever
/// state it likes. The guard borrows the handle mutably, which keeps scopes
/// from nesting on one block and keeps the block from being released early.
#[must_use = "the captured state is applied as soon as the scope is dropped"]
pub struct StateScope<'a, D: StateBlockDevice> {
    block: &'a D::Block,
    capture_status: Status,
    armed: bool,
}

impl<'a, D: StateBlockDevice> StateScope<'a, D> {
    pub(crate) fn new(state: &'a mut StateBlock<D>) -> Result<Self, StateBlockError> {
        let state: &'a StateBlock<D> = state;
        let capture_status = state.capture()?;
        let block = state.native()?;

        Ok(Self {
            block,
            capture_status,
            armed: true,
        })
    }

    /// Status of the capture taken when the scope opened.
    ///
    /// The guard applies on drop no matter what this says. If the capture
    /// failed and the stale recording should not be pushed, call
    /// [`dismiss`](Self::dismiss).
    pub fn capture_status(&self) -> Status {
        self.capture_status
    }

    /// Applies the captured state now and returns the native status.
    pub fn restore(mut self) -> Status {
        self.armed = false;
        self.block.apply()
    }

    /// Closes the scope without applying anything.
    pub fn dismiss(mut self) {
        self.armed = false;
    }
}

impl<D: StateBlockDevice> Drop for StateScope<'_, D> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let status = self.block.apply();
        if status.is_err() {
            native_log!(warn, "unable to re-apply captured state: {status}");
        }
    }
}
