use std::{ffi::c_void, fmt, mem, ptr::NonNull};

use crate::{
    CreationPolicy, NativeStateBlock, RawDevice, StateBlockDevice, StateBlockError, StateScope,
    Status,
};

enum Resource<B> {
    Present(B),
    /// creation failed with this status
    Absent(Status),
    Released,
}

/// Owns one native state block recording all state of one device.
///
/// The device is only borrowed; the handle never adds or drops references to
/// it. The state block is owned and released exactly once, either by
/// [`StateBlock::release`] or when the handle is dropped.
pub struct StateBlock<D: StateBlockDevice> {
    device: D,
    resource: Resource<D::Block>,
}

impl<D: StateBlockDevice> StateBlock<D> {
    /// Creates the state block, tolerating native failure.
    ///
    /// If the device refuses to create the block the handle is still
    /// returned, and [`capture`](Self::capture) / [`apply`](Self::apply)
    /// report [`StateBlockError::InvalidState`].
    pub fn new(device: D) -> Self {
        let resource = match device.create_state_block() {
            Ok(block) => {
                native_log!(debug, "created state block");
                Resource::Present(block)
            }
            Err(status) => {
                native_log!(warn, "unable to create state block: {status}");
                Resource::Absent(status)
            }
        };

        Self { device, resource }
    }

    pub fn with_policy(device: D, policy: CreationPolicy) -> Result<Self, StateBlockError> {
        let block = Self::new(device);

        match (policy, block.creation_status()) {
            (CreationPolicy::Strict, Some(status)) => Err(StateBlockError::CreationFailed(status)),
            _ => Ok(block),
        }
    }

    /// Records the device's current state, replacing any earlier recording.
    ///
    /// The native status is returned as is. Only a missing or released block
    /// is an error, in which case the device is not touched.
    pub fn capture(&self) -> Result<Status, StateBlockError> {
        let status = self.native()?.capture();
        native_log!(trace, "state block capture returned {status}");
        Ok(status)
    }

    /// Pushes the last recording back onto the device.
    ///
    /// Without a prior [`capture`](Self::capture) the outcome is whatever the
    /// native layer does with a fresh block.
    pub fn apply(&self) -> Result<Status, StateBlockError> {
        let status = self.native()?.apply();
        native_log!(trace, "state block apply returned {status}");
        Ok(status)
    }

    /// Captures now and applies again when the returned guard goes away.
    pub fn scope(&mut self) -> Result<StateScope<'_, D>, StateBlockError> {
        StateScope::new(self)
    }

    /// Releases the native state block.
    ///
    /// Afterwards capture and apply fail with [`StateBlockError::Released`].
    /// Calling this more than once does nothing, as does the drop that
    /// follows.
    pub fn release(&mut self) {
        if let Resource::Present(block) = mem::replace(&mut self.resource, Resource::Released) {
            drop(block);
            native_log!(debug, "released state block");
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn is_present(&self) -> bool {
        matches!(self.resource, Resource::Present(_))
    }

    pub fn is_released(&self) -> bool {
        matches!(self.resource, Resource::Released)
    }

    /// The native status of a failed creation, if creation failed.
    pub fn creation_status(&self) -> Option<Status> {
        match self.resource {
            Resource::Absent(status) => Some(status),
            _ => None,
        }
    }

    pub(crate) fn native(&self) -> Result<&D::Block, StateBlockError> {
        match &self.resource {
            Resource::Present(block) => Ok(block),
            Resource::Absent(_) => Err(StateBlockError::InvalidState),
            Resource::Released => Err(StateBlockError::Released),
        }
    }
}

impl<D: RawDevice> StateBlock<D> {
    /// Builds the handle from a device pointer received over FFI.
    ///
    /// Fails with [`StateBlockError::InvalidArgument`] if `device` is null.
    ///
    /// # Safety
    ///
    /// A non-null `device` must point to a live device of type `D` that
    /// outlives the returned handle.
    pub unsafe fn from_raw(
        device: *mut c_void,
        policy: CreationPolicy,
    ) -> Result<Self, StateBlockError> {
        let device = NonNull::new(device).ok_or(StateBlockError::InvalidArgument("device"))?;

        // SAFETY: non-null, liveness is on the caller
        Self::with_policy(unsafe { D::from_raw(device) }, policy)
    }
}

impl<D: StateBlockDevice> Drop for StateBlock<D> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<D: StateBlockDevice> fmt::Debug for StateBlock<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.resource {
            Resource::Present(_) => "present",
            Resource::Absent(_) => "absent",
            Resource::Released => "released",
        };

        f.debug_struct("StateBlock")
            .field("resource", &state)
            .field("creation_status", &self.creation_status())
            .finish_non_exhaustive()
    }
}
