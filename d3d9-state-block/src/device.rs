use std::{ffi::c_void, ptr::NonNull};

use crate::Status;

/// A native state block resource.
///
/// Dropping the value must release the native resource. For COM objects that
/// is the `Release` the interface wrapper already performs.
pub trait NativeStateBlock {
    /// Records the device's current state into this block.
    fn capture(&self) -> Status;

    /// Pushes the recorded state onto the device.
    fn apply(&self) -> Status;
}

/// A device able to create state blocks covering all of its state.
pub trait StateBlockDevice {
    type Block: NativeStateBlock;

    /// Issues a single native request for a state block recording every
    /// render, texture, sampler and transform state.
    fn create_state_block(&self) -> Result<Self::Block, Status>;
}

impl<T: StateBlockDevice + ?Sized> StateBlockDevice for &T {
    type Block = T::Block;

    fn create_state_block(&self) -> Result<Self::Block, Status> {
        (**self).create_state_block()
    }
}

/// A device that can be rebuilt from a pointer handed across an interop
/// boundary (a hooked `EndScene`, for instance).
pub trait RawDevice: StateBlockDevice + Sized {
    /// # Safety
    ///
    /// `ptr` must point to a live device of the implementing type and stay
    /// valid for as long as the returned value is used.
    unsafe fn from_raw(ptr: NonNull<c_void>) -> Self;
}

/// What to do when the native layer fails to create the state block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationPolicy {
    /// Hand out a handle without a resource. Capture and apply then fail
    /// with [`StateBlockError::InvalidState`](crate::StateBlockError::InvalidState).
    #[default]
    Deferred,
    /// Fail construction with
    /// [`StateBlockError::CreationFailed`](crate::StateBlockError::CreationFailed).
    Strict,
}
