use std::{ffi::c_void, mem::ManuallyDrop, ops::Deref, ptr::NonNull};

use windows::{
    Win32::Graphics::Direct3D9::{D3DSBT_ALL, IDirect3DDevice9, IDirect3DStateBlock9},
    core::Interface,
};

use crate::{NativeStateBlock, RawDevice, StateBlockDevice, Status};

impl NativeStateBlock for IDirect3DStateBlock9 {
    fn capture(&self) -> Status {
        unsafe { self.Capture() }.into()
    }

    fn apply(&self) -> Status {
        unsafe { self.Apply() }.into()
    }
}

impl StateBlockDevice for IDirect3DDevice9 {
    type Block = IDirect3DStateBlock9;

    fn create_state_block(&self) -> Result<Self::Block, Status> {
        unsafe { self.CreateStateBlock(D3DSBT_ALL) }.map_err(|err| err.code().into())
    }
}

/// A device pointer borrowed from whoever owns the device.
///
/// Unlike cloning an `IDirect3DDevice9`, this never calls `AddRef`, and
/// dropping it never calls `Release`. Used for pointers that arrive through
/// hooks, where the reference belongs to the hooked application.
#[repr(transparent)]
pub struct D3d9Device(ManuallyDrop<IDirect3DDevice9>);

impl D3d9Device {
    /// # Safety
    ///
    /// `ptr` must be a live `IDirect3DDevice9*` that outlives the wrapper.
    pub unsafe fn from_ptr(ptr: NonNull<c_void>) -> Self {
        Self(ManuallyDrop::new(unsafe {
            IDirect3DDevice9::from_raw(ptr.as_ptr())
        }))
    }

    pub fn as_raw(&self) -> *mut c_void {
        self.0.as_raw()
    }
}

impl Deref for D3d9Device {
    type Target = IDirect3DDevice9;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl StateBlockDevice for D3d9Device {
    type Block = IDirect3DStateBlock9;

    fn create_state_block(&self) -> Result<Self::Block, Status> {
        self.0.create_state_block()
    }
}

impl RawDevice for D3d9Device {
    unsafe fn from_raw(ptr: NonNull<c_void>) -> Self {
        unsafe { Self::from_ptr(ptr) }
    }
}
