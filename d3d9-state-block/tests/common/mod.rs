//! In-memory device that behaves like a D3D9 device as far as state blocks
//! are concerned, and counts every native call made against it.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    ffi::c_void,
    ptr::NonNull,
    rc::Rc,
};

use d3d9_state_block::{NativeStateBlock, RawDevice, StateBlockDevice, Status};

pub type RenderStates = BTreeMap<u32, u32>;

pub const RS_COLOR: u32 = 1;
pub const RS_CULLMODE: u32 = 22;
pub const RS_ZENABLE: u32 = 7;

pub const RED: u32 = 0xFFFF_0000;
pub const BLUE: u32 = 0xFF00_00FF;
pub const GREEN: u32 = 0xFF00_FF00;

#[derive(Default)]
struct Inner {
    states: RefCell<RenderStates>,
    create_failure: Cell<Option<Status>>,
    capture_result: Cell<Status>,
    apply_result: Cell<Status>,
    creates: Cell<usize>,
    captures: Cell<usize>,
    applies: Cell<usize>,
    releases: Cell<usize>,
}

#[derive(Clone, Default)]
pub struct MockDevice(Rc<Inner>);

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose `CreateStateBlock` fails with `status`.
    pub fn failing(status: Status) -> Self {
        let dev = Self::new();
        dev.0.create_failure.set(Some(status));
        dev
    }

    pub fn set(&self, state: u32, value: u32) {
        self.0.states.borrow_mut().insert(state, value);
    }

    pub fn get(&self, state: u32) -> Option<u32> {
        self.0.states.borrow().get(&state).copied()
    }

    pub fn snapshot(&self) -> RenderStates {
        self.0.states.borrow().clone()
    }

    pub fn set_capture_result(&self, status: Status) {
        self.0.capture_result.set(status);
    }

    pub fn set_apply_result(&self, status: Status) {
        self.0.apply_result.set(status);
    }

    pub fn creates(&self) -> usize {
        self.0.creates.get()
    }

    pub fn captures(&self) -> usize {
        self.0.captures.get()
    }

    pub fn applies(&self) -> usize {
        self.0.applies.get()
    }

    pub fn releases(&self) -> usize {
        self.0.releases.get()
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self as *const MockDevice as *mut c_void
    }
}

impl StateBlockDevice for MockDevice {
    type Block = MockBlock;

    fn create_state_block(&self) -> Result<Self::Block, Status> {
        self.0.creates.set(self.0.creates.get() + 1);

        match self.0.create_failure.get() {
            Some(status) => Err(status),
            None => Ok(MockBlock {
                device: self.0.clone(),
                recorded: RefCell::new(None),
            }),
        }
    }
}

impl RawDevice for MockDevice {
    unsafe fn from_raw(ptr: NonNull<c_void>) -> Self {
        unsafe { ptr.cast::<MockDevice>().as_ref() }.clone()
    }
}

pub struct MockBlock {
    device: Rc<Inner>,
    // nothing recorded until the first capture, so apply is a no-op
    recorded: RefCell<Option<RenderStates>>,
}

impl NativeStateBlock for MockBlock {
    fn capture(&self) -> Status {
        self.device.captures.set(self.device.captures.get() + 1);
        *self.recorded.borrow_mut() = Some(self.device.states.borrow().clone());
        self.device.capture_result.get()
    }

    fn apply(&self) -> Status {
        self.device.applies.set(self.device.applies.get() + 1);
        if let Some(recorded) = self.recorded.borrow().as_ref() {
            *self.device.states.borrow_mut() = recorded.clone();
        }
        self.device.apply_result.get()
    }
}

impl Drop for MockBlock {
    fn drop(&mut self) {
        self.device.releases.set(self.device.releases.get() + 1);
    }
}
