use std::fmt;

/// Raw result code of a native device call.
///
/// Values follow `HRESULT` conventions: negative means failure. The state
/// block never interprets these itself; [`StateBlock::capture`] and
/// [`StateBlock::apply`] hand them back unchanged.
///
/// [`StateBlock::capture`]: crate::StateBlock::capture
/// [`StateBlock::apply`]: crate::StateBlock::apply
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Status(pub i32);

impl Status {
    pub const OK: Status = Status(0);
    /// `D3DERR_INVALIDCALL`
    pub const INVALID_CALL: Status = Status(0x8876_086Cu32 as i32);
    /// `D3DERR_OUTOFVIDEOMEMORY`
    pub const OUT_OF_VIDEO_MEMORY: Status = Status(0x8876_017Cu32 as i32);
    /// `E_OUTOFMEMORY`
    pub const OUT_OF_MEMORY: Status = Status(0x8007_000Eu32 as i32);

    #[inline]
    pub fn is_ok(self) -> bool {
        self.0 >= 0
    }

    #[inline]
    pub fn is_err(self) -> bool {
        !self.is_ok()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0 as u32)
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status(code)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.0
    }
}

#[cfg(windows)]
impl From<windows::core::HRESULT> for Status {
    fn from(hr: windows::core::HRESULT) -> Self {
        Status(hr.0)
    }
}

#[cfg(windows)]
impl From<windows::core::Result<()>> for Status {
    fn from(result: windows::core::Result<()>) -> Self {
        match result {
            Ok(()) => Status::OK,
            Err(err) => err.code().into(),
        }
    }
}
