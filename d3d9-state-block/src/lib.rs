//! Owned handle over a Direct3D 9 state block.
//!
//! A [`StateBlock`] records the complete render, texture, sampler and
//! transform state of a device with [`StateBlock::capture`] and pushes it
//! back with [`StateBlock::apply`]. It exists so code running inside someone
//! else's render loop (an overlay drawn from an `EndScene` hook, say) can
//! change whatever state it needs and then leave the device exactly as the
//! host application had it.
//!
//! ```rust,ignore
//! let mut block = StateBlock::new(&dev);
//! {
//!     let _scope = block.scope()?;
//!     draw_overlay(&dev);
//! } // host state is applied again here
//! ```
//!
//! The handle is generic over [`StateBlockDevice`], so anything that can hand
//! out a [`NativeStateBlock`] works. On Windows this is implemented for
//! `IDirect3DDevice9` and for [`D3d9Device`], a non-owning wrapper around a
//! raw device pointer.
//!
//! # Threading
//!
//! Direct3D 9 devices belong to one rendering thread. Nothing here
//! synchronizes; create, use and drop the handle on that thread.

// logs unless the `silent` feature strips diagnostics from the binary
macro_rules! native_log {
    ($lvl:ident, $($arg:tt)+) => {
        if !cfg!(feature = "silent") {
            log::$lvl!($($arg)+)
        }
    };
}

mod block;
mod device;
mod error;
mod scope;
mod status;

#[cfg(windows)]
mod d3d9;

pub use block::*;
pub use device::*;
pub use error::*;
pub use scope::*;
pub use status::*;

#[cfg(windows)]
pub use d3d9::D3d9Device;
