//! Injected into a D3D9 game, draws a translucent box from `EndScene` and
//! hands the device back to the game in exactly the state it left it.

#![cfg(windows)]

use std::{cell::RefCell, error::Error, ffi::c_void, ops::Deref, time::Duration};

use d3d9_state_block::{CreationPolicy, D3d9Device, StateBlock};
use log::{debug, error, info, warn};
use retour::static_detour;
use windows::{
    Win32::{
        Graphics::Direct3D9::{
            D3DBLEND_INVSRCALPHA, D3DBLEND_SRCALPHA, D3DBLENDOP_ADD, D3DCULL_NONE, D3DFILL_SOLID,
            D3DFVF_DIFFUSE, D3DFVF_XYZRHW, D3DPRESENT_PARAMETERS, D3DPT_TRIANGLESTRIP,
            D3DRS_ALPHABLENDENABLE, D3DRS_ALPHATESTENABLE, D3DRS_BLENDOP, D3DRS_CULLMODE,
            D3DRS_DESTBLEND, D3DRS_FILLMODE, D3DRS_FOGENABLE, D3DRS_LIGHTING,
            D3DRS_SCISSORTESTENABLE, D3DRS_SRCBLEND, D3DRS_STENCILENABLE, D3DRS_ZENABLE,
            D3DRS_ZWRITEENABLE, D3DTOP_DISABLE, D3DTOP_SELECTARG1, D3DTSS_ALPHAARG1,
            D3DTSS_ALPHAOP, D3DTSS_COLORARG1, D3DTSS_COLOROP, D3DVIEWPORT9, IDirect3DDevice9,
        },
        System::{
            Console::AllocConsole, LibraryLoader::GetModuleHandleA, SystemServices::D3DTA_DIFFUSE,
        },
    },
    core::{HRESULT, s},
};

// IDirect3DDevice9 vtable slots
const VMT_RESET: usize = 16;
const VMT_END_SCENE: usize = 42;

const OVERLAY_COLOR: u32 = 0x8000_80FF;

type FnEndScene = unsafe extern "system" fn(*mut c_void) -> HRESULT;
type FnReset = unsafe extern "system" fn(*mut c_void, *mut D3DPRESENT_PARAMETERS) -> HRESULT;

static_detour! {
    static EndSceneHook: unsafe extern "system" fn(*mut c_void) -> HRESULT;
    static ResetHook: unsafe extern "system" fn(*mut c_void, *mut D3DPRESENT_PARAMETERS) -> HRESULT;
}

thread_local! {
    // the game's render thread is the only one calling into the hooks
    static STATE: RefCell<Option<StateBlock<D3d9Device>>> = const { RefCell::new(None) };
}

#[repr(C)]
#[derive(Clone, Copy)]
struct Vertex {
    pos: [f32; 4],
    color: u32,
}

#[unsafe(no_mangle)]
extern "system" fn DllMain(_hinst: usize, reason: u32, _reserved: *mut ()) -> i32 {
    if reason == 1 {
        std::thread::spawn(|| {
            if let Err(err) = unsafe { main_thread() } {
                error!("unable to install hooks: {err}");
            }
        });
    }

    1
}

fn hk_end_scene(device: *mut c_void) -> HRESULT {
    STATE.with_borrow_mut(|slot| {
        if let Err(err) = draw_overlay(slot, device) {
            warn!("overlay skipped: {err}");
        }
    });

    unsafe { EndSceneHook.call(device) }
}

fn hk_reset(device: *mut c_void, params: *mut D3DPRESENT_PARAMETERS) -> HRESULT {
    // d3d9 refuses to reset while state blocks are alive
    if STATE.with_borrow_mut(Option::take).is_some() {
        debug!("released state block ahead of device reset");
    }

    unsafe { ResetHook.call(device, params) }
}

fn draw_overlay(
    slot: &mut Option<StateBlock<D3d9Device>>,
    device: *mut c_void,
) -> Result<(), Box<dyn Error>> {
    let stale = slot
        .as_ref()
        .is_none_or(|state| state.device().as_raw() != device);

    if stale {
        *slot = Some(unsafe { StateBlock::from_raw(device, CreationPolicy::Strict) }?);
        info!("created state block for device {device:p}");
    }

    let Some(state) = slot.as_mut() else {
        return Ok(());
    };

    let dev = state.device().deref().clone();
    let scope = state.scope()?;

    if scope.capture_status().is_err() {
        let status = scope.capture_status();
        scope.dismiss();
        return Err(format!("unable to capture game state: {status}").into());
    }

    unsafe {
        let mut viewport = D3DVIEWPORT9::default();
        dev.GetViewport(&mut viewport)?;

        setup_state(&dev)?;
        draw_box(&dev, &viewport)?;
    }

    let status = scope.restore();
    if status.is_err() {
        warn!("unable to re-apply game state: {status}");
    }

    Ok(())
}

unsafe fn setup_state(dev: &IDirect3DDevice9) -> Result<(), Box<dyn Error>> {
    unsafe {
        dev.SetPixelShader(None)?;
        dev.SetVertexShader(None)?;
        dev.SetTexture(0, None)?;
        dev.SetFVF(D3DFVF_XYZRHW | D3DFVF_DIFFUSE)?;

        dev.SetRenderState(D3DRS_FILLMODE, D3DFILL_SOLID.0 as _)?;
        dev.SetRenderState(D3DRS_ZENABLE, false as _)?;
        dev.SetRenderState(D3DRS_ZWRITEENABLE, false as _)?;
        dev.SetRenderState(D3DRS_ALPHATESTENABLE, false as _)?;
        dev.SetRenderState(D3DRS_CULLMODE, D3DCULL_NONE.0 as _)?;
        dev.SetRenderState(D3DRS_ALPHABLENDENABLE, true as _)?;
        dev.SetRenderState(D3DRS_BLENDOP, D3DBLENDOP_ADD.0 as _)?;
        dev.SetRenderState(D3DRS_SRCBLEND, D3DBLEND_SRCALPHA.0 as _)?;
        dev.SetRenderState(D3DRS_DESTBLEND, D3DBLEND_INVSRCALPHA.0 as _)?;
        dev.SetRenderState(D3DRS_SCISSORTESTENABLE, false as _)?;
        dev.SetRenderState(D3DRS_FOGENABLE, false as _)?;
        dev.SetRenderState(D3DRS_STENCILENABLE, false as _)?;
        dev.SetRenderState(D3DRS_LIGHTING, false as _)?;

        dev.SetTextureStageState(0, D3DTSS_COLOROP, D3DTOP_SELECTARG1.0 as _)?;
        dev.SetTextureStageState(0, D3DTSS_COLORARG1, D3DTA_DIFFUSE)?;
        dev.SetTextureStageState(0, D3DTSS_ALPHAOP, D3DTOP_SELECTARG1.0 as _)?;
        dev.SetTextureStageState(0, D3DTSS_ALPHAARG1, D3DTA_DIFFUSE)?;
        dev.SetTextureStageState(1, D3DTSS_COLOROP, D3DTOP_DISABLE.0 as _)?;
        dev.SetTextureStageState(1, D3DTSS_ALPHAOP, D3DTOP_DISABLE.0 as _)?;

        Ok(())
    }
}

unsafe fn draw_box(dev: &IDirect3DDevice9, viewport: &D3DVIEWPORT9) -> Result<(), Box<dyn Error>> {
    // top left corner, a quarter of the viewport in each direction
    let l = viewport.X as f32 + 16.0;
    let t = viewport.Y as f32 + 16.0;
    let r = l + viewport.Width as f32 / 4.0;
    let b = t + viewport.Height as f32 / 4.0;

    let vertex = |x: f32, y: f32| Vertex {
        pos: [x - 0.5, y - 0.5, 0.0, 1.0],
        color: OVERLAY_COLOR,
    };
    let quad = [vertex(l, t), vertex(r, t), vertex(l, b), vertex(r, b)];

    unsafe {
        dev.DrawPrimitiveUP(
            D3DPT_TRIANGLESTRIP,
            2,
            quad.as_ptr() as *const c_void,
            std::mem::size_of::<Vertex>() as _,
        )?;
    }

    Ok(())
}

unsafe fn main_thread() -> Result<(), Box<dyn Error>> {
    unsafe {
        let _ = AllocConsole();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    unsafe {
        while GetModuleHandleA(s!("d3d9.dll")).is_err() {
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    let methods = shroud::directx::directx9::methods()
        .map_err(|err| format!("unable to find d3d9 vtable: {err:?}"))?;
    let vmt = methods.device_vmt();

    debug!("EndScene: {:X}", vmt[VMT_END_SCENE] as usize);
    debug!("Reset: {:X}", vmt[VMT_RESET] as usize);

    unsafe {
        let end_scene: FnEndScene = std::mem::transmute(vmt[VMT_END_SCENE]);
        let reset: FnReset = std::mem::transmute(vmt[VMT_RESET]);

        EndSceneHook.initialize(end_scene, hk_end_scene)?.enable()?;
        ResetHook.initialize(reset, hk_reset)?.enable()?;
    }

    info!("hooks installed");

    Ok(())
}
