use eyre::Result;
use tracing::error;
use tracing::warn;
use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::Win32::Graphics::Gdi::HBRUSH;
use windows::Win32::System::LibraryLoader::*;
use windows::Win32::UI::Input::KeyboardAndMouse::ReleaseCapture;
use windows::Win32::UI::Input::KeyboardAndMouse::SetCapture;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::dx_sample::build_command_line;
use crate::dx_sample::DXSample;

/// Creates the window, binds the sample to it, and pumps messages, calling
/// `update` + `render` whenever the queue is idle.
pub fn run_sample<S>() -> Result<()>
where
    S: DXSample,
{
    let instance = unsafe { GetModuleHandleA(None)? };

    let wc = WNDCLASSEXA {
        cbSize: std::mem::size_of::<WNDCLASSEXA>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wndproc::<S>),
        hInstance: instance.into(),
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW)? },
        lpszClassName: s!("RustWindowClass"),
        hbrBackground: HBRUSH::default(),
        ..Default::default()
    };

    let command_line = build_command_line();
    // The window's userdata points at this value, so it must stay put for
    // the whole message loop.
    let (mut sample, info_queue) = S::new(&command_line)?;

    let size = sample.window_size();

    let atom = unsafe { RegisterClassExA(&wc) };
    debug_assert_ne!(atom, 0, "Failed to register window class");

    let mut window_rect = RECT {
        left: 0,
        top: 0,
        right: size.0,
        bottom: size.1,
    };
    unsafe { AdjustWindowRect(&mut window_rect, WS_OVERLAPPEDWINDOW, false)? };

    let mut title = sample.title();
    if command_line.use_warp_device {
        title.push_str(" (WARP)");
    }
    title.push('\0');

    let hwnd = unsafe {
        CreateWindowExA(
            WINDOW_EX_STYLE::default(),
            s!("RustWindowClass"),
            PCSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
            None,
            None,
            Some(instance.into()),
            Some(&mut sample as *mut _ as _),
        )
    }?;

    if let Err(e) = sample.bind_to_window(&hwnd) {
        // Surface whatever the debug layer collected before bailing out.
        print_dxgi_debug_messages(&info_queue);
        return Err(e);
    }

    unsafe { _ = ShowWindow(hwnd, SW_SHOW) };

    let mut done = false;
    while !done {
        let mut message = MSG::default();
        if unsafe { PeekMessageA(&mut message, None, 0, 0, PM_REMOVE) }.into() {
            unsafe {
                _ = TranslateMessage(&message);
                DispatchMessageA(&message);
            }
            if message.message == WM_QUIT {
                done = true;
            }
        } else {
            sample.update();
            if let Err(e) = sample.render() {
                error!("render error: {e:?}");
                print_dxgi_debug_messages(&info_queue);
            }
        }
    }

    sample.on_destroy();

    Ok(())
}

/// Drains the DXGI info queue into the log. Only populated in debug builds
/// with the debug layer available.
pub fn print_dxgi_debug_messages(info_queue: &Option<IDXGIInfoQueue>) {
    let Some(queue) = info_queue else {
        return;
    };
    let num_messages = unsafe { queue.GetNumStoredMessages(DXGI_DEBUG_ALL) };

    for i in 0..num_messages {
        let mut message_size: usize = 0;
        if unsafe { queue.GetMessage(DXGI_DEBUG_ALL, i, None, &mut message_size) }.is_err() {
            warn!("error getting size for DXGI message {i}");
            continue;
        }

        let mut message_buffer: Vec<u8> = vec![0; message_size];
        let p_message: *mut DXGI_INFO_QUEUE_MESSAGE =
            message_buffer.as_mut_ptr() as *mut DXGI_INFO_QUEUE_MESSAGE;

        if unsafe { queue.GetMessage(DXGI_DEBUG_ALL, i, Some(p_message), &mut message_size) }
            .is_ok()
        {
            unsafe {
                let description_slice = std::slice::from_raw_parts(
                    (*p_message).pDescription as *const u8,
                    (*p_message).DescriptionByteLength,
                );
                let description = String::from_utf8_lossy(description_slice)
                    .trim()
                    .to_string();

                let severity = match (*p_message).Severity {
                    DXGI_INFO_QUEUE_MESSAGE_SEVERITY_CORRUPTION => "CORRUPTION",
                    DXGI_INFO_QUEUE_MESSAGE_SEVERITY_ERROR => "ERROR",
                    DXGI_INFO_QUEUE_MESSAGE_SEVERITY_WARNING => "WARNING",
                    DXGI_INFO_QUEUE_MESSAGE_SEVERITY_INFO => "INFO",
                    DXGI_INFO_QUEUE_MESSAGE_SEVERITY_MESSAGE => "MESSAGE",
                    _ => "UNKNOWN",
                };

                warn!("DXGI debug [{severity} ID:{}]: {description}", (*p_message).ID);
            }
        } else {
            warn!("error getting data for DXGI message {i}");
        }
    }
    unsafe { queue.ClearStoredMessages(DXGI_DEBUG_ALL) };
}

fn mouse_position(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xffff) as u16 as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xffff) as u16 as i16 as i32;
    (x, y)
}

fn sample_wndproc<S: DXSample>(
    sample: &mut S,
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> bool {
    match message {
        WM_KEYDOWN => {
            sample.on_key_down(wparam.0 as u8);
            true
        }
        WM_KEYUP => {
            sample.on_key_up(wparam.0 as u8);
            true
        }
        WM_LBUTTONDOWN => {
            // Keep receiving move messages while the drag leaves the client
            // area.
            unsafe { _ = SetCapture(window) };
            let (x, y) = mouse_position(lparam);
            sample.on_mouse_down(x, y);
            true
        }
        WM_LBUTTONUP => {
            unsafe { _ = ReleaseCapture() };
            let (x, y) = mouse_position(lparam);
            sample.on_mouse_up(x, y);
            true
        }
        WM_MOUSEMOVE => {
            let (x, y) = mouse_position(lparam);
            sample.on_mouse_move(x, y);
            true
        }
        WM_PAINT => {
            // Rendering happens from the idle loop; let DefWindowProc
            // validate the window region.
            false
        }
        _ => false,
    }
}

extern "system" fn wndproc<S: DXSample>(
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if message == WM_CREATE {
        unsafe {
            let create_struct: &CREATESTRUCTA = &*(lparam.0 as *const CREATESTRUCTA);
            SetWindowLongPtrA(window, GWLP_USERDATA, create_struct.lpCreateParams as _);
        }
        return LRESULT(0);
    }

    let user_data = unsafe { GetWindowLongPtrA(window, GWLP_USERDATA) };
    if user_data == 0 {
        // Messages can arrive before WM_CREATE or after WM_DESTROY.
        return unsafe { DefWindowProcA(window, message, wparam, lparam) };
    }

    let sample_ptr = user_data as *mut S;
    // Safety: user_data is the sample pointer installed by run_sample and
    // outlives the message loop.
    let sample = unsafe { &mut *sample_ptr };

    let handled = match message {
        WM_DESTROY => {
            // on_destroy runs explicitly after the message loop exits.
            unsafe { PostQuitMessage(0) };
            true
        }
        _ => sample_wndproc(sample, window, message, wparam, lparam),
    };

    if handled {
        LRESULT(0)
    } else {
        unsafe { DefWindowProcA(window, message, wparam, lparam) }
    }
}
