use std::path::Path;

use tracing::warn;
use widestring::U16CString;
use windows::core::*;
use windows::Win32::Foundation::E_INVALIDARG;
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::*;

/// Compiles one entry point of an HLSL file. Compiler diagnostics are logged
/// — including warnings on success — but only a failed compile is an error;
/// pipeline creation is where a missing blob becomes fatal.
pub fn compile_shader(
    hlsl_path: &Path,
    defines: Option<&[D3D_SHADER_MACRO]>,
    entry_point: PCSTR,
    target: PCSTR,
) -> Result<ID3DBlob> {
    let compile_flags = if cfg!(debug_assertions) {
        D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
    } else {
        0
    };

    let wide_path = U16CString::from_os_str(hlsl_path.as_os_str())
        .map_err(|_| Error::new(E_INVALIDARG, "shader path contains an interior NUL"))?;

    let mut shader_blob = None;
    let mut error_blob = None;
    let result = unsafe {
        D3DCompileFromFile(
            PCWSTR(wide_path.as_ptr()),
            defines.map(|d| d.as_ptr()),
            None, // Include handler
            entry_point,
            target,
            compile_flags,
            0,
            &mut shader_blob,
            Some(&mut error_blob),
        )
    };

    // The error blob carries warnings even when compilation succeeds.
    if let Some(diagnostics) = &error_blob {
        let message = unsafe {
            String::from_utf8_lossy(std::slice::from_raw_parts(
                diagnostics.GetBufferPointer() as *const u8,
                diagnostics.GetBufferSize(),
            ))
            .trim()
            .to_string()
        };
        if !message.is_empty() {
            let entry_point_str = unsafe { String::from_utf8_lossy(entry_point.as_bytes()) };
            warn!("shader compiler ({entry_point_str}): {message}");
        }
    }

    result?;
    Ok(shader_blob.unwrap())
}
