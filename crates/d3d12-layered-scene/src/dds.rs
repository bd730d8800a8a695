//! DDS container parsing. Pure header/offset work; the GPU upload lives in
//! `renderer::texture_loader`.

use eyre::eyre;
use eyre::Result;
use windows::Win32::Graphics::Dxgi::Common::*;

const MAGIC: u32 = 0x2053_4444; // "DDS "
const HEADER_SIZE: usize = 124;
const PIXEL_FORMAT_SIZE: u32 = 32;
const DATA_OFFSET: usize = 4 + HEADER_SIZE;
const DX10_HEADER_SIZE: usize = 20;

const DDSD_MIPMAPCOUNT: u32 = 0x2_0000;
const DDPF_ALPHAPIXELS: u32 = 0x1;
const DDPF_FOURCC: u32 = 0x4;
const DDPF_RGB: u32 = 0x40;

const FOURCC_DXT1: u32 = u32::from_le_bytes(*b"DXT1");
const FOURCC_DXT3: u32 = u32::from_le_bytes(*b"DXT3");
const FOURCC_DXT5: u32 = u32::from_le_bytes(*b"DXT5");
const FOURCC_DX10: u32 = u32::from_le_bytes(*b"DX10");

/// A parsed DDS file: dimensions, translated DXGI format, and the raw,
/// tightly packed subresource bytes (mip-major).
pub struct DdsImage<'a> {
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
    pub format: DXGI_FORMAT,
    pub data: &'a [u8],
}

pub fn parse(bytes: &[u8]) -> Result<DdsImage<'_>> {
    if bytes.len() < DATA_OFFSET {
        return Err(eyre!("file too small for a DDS header"));
    }
    if read_u32(bytes, 0) != MAGIC {
        return Err(eyre!("missing DDS magic"));
    }
    if read_u32(bytes, 4) as usize != HEADER_SIZE {
        return Err(eyre!("unexpected DDS header size"));
    }
    if read_u32(bytes, 76) != PIXEL_FORMAT_SIZE {
        return Err(eyre!("unexpected DDS pixel format size"));
    }

    let flags = read_u32(bytes, 8);
    let height = read_u32(bytes, 12);
    let width = read_u32(bytes, 16);
    let mip_count = if flags & DDSD_MIPMAPCOUNT != 0 {
        read_u32(bytes, 28).max(1)
    } else {
        1
    };
    if width == 0 || height == 0 {
        return Err(eyre!("degenerate texture extent {width}x{height}"));
    }

    let pf_flags = read_u32(bytes, 80);
    let four_cc = read_u32(bytes, 84);

    let mut data_offset = DATA_OFFSET;
    let format = if pf_flags & DDPF_FOURCC != 0 {
        match four_cc {
            FOURCC_DXT1 => DXGI_FORMAT_BC1_UNORM,
            FOURCC_DXT3 => DXGI_FORMAT_BC2_UNORM,
            FOURCC_DXT5 => DXGI_FORMAT_BC3_UNORM,
            FOURCC_DX10 => {
                if bytes.len() < DATA_OFFSET + DX10_HEADER_SIZE {
                    return Err(eyre!("file too small for a DX10 header"));
                }
                data_offset += DX10_HEADER_SIZE;
                extended_format(read_u32(bytes, DATA_OFFSET))?
            }
            other => return Err(eyre!("unsupported fourCC {:08x}", other)),
        }
    } else if pf_flags & DDPF_RGB != 0 {
        uncompressed_format(bytes, pf_flags)?
    } else {
        return Err(eyre!("unsupported DDS pixel format"));
    };

    let data = &bytes[data_offset..];
    let expected: usize = (0..mip_count)
        .map(|level| {
            let (row_bytes, rows) =
                surface_layout(format, mip_extent(width, level), mip_extent(height, level));
            row_bytes as usize * rows as usize
        })
        .sum();
    if data.len() < expected {
        return Err(eyre!(
            "truncated DDS payload: {} bytes, expected {expected}",
            data.len()
        ));
    }

    Ok(DdsImage {
        width,
        height,
        mip_count,
        format,
        data,
    })
}

/// Extent of a mip level; never collapses below one texel.
pub fn mip_extent(base: u32, level: u32) -> u32 {
    (base >> level).max(1)
}

pub fn is_block_compressed(format: DXGI_FORMAT) -> bool {
    matches!(
        format,
        DXGI_FORMAT_BC1_UNORM
            | DXGI_FORMAT_BC1_UNORM_SRGB
            | DXGI_FORMAT_BC2_UNORM
            | DXGI_FORMAT_BC2_UNORM_SRGB
            | DXGI_FORMAT_BC3_UNORM
            | DXGI_FORMAT_BC3_UNORM_SRGB
            | DXGI_FORMAT_BC7_UNORM
            | DXGI_FORMAT_BC7_UNORM_SRGB
    )
}

/// Unpadded bytes per row and row count for one surface. Block-compressed
/// formats count rows of 4x4 blocks.
pub fn surface_layout(format: DXGI_FORMAT, width: u32, height: u32) -> (u32, u32) {
    if is_block_compressed(format) {
        let block_bytes = match format {
            DXGI_FORMAT_BC1_UNORM | DXGI_FORMAT_BC1_UNORM_SRGB => 8,
            _ => 16,
        };
        (width.div_ceil(4) * block_bytes, height.div_ceil(4))
    } else {
        (width * 4, height)
    }
}

fn extended_format(raw: u32) -> Result<DXGI_FORMAT> {
    let format = DXGI_FORMAT(raw as i32);
    match format {
        DXGI_FORMAT_R8G8B8A8_UNORM
        | DXGI_FORMAT_R8G8B8A8_UNORM_SRGB
        | DXGI_FORMAT_B8G8R8A8_UNORM
        | DXGI_FORMAT_B8G8R8A8_UNORM_SRGB
        | DXGI_FORMAT_BC1_UNORM
        | DXGI_FORMAT_BC1_UNORM_SRGB
        | DXGI_FORMAT_BC2_UNORM
        | DXGI_FORMAT_BC2_UNORM_SRGB
        | DXGI_FORMAT_BC3_UNORM
        | DXGI_FORMAT_BC3_UNORM_SRGB
        | DXGI_FORMAT_BC7_UNORM
        | DXGI_FORMAT_BC7_UNORM_SRGB => Ok(format),
        _ => Err(eyre!("unsupported DXGI format {raw} in DX10 header")),
    }
}

fn uncompressed_format(bytes: &[u8], pf_flags: u32) -> Result<DXGI_FORMAT> {
    let bit_count = read_u32(bytes, 88);
    let red_mask = read_u32(bytes, 92);
    if bit_count != 32 || pf_flags & DDPF_ALPHAPIXELS == 0 {
        return Err(eyre!("only 32-bit RGBA uncompressed DDS is supported"));
    }
    match red_mask {
        0x0000_00ff => Ok(DXGI_FORMAT_R8G8B8A8_UNORM),
        0x00ff_0000 => Ok(DXGI_FORMAT_B8G8R8A8_UNORM),
        other => Err(eyre!("unsupported channel masks (red {:08x})", other)),
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_dds(
        width: u32,
        height: u32,
        mip_count: u32,
        pf_flags: u32,
        four_cc: u32,
        masks: [u32; 5],
        payload: usize,
    ) -> Vec<u8> {
        let mut bytes = vec![0u8; DATA_OFFSET + payload];
        bytes[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        bytes[4..8].copy_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
        bytes[8..12].copy_from_slice(&DDSD_MIPMAPCOUNT.to_le_bytes());
        bytes[12..16].copy_from_slice(&height.to_le_bytes());
        bytes[16..20].copy_from_slice(&width.to_le_bytes());
        bytes[28..32].copy_from_slice(&mip_count.to_le_bytes());
        bytes[76..80].copy_from_slice(&PIXEL_FORMAT_SIZE.to_le_bytes());
        bytes[80..84].copy_from_slice(&pf_flags.to_le_bytes());
        bytes[84..88].copy_from_slice(&four_cc.to_le_bytes());
        bytes[88..92].copy_from_slice(&masks[0].to_le_bytes());
        bytes[92..96].copy_from_slice(&masks[1].to_le_bytes());
        bytes[96..100].copy_from_slice(&masks[2].to_le_bytes());
        bytes[100..104].copy_from_slice(&masks[3].to_le_bytes());
        bytes[104..108].copy_from_slice(&masks[4].to_le_bytes());
        bytes
    }

    const RGBA_MASKS: [u32; 5] = [32, 0xff, 0xff00, 0xff_0000, 0xff00_0000];

    #[test]
    fn parses_uncompressed_rgba8() {
        let bytes = build_dds(2, 2, 1, DDPF_RGB | DDPF_ALPHAPIXELS, 0, RGBA_MASKS, 16);
        let image = parse(&bytes).unwrap();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(image.mip_count, 1);
        assert_eq!(image.format, DXGI_FORMAT_R8G8B8A8_UNORM);
        assert_eq!(image.data.len(), 16);
    }

    #[test]
    fn parses_dxt1_with_mips() {
        // 8x8 BC1: mip 0 = 2x2 blocks (32 bytes), mip 1 = 1x1 (8), mip 2 = 1x1 (8).
        let bytes = build_dds(8, 8, 3, DDPF_FOURCC, FOURCC_DXT1, [0; 5], 48);
        let image = parse(&bytes).unwrap();
        assert_eq!(image.format, DXGI_FORMAT_BC1_UNORM);
        assert_eq!(image.mip_count, 3);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = build_dds(2, 2, 1, DDPF_RGB | DDPF_ALPHAPIXELS, 0, RGBA_MASKS, 16);
        bytes[0] = b'X';
        assert!(parse(&bytes).is_err());
    }

    #[test]
    fn rejects_truncated_payload() {
        let bytes = build_dds(4, 4, 1, DDPF_RGB | DDPF_ALPHAPIXELS, 0, RGBA_MASKS, 32);
        assert!(parse(&bytes).is_err());
    }

    #[test]
    fn bgra_masks_map_to_bgra_format() {
        let masks = [32, 0xff_0000, 0xff00, 0xff, 0xff00_0000];
        let bytes = build_dds(1, 1, 1, DDPF_RGB | DDPF_ALPHAPIXELS, 0, masks, 4);
        assert_eq!(parse(&bytes).unwrap().format, DXGI_FORMAT_B8G8R8A8_UNORM);
    }

    #[test]
    fn surface_layout_math() {
        assert_eq!(surface_layout(DXGI_FORMAT_R8G8B8A8_UNORM, 7, 3), (28, 3));
        assert_eq!(surface_layout(DXGI_FORMAT_BC1_UNORM, 8, 8), (16, 2));
        assert_eq!(surface_layout(DXGI_FORMAT_BC3_UNORM, 5, 5), (32, 2));
        assert_eq!(surface_layout(DXGI_FORMAT_BC1_UNORM, 1, 1), (8, 1));
    }

    #[test]
    fn mip_extent_never_reaches_zero() {
        assert_eq!(mip_extent(8, 0), 8);
        assert_eq!(mip_extent(8, 3), 1);
        assert_eq!(mip_extent(8, 9), 1);
    }
}
