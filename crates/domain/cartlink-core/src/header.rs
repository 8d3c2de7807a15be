//! Game Boy cartridge header (`0x0100..0x0150`).

use serde::Serialize;

/// Logo bitmap every licensed cartridge carries at `0x0104`.
pub const NINTENDO_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

pub const HEADER_END: usize = 0x0150;

const LOGO: std::ops::Range<usize> = 0x0104..0x0134;
const TITLE: std::ops::Range<usize> = 0x0134..0x0144;
const CGB_FLAG: usize = 0x0143;
const CARTRIDGE_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;
const HEADER_CHECKSUM: usize = 0x014D;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("image is {len} bytes, too short to hold a cartridge header")]
    TooShort { len: usize },
    #[error("logo check failed")]
    LogoMismatch,
    #[error("header checksum mismatch (header says {expected:#04x}, computed {computed:#04x})")]
    ChecksumMismatch { expected: u8, computed: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartridgeHeader {
    pub title: String,
    pub cgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub header_checksum: u8,
}

impl CartridgeHeader {
    pub fn parse(image: &[u8]) -> Result<Self, HeaderError> {
        if image.len() < HEADER_END {
            return Err(HeaderError::TooShort { len: image.len() });
        }

        if image[LOGO] != NINTENDO_LOGO {
            return Err(HeaderError::LogoMismatch);
        }

        let expected = image[HEADER_CHECKSUM];
        let computed = header_checksum(image)?;
        if expected != computed {
            return Err(HeaderError::ChecksumMismatch { expected, computed });
        }

        let title = image[TITLE]
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect::<String>()
            .trim_end()
            .to_string();

        Ok(Self {
            title,
            cgb_flag: image[CGB_FLAG],
            cartridge_type: image[CARTRIDGE_TYPE],
            rom_size_code: image[ROM_SIZE],
            ram_size_code: image[RAM_SIZE],
            header_checksum: expected,
        })
    }

    /// ROM size in bytes as declared by the header (`32 KiB << code`).
    pub fn rom_size_bytes(&self) -> Option<usize> {
        (self.rom_size_code <= 8).then(|| 0x8000usize << self.rom_size_code)
    }

    pub fn is_cgb(&self) -> bool {
        self.cgb_flag & 0x80 != 0
    }
}

/// Header checksum over `0x0134..=0x014C`.
pub fn header_checksum(image: &[u8]) -> Result<u8, HeaderError> {
    if image.len() < HEADER_END {
        return Err(HeaderError::TooShort { len: image.len() });
    }
    Ok(image[0x0134..=0x014C]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1)))
}

/// Write a valid header with `title` into `image`. Titles longer than the
/// title field are truncated.
pub fn write_header(image: &mut [u8], title: &str) -> Result<(), HeaderError> {
    if image.len() < HEADER_END {
        return Err(HeaderError::TooShort { len: image.len() });
    }
    image[LOGO].copy_from_slice(&NINTENDO_LOGO);
    let title_bytes = title.as_bytes();
    let n = title_bytes.len().min(TITLE.len());
    image[TITLE].fill(0);
    image[TITLE.start..TITLE.start + n].copy_from_slice(&title_bytes[..n]);
    image[HEADER_CHECKSUM] = header_checksum(image)?;
    Ok(())
}
