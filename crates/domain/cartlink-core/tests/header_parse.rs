use cartlink_core::{header_checksum, write_header, CartridgeHeader, HeaderError, HEADER_END};

fn cartridge(title: &str) -> Vec<u8> {
    let mut image = vec![0u8; 0x8000];
    write_header(&mut image, title).unwrap();
    image
}

#[test]
fn parses_title_and_codes() {
    let mut image = cartridge("TETRIS");
    image[0x0147] = 0x01;
    image[0x0148] = 0x01;
    // Re-sign after touching header bytes.
    write_header(&mut image, "TETRIS").unwrap();

    let header = CartridgeHeader::parse(&image).unwrap();
    assert_eq!(header.title, "TETRIS");
    assert_eq!(header.cartridge_type, 0x01);
    assert_eq!(header.rom_size_bytes(), Some(0x10000));
    assert!(!header.is_cgb());
}

#[test]
fn short_image_is_rejected() {
    let err = CartridgeHeader::parse(&[0u8; 99]).unwrap_err();
    assert_eq!(err, HeaderError::TooShort { len: 99 });

    let err = CartridgeHeader::parse(&vec![0u8; HEADER_END - 1]).unwrap_err();
    assert!(matches!(err, HeaderError::TooShort { .. }));
}

#[test]
fn missing_logo_is_rejected() {
    let mut image = cartridge("GAME");
    image[0x0104] ^= 0xFF;
    assert_eq!(
        CartridgeHeader::parse(&image).unwrap_err(),
        HeaderError::LogoMismatch
    );
}

#[test]
fn corrupted_checksum_is_rejected() {
    let mut image = cartridge("GAME");
    image[0x014D] = image[0x014D].wrapping_add(1);
    assert!(matches!(
        CartridgeHeader::parse(&image),
        Err(HeaderError::ChecksumMismatch { .. })
    ));
}

#[test]
fn title_stops_at_first_nul() {
    let image = cartridge("POKEMON RED");
    assert_eq!(CartridgeHeader::parse(&image).unwrap().title, "POKEMON RED");
}

#[test]
fn short_buffers_are_refused_instead_of_panicking() {
    let mut small = vec![0u8; 0x0140];
    assert_eq!(
        write_header(&mut small, "TETRIS"),
        Err(HeaderError::TooShort { len: 0x0140 })
    );
    assert!(small.iter().all(|&b| b == 0));
    assert_eq!(
        header_checksum(&small),
        Err(HeaderError::TooShort { len: 0x0140 })
    );

    let image = cartridge("TETRIS");
    assert_eq!(header_checksum(&image), Ok(image[0x014D]));
}
