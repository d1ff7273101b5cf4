use hsq::{Decoder, EncoderBuilder, HsqError, HsqHeader, HsqSettings};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::str::from_utf8;

#[test]
fn decode_lorem() {
    let lorem_text = include_str!("lorem.txt");
    let lorem_hsq = include_bytes!("lorem.hsq");

    let decoded = hsq::hsq_decompress(lorem_hsq).unwrap();
    let decoded_str = from_utf8(&decoded).unwrap();

    assert_eq!(decoded_str, lorem_text);
}

#[test]
fn lorem_sizes() {
    let lorem_text = include_str!("lorem.txt");
    let lorem_hsq = include_bytes!("lorem.hsq");

    let (decompressed, compressed, checksum) = hsq::hsq_get_sizes(lorem_hsq).unwrap();

    assert_eq!(decompressed as usize, lorem_text.len());
    assert_eq!(compressed as usize, lorem_hsq.len());
    assert_eq!(checksum, 0);
    assert!(hsq::is_hsq(lorem_hsq));
}

#[test]
fn decode_bad_file() {
    let bad_file = include_bytes!("bad-file.hsq");

    match hsq::hsq_decompress(bad_file) {
        Ok(result) => {
            eprintln!("{:?}", result);
            panic!("Expected error when decoding bad file");
        }
        Err(err @ HsqError::TruncatedStream(_)) => eprintln!("{}", err),
        Err(err) => panic!("Expected a truncated stream, got {}", err),
    };
}

#[test]
fn too_short_for_header() {
    for len in 0..HsqHeader::SIZE {
        let data = vec![0u8; len];
        assert!(matches!(
            hsq::hsq_decompress(&data),
            Err(HsqError::FormatError(_))
        ));
        assert!(hsq::hsq_get_sizes(&data).is_err());
        assert!(!hsq::is_hsq(&data));
    }
}

#[test]
fn minimal_fixture() {
    let data = [
        0x02, 0x00, 0x00, 0x08, 0x00, 0xA1, // header
        0x0B, 0x00, 0x4D, 0x4F, 0x00, 0x00, 0x00,
    ];
    assert!(hsq::is_hsq(&data));
    assert_eq!(hsq::hsq_decompress(&data).unwrap(), b"MO");
}

#[test]
fn exact_length_from_header() {
    let original = b"spice spice spice spice spice";
    let mut packed = hsq::hsq_compress(original).unwrap();

    // shrink the declared size; the decoder must stop there
    let header = HsqHeader::new(10, packed.len() as u16);
    packed[..HsqHeader::SIZE].copy_from_slice(&header.to_bytes());

    assert_eq!(hsq::hsq_decompress(&packed).unwrap(), &original[..10]);
}

#[test]
fn roundtrip_lorem() {
    let lorem_text = include_bytes!("lorem.txt");

    let packed = hsq::hsq_compress(lorem_text).unwrap();
    assert!(packed.len() < lorem_text.len());
    assert!(hsq::is_hsq(&packed));
    assert_eq!(hsq::hsq_decompress(&packed).unwrap(), &lorem_text[..]);
}

#[test]
fn short_reference_boundary() {
    let mut original = vec![0xA5, 0x5A];
    original.extend((0..254).map(|i| i as u8));
    original.extend_from_slice(&[0xA5, 0x5A]);

    let packed = hsq::hsq_compress(&original).unwrap();
    // 256 literals fill sixteen control words exactly. The last word holds the
    // short copy's `0000` and the end of stream's `01`, then come offset byte 0,
    // the zero long copy word, and the zero count.
    assert_eq!(
        &packed[packed.len() - 6..],
        &[0b0010_0000, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(hsq::hsq_decompress(&packed).unwrap(), original);
}

#[test]
fn roundtrip_random() {
    let mut rng = StdRng::seed_from_u64(1992);

    for &len in &[0usize, 1, 2, 3, 4, 7, 100, 1000, 9000, 30000] {
        for &alphabet in &[1u16, 2, 8, 256] {
            let data = (0..len)
                .map(|_| rng.gen_range(0..alphabet) as u8)
                .collect::<Vec<_>>();

            let packed = hsq::hsq_compress(&data).unwrap();
            let header = HsqHeader::from_bytes(&packed).unwrap();
            assert_eq!(header.checksum_sum(), 0xAB);
            assert_eq!(header.decompressed_size as usize, len);
            assert_eq!(hsq::hsq_decompress(&packed).unwrap(), data, "len {} alphabet {}", len, alphabet);

            let saved = hsq::f7_compress(&data);
            assert_eq!(hsq::f7_decompress(&saved), data, "len {} alphabet {}", len, alphabet);
        }
    }
}

#[test]
fn roundtrip_repeated_segments() {
    let mut rng = StdRng::seed_from_u64(0xF7);
    let mut data = (0..4000).map(|_| rng.gen::<u8>()).collect::<Vec<_>>();
    for _ in 0..40 {
        let src = rng.gen_range(0..data.len() - 300);
        let len = rng.gen_range(1..300);
        let dst = rng.gen_range(0..data.len());
        let segment = data[src..src + len].to_vec();
        data.splice(dst..dst, segment);
    }

    let packed = hsq::hsq_compress(&data).unwrap();
    assert!(packed.len() < data.len());

    for settings in &[
        HsqSettings::default(),
        HsqSettings::new(2, 300, 16, true),
        HsqSettings::new(64, 8192, 257, false),
    ] {
        let packed = EncoderBuilder::for_bytes(&data)
            .with_settings(*settings)
            .encode_to_vec()
            .unwrap();

        let unpacked = Decoder::for_bytes(&packed).strict(true).decode().unwrap();
        assert_eq!(unpacked, data, "{:?}", settings);
    }
}

#[test]
fn largest_input() {
    let mut rng = StdRng::seed_from_u64(65535);
    let data = (0..hsq::MAX_INPUT_SIZE)
        .map(|_| rng.gen::<u8>())
        .collect::<Vec<_>>();

    let packed = hsq::hsq_compress(&data).unwrap();
    assert_eq!(hsq::hsq_decompress(&packed).unwrap(), data);

    // random bytes grow past the 16-bit field, which keeps the low bits
    let (decompressed, compressed, _) = hsq::hsq_get_sizes(&packed).unwrap();
    assert!(packed.len() > u16::MAX as usize);
    assert_eq!(decompressed as usize, hsq::MAX_INPUT_SIZE);
    assert_eq!(compressed, packed.len() as u16);
    assert!(hsq::is_hsq(&packed));

    let too_big = vec![0u8; hsq::MAX_INPUT_SIZE + 1];
    assert!(matches!(
        hsq::hsq_compress(&too_big),
        Err(HsqError::SizeLimitExceeded { .. })
    ));
}

#[test]
fn decode_save() {
    let save = include_bytes!("save.bin");
    let save_f7 = include_bytes!("save.f7");

    assert_eq!(hsq::f7_decompress(save_f7), &save[..]);
    assert_eq!(hsq::f7_compress(save), &save_f7[..]);
}

#[test]
fn f7_examples() {
    assert_eq!(hsq::f7_compress(&[0xF7]), vec![0xF7, 0x01, 0xF7]);
    assert_eq!(hsq::f7_decompress(&[0xF7, 0x01, 0xF7]), vec![0xF7]);
    assert_eq!(hsq::f7_compress(&[0xAA, 0xAA, 0xAA]), vec![0xAA, 0xAA, 0xAA]);
    assert_eq!(hsq::f7_compress(&[0xAA, 0xAA, 0xAA, 0xAA]), vec![0xF7, 0x04, 0xAA]);
}
