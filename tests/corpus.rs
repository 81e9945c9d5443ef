//! Hand-built fixtures: header grammar, sample widths and malformed input.

use enough::Unstoppable;
use pnmkit::*;

fn checkerboard(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * bpp;
            for c in 0..bpp {
                pixels[off + c] = if (x + y) % 2 == 0 {
                    200 + (c as u8 * 20)
                } else {
                    10 + (c as u8 * 30)
                };
            }
        }
    }
    pixels
}

fn with_header(header: &str, body: &[u8]) -> Vec<u8> {
    let mut data = header.as_bytes().to_vec();
    data.extend_from_slice(body);
    data
}

// ── Header grammar ───────────────────────────────────────────────────

#[test]
fn comments_between_pgm_tokens() {
    let body = [1u8, 2, 3, 4, 5, 6];
    let plain = decode(&with_header("P5\n3 2\n255\n", &body), Unstoppable).unwrap();
    let commented = decode(
        &with_header("P5\n# creator: hand\n3\n# h\n2 # trailing\n255\n", &body),
        Unstoppable,
    )
    .unwrap();
    assert_eq!(plain, commented);
}

#[test]
fn comments_inside_plain_samples() {
    let decoded = decode(b"P2\n2 2\n9\n1 2 # first row\n# skipped\n3 4\n", Unstoppable).unwrap();
    assert_eq!(decoded.raster.samples(), &[1, 2, 3, 4]);
}

#[test]
fn comment_right_after_maxval() {
    let plain = decode(b"P2 1 1 255# c\n7\n", Unstoppable).unwrap();
    assert_eq!(plain.raster.samples(), &[7]);

    let raw = decode(b"P5 1 1 255# c\n\x07", Unstoppable).unwrap();
    assert_eq!(raw.header, plain.header);
    assert_eq!(raw.raster, plain.raster);

    // The comment's newline is the separator; the next byte is a sample.
    let newline_sample = decode(b"P5 1 1 255#\n\n", Unstoppable).unwrap();
    assert_eq!(newline_sample.raster.samples(), &[b'\n']);
}

#[test]
fn unknown_magic_rejected() {
    let err = decode(b"P9\n1 1\n255\n", Unstoppable).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFormat);

    let err = decode(b"GIF89a", Unstoppable).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFormat);
}

#[test]
fn header_ends_early() {
    let err = decode(b"P6\n4 4", Unstoppable).unwrap_err();
    assert!(matches!(err, PnmError::UnexpectedEof { offset: 6 }));
}

#[test]
fn ppm_depth_is_fixed() {
    let info = probe(b"P3\n1 1\n7\n1 2 3\n").unwrap();
    assert_eq!(info.header.depth, 3);
    assert_eq!(info.header.tupltype, TupleType::Rgb);
}

#[test]
fn pam_missing_width() {
    let err = decode(b"P7\nHEIGHT 1\nDEPTH 1\nMAXVAL 255\nENDHDR\n\x00", Unstoppable).unwrap_err();
    match err {
        PnmError::MissingHeaderField { field } => assert_eq!(field, "WIDTH"),
        other => panic!("expected MissingHeaderField, got {other:?}"),
    }
}

#[test]
fn pam_zero_depth_rejected() {
    let err = decode(b"P7\nWIDTH 1\nHEIGHT 1\nDEPTH 0\nMAXVAL 255\nENDHDR\n", Unstoppable)
        .unwrap_err();
    assert!(matches!(
        err,
        PnmError::InvalidHeaderValue { field: "depth", .. }
    ));
}

// ── Sample width ─────────────────────────────────────────────────────

#[test]
fn maxval_255_uses_one_byte_samples() {
    let decoded = decode(b"P5\n2 1\n255\n\x01\x02", Unstoppable).unwrap();
    assert_eq!(decoded.raster.sample_bytes(), 1);
    assert_eq!(decoded.raster.sample(0, 0, 0), 1);
    assert_eq!(decoded.raster.sample(1, 0, 0), 2);
}

#[test]
fn maxval_256_uses_two_byte_big_endian_samples() {
    let decoded = decode(b"P5\n2 1\n256\n\x01\x02\x00\xff", Unstoppable).unwrap();
    assert_eq!(decoded.raster.sample_bytes(), 2);
    assert_eq!(decoded.raster.sample(0, 0, 0), 0x0102);
    assert_eq!(decoded.raster.sample(1, 0, 0), 0x00ff);
}

#[test]
fn maxval_256_with_one_byte_samples_is_truncated() {
    let err = decode(b"P5\n2 1\n256\n\x01\x02", Unstoppable).unwrap_err();
    assert!(matches!(
        err,
        PnmError::TruncatedSampleData {
            expected_bytes: 4,
            available_bytes: 2
        }
    ));
}

#[test]
fn sixteen_bit_pam_rgba() {
    let mut body = Vec::new();
    for v in [1u16, 2, 3, 65535, 300, 400, 500, 0] {
        body.extend_from_slice(&v.to_be_bytes());
    }
    let data = with_header(
        "P7\nWIDTH 2\nHEIGHT 1\nDEPTH 4\nMAXVAL 65535\nTUPLTYPE RGB_ALPHA\nENDHDR\n",
        &body,
    );
    let decoded = decode(&data, Unstoppable).unwrap();
    assert_eq!(decoded.raster.depth(), 4);
    assert_eq!(decoded.raster.sample(0, 0, 3), 65535);
    assert_eq!(decoded.raster.sample(1, 0, 2), 500);
    let reencoded = encode(&decoded.header, decoded.format, &decoded.raster, Unstoppable).unwrap();
    assert_eq!(reencoded, data);
}

// ── Malformed samples ────────────────────────────────────────────────

#[test]
fn truncated_binary_graymap() {
    let err = decode(b"P5\n2 2\n255\n\x01\x02", Unstoppable).unwrap_err();
    match err {
        PnmError::TruncatedSampleData {
            expected_bytes,
            available_bytes,
        } => {
            assert_eq!(expected_bytes, 4);
            assert_eq!(available_bytes, 2);
        }
        other => panic!("expected TruncatedSampleData, got {other:?}"),
    }
}

#[test]
fn truncated_packed_bitmap() {
    // 9 pixels wide needs two bytes per row.
    let err = decode(b"P4\n9 2\n\x00\x00\x00", Unstoppable).unwrap_err();
    assert!(matches!(
        err,
        PnmError::TruncatedSampleData {
            expected_bytes: 4,
            available_bytes: 3
        }
    ));
}

#[test]
fn plain_pixmap_sample_count() {
    let err = decode(b"P3\n1 2\n255\n1 2 3 4 5\n", Unstoppable).unwrap_err();
    assert!(matches!(
        err,
        PnmError::SampleCountMismatch {
            expected: 6,
            actual: 5
        }
    ));

    let err = decode(b"P1\n2 2\n0101 1\n", Unstoppable).unwrap_err();
    assert!(matches!(
        err,
        PnmError::SampleCountMismatch {
            expected: 4,
            actual: 5
        }
    ));
}

#[test]
fn sample_policy_is_opt_in() {
    let data = b"P6\n1 1\n100\n\x10\x80\x20";
    let accepted = decode(data, Unstoppable).unwrap();
    assert_eq!(accepted.raster.sample(0, 0, 1), 0x80);

    let err = DecodeRequest::new(data)
        .with_sample_policy(SamplePolicy::Reject)
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(
        err,
        PnmError::SampleOutOfRange {
            index: 1,
            value: 128,
            maxval: 100
        }
    ));

    let clamped = DecodeRequest::new(data)
        .with_sample_policy(SamplePolicy::Clamp)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(clamped.raster.samples(), &[0x10, 100, 0x20]);
}

// ── Patterns ─────────────────────────────────────────────────────────

#[test]
fn checkerboard_ppm_plain_and_binary() {
    let pixels = checkerboard(8, 6, 3);
    let header = Header::ppm(8, 6, 255);
    for format in [PnmFormat::PpmAscii, PnmFormat::PpmBinary] {
        let raster = Raster::new(&header, format, pixels.clone()).unwrap();
        let encoded = encode(&header, format, &raster, Unstoppable).unwrap();
        let decoded = decode(&encoded, Unstoppable).unwrap();
        assert_eq!(decoded.raster.samples(), &pixels[..]);
    }
}

#[test]
fn wide_bitmap_rows_are_byte_aligned() {
    let header = Header::pbm(75, 3);
    let mut raster = Raster::blank(&header, PnmFormat::PbmAscii).unwrap();
    for x in (0..75).step_by(3) {
        raster.set_sample(x, 1, 0, 1);
    }
    assert_eq!(raster.samples().len(), 10 * 3);

    for format in [PnmFormat::PbmAscii, PnmFormat::PbmBinary] {
        let encoded = encode(&header, format, &raster, Unstoppable).unwrap();
        let decoded = decode(&encoded, Unstoppable).unwrap();
        assert_eq!(decoded.raster, raster, "{format}");
    }
}

#[test]
fn pixel_editing_on_a_blank_canvas() {
    let header = Header::pam(16, 16, 3, 255, TupleType::Rgb);
    let mut raster = Raster::blank(&header, PnmFormat::Pam).unwrap();
    let (cx, cy) = (8i64, 8i64);
    for d in -20..20 {
        // Off-canvas writes are dropped.
        raster.set_pixel(cx + d, cy - d, 0x0000ff);
    }
    assert_eq!(raster.pixel(0, 16), 0);
    assert_eq!(raster.pixel(3, 13), 0x0000ff);
    assert_eq!(raster.pixel(-5, 21), 0);

    let encoded = encode(&header, PnmFormat::Pam, &raster, Unstoppable).unwrap();
    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.raster, raster);
}
