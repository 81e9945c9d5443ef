#![no_main]
use libfuzzer_sys::fuzz_target;
use pnmkit::*;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode, in every format of its family,
    // to something that decodes to the same header and raster
    let Ok(decoded) = decode(data, enough::Unstoppable) else {
        return;
    };

    for format in PnmFormat::ALL {
        if format.family() != decoded.format.family() {
            continue;
        }
        let encoded = encode(&decoded.header, format, &decoded.raster, enough::Unstoppable)
            .expect("decoded raster failed to encode");
        let again = decode(&encoded, enough::Unstoppable).expect("re-encoded data failed to decode");
        assert_eq!(again.header, decoded.header);
        assert_eq!(again.raster, decoded.raster, "roundtrip mismatch via {format}");
    }
});
