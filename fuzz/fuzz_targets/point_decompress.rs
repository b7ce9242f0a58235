#![no_main]

use libfuzzer_sys::fuzz_target;
use sharephrase_vss::point::{compress_point, decompress_point};
use sharephrase_vss::{Curve, P256};

fuzz_target!(|data: &[u8]| {
    let curve = P256::new();
    if let Ok(point) = decompress_point(curve.params(), data) {
        // Anything that decompresses is on the curve and compresses back
        assert!(curve.is_on_curve(&point));
        assert_eq!(&compress_point(&point)[..], data);
    }
});
