#![no_main]

use libfuzzer_sys::fuzz_target;
use sharephrase_vss::payload::{Metadata, ShareData};
use sharephrase_vss::{Curve, P256};

fuzz_target!(|data: &[u8]| {
    let _ = ShareData::from_bytes(data);

    // A parsed share payload must survive re-serialization
    if let Ok(share) = ShareData::from_bytes(data) {
        let bytes = share.to_bytes();
        let _ = ShareData::from_bytes(&bytes);
    }

    let curve = P256::new();
    if let Ok(metadata) = Metadata::from_bytes(curve.params(), data) {
        let bytes = metadata.to_bytes();
        let _ = Metadata::from_bytes(curve.params(), &bytes);
    }
});
