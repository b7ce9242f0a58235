#![no_main]

use libfuzzer_sys::fuzz_target;
use sharephrase_vss::{PedersenVss, Share};

fuzz_target!(|data: &[u8]| {
    // Arbitrary text as a two-line share. Verify, inspect and reconstruct
    // must return Ok or Err, never panic.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(share) = Share::from_text(text) else {
        return;
    };

    let vss = PedersenVss::new();
    let _ = vss.inspect_share(&share);
    let _ = vss.verify_share(&share);
    let _ = vss.reconstruct_secret(std::slice::from_ref(&share));
});
