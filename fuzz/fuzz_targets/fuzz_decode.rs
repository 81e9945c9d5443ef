#![no_main]
use libfuzzer_sys::fuzz_target;
use pnmkit::{DecodeRequest, SamplePolicy};

fuzz_target!(|data: &[u8]| {
    // Must never panic, whatever the policy
    let _ = pnmkit::probe(data);
    for policy in [SamplePolicy::Accept, SamplePolicy::Clamp, SamplePolicy::Reject] {
        let _ = DecodeRequest::new(data)
            .with_sample_policy(policy)
            .decode(enough::Unstoppable);
    }
});
