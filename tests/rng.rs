use phantom::error::Error;
use phantom::rng::Csprng;

#[test]
fn seeded_generator_is_deterministic() {
    let mut a = Csprng::from_seed([7u8; 32]);
    let mut b = Csprng::from_seed([7u8; 32]);

    let mut x = [0u8; 100];
    let mut y = [0u8; 100];
    a.get_mem(&mut x).unwrap();
    b.get_mem(&mut y).unwrap();
    assert_eq!(x, y);

    // Output advances between requests.
    let mut z = [0u8; 100];
    a.get_mem(&mut z).unwrap();
    assert_ne!(x, z);
}

#[test]
fn different_seeds_diverge() {
    let mut a = Csprng::from_seed([1u8; 32]);
    let mut b = Csprng::from_seed([2u8; 32]);

    let mut x = [0u8; 64];
    let mut y = [0u8; 64];
    a.get_mem(&mut x).unwrap();
    b.get_mem(&mut y).unwrap();
    assert_ne!(x, y);
}

#[test]
fn get_u32_consumes_stream() {
    let mut a = Csprng::from_seed([9u8; 32]);
    let v1 = a.get_u32().unwrap();
    let v2 = a.get_u32().unwrap();
    assert_ne!(v1, v2);
}

#[test]
fn os_entropy_generator_produces_output() {
    let mut rng = Csprng::from_os().unwrap();
    let mut buf = [0u8; 64];
    rng.get_mem(&mut buf).unwrap();
    assert_ne!(buf, [0u8; 64]);
}

#[test]
fn failing_entropy_callback_is_reported() {
    fn broken(_: &mut [u8]) -> bool {
        false
    }
    assert!(matches!(Csprng::make(1024, broken), Err(Error::EntropyFailure)));
}

#[test]
fn reseed_period_triggers_callback() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counting(buf: &mut [u8]) -> bool {
        CALLS.fetch_add(1, Ordering::SeqCst);
        buf.fill(0x5a);
        true
    }

    let mut rng = Csprng::make(128, counting).unwrap();
    let initial = CALLS.load(Ordering::SeqCst);

    // Draw well past the 128-byte reseed period.
    let mut buf = [0u8; 64];
    for _ in 0..10 {
        rng.get_mem(&mut buf).unwrap();
    }

    assert!(CALLS.load(Ordering::SeqCst) > initial);
}
