use phantom::error::Error;
use phantom::packing::stream::Stream;
use phantom::packing::{Packer, Unpacker};

#[test]
fn mixed_field_round_trip() {
    let mut s = Stream::with_capacity(64);
    s.write(0xa, 4).unwrap();
    s.write((-3i32) as u32, 5).unwrap();
    s.write(0x1fff, 13).unwrap();
    s.flush(8).unwrap();

    let mut r = Stream::from_bytes(s.as_bytes());
    assert_eq!(r.read(4).unwrap(), 0xa);
    assert_eq!(r.read_signed(5).unwrap(), -3);
    assert_eq!(r.read(13).unwrap(), 0x1fff);
}

#[test]
fn flush_leaves_byte_alignment() {
    for bits in 1..=23usize {
        let mut s = Stream::with_capacity(16);
        s.write(1, bits).unwrap();
        s.flush(8).unwrap();
        assert_eq!(s.bit_length() % 8, 0, "bits = {bits}");
    }
}

#[test]
fn wider_alignment_pads_further() {
    let mut s = Stream::with_capacity(16);
    s.write(1, 3).unwrap();
    s.flush(32).unwrap();
    assert_eq!(s.bit_length(), 32);
    assert_eq!(s.as_bytes().len(), 4);
}

#[test]
fn many_fields_round_trip() {
    let fields: Vec<(u32, usize)> = (1..=32)
        .map(|bits| ((0xdead_beefu32 >> (32 - bits)), bits))
        .collect();

    let mut s = Stream::with_capacity(256);
    for &(v, bits) in &fields {
        s.write(v, bits).unwrap();
    }
    s.flush(8).unwrap();

    let mut r = Stream::from_bytes(s.as_bytes());
    for &(v, bits) in &fields {
        assert_eq!(r.read(bits).unwrap(), v, "width {bits}");
    }
}

#[test]
fn read_past_end_fails() {
    let mut s = Stream::with_capacity(8);
    s.write(0x3, 2).unwrap();
    s.flush(8).unwrap();

    let mut r = Stream::from_bytes(s.as_bytes());
    assert_eq!(r.read(8).unwrap(), 0b1100_0000);
    assert_eq!(r.read(1), Err(Error::InsufficientBuffer));
}

#[test]
fn write_past_capacity_fails() {
    let mut s = Stream::with_capacity(8);
    // Two words fill the buffer and the scratch accumulator.
    for _ in 0..4 {
        s.write(0xffff_ffff, 32).unwrap();
    }
    // The next spill has nowhere to land.
    assert_eq!(s.write(0xffff_ffff, 32), Err(Error::InsufficientBuffer));
}

#[test]
fn signed_values_sign_extend() {
    let mut s = Stream::with_capacity(16);
    s.write((-1i32) as u32, 7).unwrap();
    s.write(5, 7).unwrap();
    s.write((-64i32) as u32, 7).unwrap();
    s.flush(8).unwrap();

    let mut r = Stream::from_bytes(s.as_bytes());
    assert_eq!(r.read_signed(7).unwrap(), -1);
    assert_eq!(r.read_signed(7).unwrap(), 5);
    assert_eq!(r.read_signed(7).unwrap(), -64);
}

#[test]
fn packer_unpacker_wrappers() {
    let mut p = Packer::new(32);
    p.write(0x155, 9).unwrap();
    p.write_signed(-100, 12).unwrap();
    p.write_bytes(b"ok").unwrap();
    let bytes = p.finish().unwrap();

    let mut u = Unpacker::new(&bytes);
    assert_eq!(u.read(9).unwrap(), 0x155);
    assert_eq!(u.read_signed(12).unwrap(), -100);
    assert_eq!(u.read_bytes(2).unwrap(), b"ok");
}
