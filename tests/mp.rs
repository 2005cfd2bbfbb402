use phantom::core::mpz::{ByteOrder, Mpz};
use phantom::core::reduction::{ModContext, Reduction, Visibility};
use phantom::error::Error;

use proptest::prelude::*;

type Z = Mpz<u64>;

fn z(s: &str) -> Z {
    Mpz::from_str_radix(s, 10).unwrap()
}

#[test]
fn add_sub_round_trip() {
    let a = z("123456789012345678901234567890123456789");
    let b = z("98765432109876543210987654321");

    let sum = a.add_ref(&b);
    assert_eq!(sum.sub_ref(&b), a);
    assert_eq!(sum.sub_ref(&a), b);
}

#[test]
fn divrem_identity() {
    let n = z("340282366920938463463374607431768211455123456789");
    let d = z("18446744073709551557");

    let (q, r) = n.divrem(&d).unwrap();
    assert_eq!(q.mul_ref(&d).add_ref(&r), n);
    assert!(r.cmp_abs(&d) == std::cmp::Ordering::Less);
    assert!(!r.is_negative());
}

#[test]
fn division_by_zero_reported() {
    let n = z("42");
    assert_eq!(n.divrem(&Mpz::new()), Err(Error::DivideByZero));
}

#[test]
fn shift_round_trip() {
    let a = z("982451653000000000000000000001");
    for k in [0usize, 1, 7, 64, 65, 200] {
        assert_eq!(a.shl_bits(k).shr_bits(k), a);
    }
}

#[test]
fn gcd_known_values() {
    assert_eq!(z("48").gcd(&z("180")), z("12"));
    assert_eq!(z("17").gcd(&z("31")), z("1"));
    assert_eq!(Mpz::<u64>::new().gcd(&z("77")), z("77"));
}

#[test]
fn gcdext_bezout_identity() {
    let a = z("240");
    let b = z("46");
    let (g, s, t) = a.gcdext(&b);

    assert_eq!(g, z("2"));
    assert_eq!(s.mul_ref(&a).add_ref(&t.mul_ref(&b)), g);
}

#[test]
fn invert_multiplies_to_one() {
    let m = z("1000000007");
    for a in ["2", "3", "999999999", "123456789"] {
        let a = z(a);
        let inv = a.invert(&m).unwrap();
        let (_, r) = a.mul_ref(&inv).divrem(&m).unwrap();
        assert!(r.is_one());
    }
}

#[test]
fn invert_non_coprime_fails() {
    let m = z("100");
    assert_eq!(z("10").invert(&m), Err(Error::NonInvertible));
}

#[test]
fn string_io_all_bases() {
    let v = z("123456789012345678901234567890");

    for base in [2u32, 8, 10, 16, 32, 64] {
        let s = v.to_str_radix(base).unwrap();
        assert_eq!(Mpz::<u64>::from_str_radix(&s, base).unwrap(), v);
    }

    let neg = z("-123456789");
    let s = neg.to_str_radix(16).unwrap();
    assert!(s.starts_with('-'));
    assert_eq!(Mpz::<u64>::from_str_radix(&s, 16).unwrap(), neg);
}

#[test]
fn sizeinbase_exact_for_two_powers() {
    let v = Mpz::<u64>::from_str_radix("ffff", 16).unwrap();
    assert_eq!(v.sizeinbase(2), 16);
    assert_eq!(v.sizeinbase(16), 4);
    assert_eq!(v.sizeinbase(4), 8);

    // Base 10 is an upper bound, never smaller than exact.
    let exact = v.to_str_radix(10).unwrap().len();
    assert!(v.sizeinbase(10) >= exact);
}

#[test]
fn byte_io_both_orders() {
    let v = z("1311768467463790320");
    let be = v.to_bytes(ByteOrder::BigEndian, 8).unwrap();
    let le = v.to_bytes(ByteOrder::LittleEndian, 8).unwrap();

    assert_eq!(be.iter().rev().copied().collect::<Vec<_>>(), le);
    assert_eq!(Mpz::<u64>::from_bytes(&be, ByteOrder::BigEndian), v);
    assert_eq!(Mpz::<u64>::from_bytes(&le, ByteOrder::LittleEndian), v);
}

#[test]
fn byte_io_rejects_short_buffer() {
    let v = z("65536");
    assert_eq!(v.to_bytes(ByteOrder::BigEndian, 2), Err(Error::InsufficientBuffer));
}

#[test]
fn limb_widths_agree() {
    let hex = "f3a9c1d2e4b5061728394a5b6c7d8e9f102132435465768798a9bacbdcedfe0f";
    let a64 = Mpz::<u64>::from_str_radix(hex, 16).unwrap();
    let a32 = Mpz::<u32>::from_str_radix(hex, 16).unwrap();
    let a16 = Mpz::<u16>::from_str_radix(hex, 16).unwrap();
    let a8 = Mpz::<u8>::from_str_radix(hex, 16).unwrap();

    let sq64 = a64.square().to_str_radix(16).unwrap();
    assert_eq!(a32.square().to_str_radix(16).unwrap(), sq64);
    assert_eq!(a16.square().to_str_radix(16).unwrap(), sq64);
    assert_eq!(a8.square().to_str_radix(16).unwrap(), sq64);
}

#[test]
fn barrett_equals_montgomery() {
    let m = z("170141183460469231731687303715884105727");
    let barrett = ModContext::new(m.clone(), Reduction::Barrett).unwrap();
    let mont = ModContext::new(m.clone(), Reduction::Montgomery).unwrap();

    let a = z("99999999999999999999999999999999999999999999999999999999");
    let expect = a.mod_positive(&m).unwrap();

    assert_eq!(barrett.reduce_barrett(&a).unwrap(), expect);

    let am = mont.to_mont(&a).unwrap();
    assert_eq!(mont.from_mont(&am), expect);
}

#[test]
fn montgomery_multiplication_consistent() {
    let m = z("57896044618658097711785492504343953926634992332820282019728792003956564819949");
    let ctx = ModContext::new(m.clone(), Reduction::Montgomery).unwrap();

    let a = z("123456789123456789123456789");
    let b = z("987654321987654321987654321");

    let am = ctx.to_mont(&a).unwrap();
    let bm = ctx.to_mont(&b).unwrap();
    let prod = ctx.from_mont(&ctx.mul_mont(&am, &bm));

    assert_eq!(prod, a.mul_ref(&b).mod_positive(&m).unwrap());
}

#[test]
fn pow_mod_ladder_matches_public_path() {
    let m = z("1000000000000000003");
    let ctx = ModContext::new(m, Reduction::Montgomery).unwrap();

    let base = z("31337");
    let exp = z("982451653982451653");

    let pub_r = ctx.pow_mod(&base, &exp, Visibility::Public).unwrap();
    let sec_r = ctx.pow_mod(&base, &exp, Visibility::Secret).unwrap();
    assert_eq!(pub_r, sec_r);
}

#[test]
fn sqrt_mod_round_trip() {
    // p ≡ 1 (mod 4) exercises the full Tonelli–Shanks loop.
    let p = z("1000000009");
    let ctx = ModContext::new(p.clone(), Reduction::Barrett).unwrap();

    let x = z("123456789");
    let xx = x.mul_ref(&x).mod_positive(&p).unwrap();

    let root = ctx.sqrt_mod(&xx).unwrap();
    assert_eq!(root.mul_ref(&root).mod_positive(&p).unwrap(), xx);
}

#[test]
fn sqrt_mod_rejects_non_residue() {
    let p = z("23");
    let ctx = ModContext::new(p, Reduction::Barrett).unwrap();
    // 5 is a quadratic non-residue mod 23.
    assert_eq!(ctx.sqrt_mod(&z("5")), Err(Error::NonInvertible));
}

proptest! {
    #[test]
    fn prop_add_sub(a in "[0-9]{1,40}", b in "[0-9]{1,40}") {
        let a = z(&a);
        let b = z(&b);
        prop_assert_eq!(a.add_ref(&b).sub_ref(&b), a);
    }

    #[test]
    fn prop_divrem(n in "[0-9]{1,60}", d in "[1-9][0-9]{0,30}") {
        let n = z(&n);
        let d = z(&d);
        let (q, r) = n.divrem(&d).unwrap();
        prop_assert_eq!(q.mul_ref(&d).add_ref(&r), n);
        prop_assert!(r.cmp_abs(&d) == std::cmp::Ordering::Less);
    }

    #[test]
    fn prop_shift(a in "[0-9]{1,40}", k in 0usize..256) {
        let a = z(&a);
        prop_assert_eq!(a.shl_bits(k).shr_bits(k), a);
    }

    #[test]
    fn prop_mul_commutes(a in "[0-9]{1,50}", b in "[0-9]{1,50}") {
        let a = z(&a);
        let b = z(&b);
        prop_assert_eq!(a.mul_ref(&b), b.mul_ref(&a));
        prop_assert_eq!(a.square(), a.mul_ref(&a));
    }
}
