use phantom::core::gf2n::Gf2nContext;
use phantom::core::mpz::Mpz;
use phantom::error::Error;

type Z = Mpz<u64>;

fn f233() -> Gf2nContext {
    Gf2nContext::new(&[233, 74, 0]).unwrap()
}

fn hex(s: &str) -> Z {
    Mpz::from_str_radix(s, 16).unwrap()
}

#[test]
fn addition_is_self_inverse() {
    let f = f233();
    let a = hex("00fac9dfcbac8313bb2139f1bb755fef65bc391f8b36f8f8eb7371fd558b");
    let b = hex("01006a08a41903350678e58528bebf8a0beff867a7ca36716f7e01f81052");

    assert_eq!(f.add(&f.add(&a, &b), &b), a);
    assert!(f.add(&a, &a).is_zero());
}

#[test]
fn reduction_bounds_degree() {
    let f = f233();
    let mut big = Mpz::<u64>::new();
    big.set_bit(400);
    big.set_bit(233);
    big.set_bit(3);

    let r = f.reduce(&big);
    assert!(r.bit_length() <= 233);
}

#[test]
fn small_field_multiplication() {
    // GF(2^4) with x^4 + x + 1: (x^3 + 1)(x) = x^4 + x = 1 (after
    // reduction x^4 = x + 1, so x^4 + x = 1).
    let f = Gf2nContext::new(&[4, 1, 0]).unwrap();
    let a: Z = Mpz::from_u64(0b1001);
    let b: Z = Mpz::from_u64(0b0010);
    assert_eq!(f.mul(&a, &b), Mpz::from_u64(1));
}

#[test]
fn square_matches_self_multiplication() {
    let f = f233();
    let a = hex("0123456789abcdef0123456789abcdef0123456789abcdef01234567");

    assert_eq!(f.sqr(&a), f.mul(&a, &a));
}

#[test]
fn inverse_multiplies_to_one() {
    let f = f233();
    let elements = [
        hex("01"),
        hex("02"),
        hex("00fac9dfcbac8313bb2139f1bb755fef65bc391f8b36f8f8eb7371fd558b"),
        hex("deadbeefdeadbeefdeadbeef"),
    ];

    for a in elements {
        let inv = f.invert(&a).unwrap();
        assert!(f.mul(&a, &inv).is_one(), "a * a^-1 != 1");
    }
}

#[test]
fn zero_is_not_invertible() {
    let f = f233();
    assert_eq!(f.invert(&Mpz::<u64>::new()), Err(Error::NonInvertible));
}

#[test]
fn mul_is_commutative_and_distributive() {
    let f = f233();
    let a = hex("a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5");
    let b = hex("5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a");
    let c = hex("0f0f0f0f0f0f0f");

    assert_eq!(f.mul(&a, &b), f.mul(&b, &a));

    let lhs = f.mul(&a, &f.add(&b, &c));
    let rhs = f.add(&f.mul(&a, &b), &f.mul(&a, &c));
    assert_eq!(lhs, rhs);
}
