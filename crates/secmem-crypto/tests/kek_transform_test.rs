//! KEK transform properties and fixed vectors.

use proptest::prelude::*;
use secmem_core::{KEY_CAPACITY, KeyStore, KeyTransform, Resource};
use secmem_crypto::{KEK_SIZE, KekTransform};

/// KEK of 0x00..0x1f
fn sequential_kek() -> [u8; KEK_SIZE] {
    let mut kek = [0u8; KEK_SIZE];
    for (i, byte) in kek.iter_mut().enumerate() {
        *byte = i as u8;
    }
    kek
}

#[test]
fn known_answer_for_zero_clear_key() {
    let transform = KekTransform::new(sequential_kek());
    let black = transform.to_black(&[0u8; KEY_CAPACITY]).unwrap();

    assert_eq!(
        hex::encode(&black[..]),
        "49dd47e1773f5be790bedf8a46d505bde65d7bf4a0b6d2bcc993fbf371963ba7"
    );
}

#[test]
fn known_answer_for_patterned_clear_key() {
    let transform = KekTransform::new(sequential_kek());
    let black = transform.to_black(&[0x11u8; KEY_CAPACITY]).unwrap();

    assert_eq!(
        hex::encode(&black[..]),
        "0ab7a9d7e1f6d3535bcf71a4127684305db77756a8fa600c5f57474f99aa5777"
    );
}

#[test]
fn store_serves_wrapped_and_unwrapped_views() {
    let store = KeyStore::new(KekTransform::new(sequential_kek()));
    store.write(Resource::Clear, 0, &[0x11; KEY_CAPACITY]).unwrap();

    let black = store.read(Resource::Black, 0, KEY_CAPACITY).unwrap();

    // Feed the wrapped key back through the black side
    store.write(Resource::Black, 0, &black).unwrap();
    let clear = store.read(Resource::Clear, 0, KEY_CAPACITY).unwrap();

    assert_eq!(&clear[..], &[0x11; KEY_CAPACITY]);
}

#[test]
fn fresh_store_black_does_not_unwrap_later_keys() {
    let store = KeyStore::new(KekTransform::new(sequential_kek()));

    // Black view of the zeroed clear buffer, readable before any key is staged
    let zero_black = store.read(Resource::Black, 0, KEY_CAPACITY).unwrap();

    let secret = [0xC3u8; KEY_CAPACITY];
    store.write(Resource::Clear, 0, &secret).unwrap();
    let black = store.read(Resource::Black, 0, KEY_CAPACITY).unwrap();

    let recovered: Vec<u8> = black.iter().zip(zero_black.iter()).map(|(b, z)| b ^ z).collect();
    assert_ne!(recovered, secret.to_vec());

    // A wipe returns the store to zero and the black view to its fresh value
    store.wipe();
    assert_eq!(store.read(Resource::Black, 0, KEY_CAPACITY).unwrap(), zero_black);
}

proptest! {
    #[test]
    fn prop_round_trip(
        kek in any::<[u8; KEK_SIZE]>(),
        clear in any::<[u8; KEY_CAPACITY]>(),
    ) {
        let transform = KekTransform::new(kek);
        let black = transform.to_black(&clear).unwrap();
        prop_assert_eq!(black.len(), KEY_CAPACITY);

        let unwrapped = transform.to_clear(&black).unwrap();
        prop_assert_eq!(&unwrapped[..], &clear[..]);
    }

    #[test]
    fn prop_black_values_do_not_leak_clear_differences(
        kek in any::<[u8; KEK_SIZE]>(),
        a in any::<[u8; KEY_CAPACITY]>(),
        b in any::<[u8; KEY_CAPACITY]>(),
    ) {
        prop_assume!(a != b);
        let transform = KekTransform::new(kek);
        let black_a = transform.to_black(&a).unwrap();
        let black_b = transform.to_black(&b).unwrap();

        let black_diff: Vec<u8> = black_a.iter().zip(black_b.iter()).map(|(x, y)| x ^ y).collect();
        let clear_diff: Vec<u8> = a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect();
        prop_assert_ne!(black_diff, clear_diff);
    }
}
