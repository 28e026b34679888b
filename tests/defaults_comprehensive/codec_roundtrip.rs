//! Round trip: decode(encode(v)) == v for both built-in codecs

use keeper::{Codec, IdentityCodec, MessagePack, StructuredCodec};
use proptest::prelude::*;

use crate::test_utils::Profile;

proptest! {
    #[test]
    fn identity_bool(v in any::<bool>()) {
        let codec = IdentityCodec::<bool>::new();
        prop_assert_eq!(codec.decode(codec.encode(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn identity_i32(v in any::<i32>()) {
        let codec = IdentityCodec::<i32>::new();
        prop_assert_eq!(codec.decode(codec.encode(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn identity_bytes(v in proptest::collection::vec(any::<u8>(), 0..64)) {
        let codec = IdentityCodec::<Vec<u8>>::new();
        prop_assert_eq!(codec.decode(codec.encode(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn structured_json(name in "\\PC{0,24}", age in any::<u32>()) {
        let codec = StructuredCodec::<Profile>::new();
        let v = Profile { name, age };
        prop_assert_eq!(codec.decode(codec.encode(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn structured_msgpack(name in "\\PC{0,24}", age in any::<u32>()) {
        let codec = StructuredCodec::<Profile, MessagePack>::new();
        let v = Profile { name, age };
        prop_assert_eq!(codec.decode(codec.encode(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn structured_optional_vec(
        v in proptest::option::of(proptest::collection::vec(any::<i64>(), 0..8)),
    ) {
        let codec = StructuredCodec::<Option<Vec<i64>>>::new();
        prop_assert_eq!(codec.decode(codec.encode(&v).unwrap()).unwrap(), v);
    }
}
