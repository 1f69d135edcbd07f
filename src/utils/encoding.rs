// Text encodings used by AElf tooling. Addresses are base58 with a 4-byte
// double-SHA-256 checksum, hashes are lowercase hex.

pub fn to_base58_check(bytes: &[u8]) -> String {
    bs58::encode(bytes).with_check().into_string()
}

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base58_check_matches_known_contract_address() {
        // Token contract on the AElf main chain
        let address =
            hex::decode("2791e992a57f28e75a11f13af2c0aec8b0eb35d2f048d42eba8901c92e0378dc")
                .unwrap();
        assert_eq!(
            to_base58_check(&address),
            "JRmBduh4nXWi1aXgdUsj5gJrzeZb2LxmrAbf7W99faZSvoAaE"
        );
    }

    #[test]
    fn base58_check_of_empty_input_is_the_checksum_only() {
        // sha256(sha256("")) starts with 5df6e0e2
        assert_eq!(to_base58_check(&[]), "3QJmnh");
    }

    #[test]
    fn hex_is_lowercase() {
        assert_eq!(to_hex(&[0x62, 0x26, 0x3b, 0x36]), "62263b36");
        assert_eq!(to_hex(&[0xAB]), "ab");
        assert_eq!(to_hex(&[]), "");
    }
}
