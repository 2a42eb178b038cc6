use rand::seq::SliceRandom;

/// Characters an address may contain (base58 style, no look-alike characters)
const ALPHABET: &[u8] = b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Prefix carried by every address
pub const ADDRESS_PREFIX: &str = "dca:";

/// Total address length including the prefix
pub const ADDRESS_LENGTH: usize = 36;

/// Generate a random address token.
///
/// The ledger only ever compares addresses for equality, so an address is just
/// the prefix followed by distinct characters sampled from the alphabet.
pub fn generate_address() -> String {
    let mut rng = rand::thread_rng();
    let body: String = ALPHABET
        .choose_multiple(&mut rng, ADDRESS_LENGTH - ADDRESS_PREFIX.len())
        .map(|&c| c as char)
        .collect();
    format!("{ADDRESS_PREFIX}{body}")
}
