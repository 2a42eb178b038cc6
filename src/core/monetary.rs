/// Monetary constants for the ledger
///
/// Amounts are always integers in base units. One coin (DPC) is 100,000,000 base
/// units, the same split Bitcoin uses between a coin and a satoshi.
///
/// Number of base units in one coin
pub const SATOSHIS_PER_COIN: u64 = 100_000_000;

/// Reward paid by every coinbase transaction (50 coins)
pub const BLOCK_REWARD: u64 = 50 * SATOSHIS_PER_COIN;

/// Hex prefix a block hash must carry to count as mined
pub const DEFAULT_HASH_PREFIX: &str = "0000";

/// Who received the genesis coinbase reward
pub const GENESIS_REWARD_RECIPIENT: &str = "dca:ci368r7jmB2uDLRwdMpzntSF4vqfKCgU";

/// Proof recorded in the genesis block
pub const GENESIS_PROOF: u64 = 123_796;

/// Ticker used when printing amounts
pub const COIN_TICKER: &str = "DPC";

/// Utility functions for monetary conversions
pub mod conversions {
    use super::*;

    /// Format base units as a coin amount with eight decimals
    ///
    /// # Examples
    /// ```
    /// use dome_chain::core::monetary::conversions::format_coins;
    /// assert_eq!(format_coins(20_00000000), "20.00000000 DPC");
    /// assert_eq!(format_coins(1_000), "0.00001000 DPC");
    /// ```
    pub fn format_coins(amount: u64) -> String {
        format!(
            "{}.{:08} {COIN_TICKER}",
            amount / SATOSHIS_PER_COIN,
            amount % SATOSHIS_PER_COIN
        )
    }

    /// Convert whole coins to base units, saturating on overflow
    pub fn coins_to_satoshis(coins: u64) -> u64 {
        coins.saturating_mul(SATOSHIS_PER_COIN)
    }
}

#[cfg(test)]
mod tests {
    use super::conversions::*;
    use super::*;

    #[test]
    fn test_monetary_constants() {
        assert_eq!(SATOSHIS_PER_COIN, 100_000_000);
        assert_eq!(BLOCK_REWARD, 5_000_000_000);
        assert!(DEFAULT_HASH_PREFIX.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_coins(BLOCK_REWARD), "50.00000000 DPC");
        assert_eq!(format_coins(SATOSHIS_PER_COIN / 2), "0.50000000 DPC");
        assert_eq!(format_coins(0), "0.00000000 DPC");
    }

    #[test]
    fn test_coins_to_satoshis() {
        assert_eq!(coins_to_satoshis(20), 20 * SATOSHIS_PER_COIN);
        assert_eq!(coins_to_satoshis(u64::MAX), u64::MAX);
    }
}
