//! Known Pyth price feed identifiers on mainnet.

use std::fmt::Display;

/// Feeds offered for lookup, with their 32-byte Pyth identifiers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KnownFeed {
    BtcUsd,
    StxUsd,
    EthUsd,
    UsdcUsd,
    BnbUsd,
    LinkUsd,
}

impl KnownFeed {
    pub fn all() -> [KnownFeed; 6] {
        [
            KnownFeed::BtcUsd,
            KnownFeed::StxUsd,
            KnownFeed::EthUsd,
            KnownFeed::UsdcUsd,
            KnownFeed::BnbUsd,
            KnownFeed::LinkUsd,
        ]
    }

    /// 0x-prefixed feed identifier as it appears in repr text.
    pub fn id(&self) -> &'static str {
        match self {
            KnownFeed::BtcUsd => {
                "0xe62df6c8b4a85fe1a67db44dc12de5db330f7ac66b72dc658afedf0f4a415b43"
            }
            KnownFeed::StxUsd => {
                "0xec7a775f46379b5e943c3526b1c8d54cd49749176b0b98e02dde68d1bd335c17"
            }
            KnownFeed::EthUsd => {
                "0xff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace"
            }
            KnownFeed::UsdcUsd => {
                "0xeaa020c61cc479712813461ce153894a96a6c00b21ed0cfc2798d1f9a9e9c94a"
            }
            KnownFeed::BnbUsd => {
                "0x2f95862b045670cd22bee3114c39763a4a08beeb663b145d283c31d7d1101c4f"
            }
            KnownFeed::LinkUsd => {
                "0x8ac0c70fff57e9aefdf5edf44b51d62c2d433653cbb2cf5cc06bb115af04d221"
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            KnownFeed::BtcUsd => "BTC/USD",
            KnownFeed::StxUsd => "STX/USD",
            KnownFeed::EthUsd => "ETH/USD",
            KnownFeed::UsdcUsd => "USDC/USD",
            KnownFeed::BnbUsd => "BNB/USD",
            KnownFeed::LinkUsd => "LINK/USD",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<KnownFeed> {
        KnownFeed::all()
            .into_iter()
            .find(|feed| feed.symbol().eq_ignore_ascii_case(symbol))
    }

    /// Matches a `price-identifier` token back to a feed.
    pub fn from_identifier(identifier: &str) -> Option<KnownFeed> {
        let stripped = identifier.trim_start_matches("0x");
        KnownFeed::all()
            .into_iter()
            .find(|feed| feed.id().trim_start_matches("0x").eq_ignore_ascii_case(stripped))
    }

    /// Raw identifier bytes, for building contract call arguments.
    pub fn id_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(self.id().trim_start_matches("0x"))
    }
}

impl Display for KnownFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
