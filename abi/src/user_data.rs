//! The user data codec for flows sent to the Mission Control stream super app
//!
//! The super app decodes the user data attached to a flow mutation as a list
//! of tiles to rent and, on updates, a second list of tiles to release. The
//! layout is plain `abi.encode` of the two dynamic arrays, so it must match
//! `defaultAbiCoder.encode(["tuple(int256,int256,int256,uint256,address)[]", ...])`
//! byte for byte.

use alloy::{
    primitives::{Address, Bytes, I256, U256},
    sol,
    sol_types::{Error as SolError, SolValue},
};

sol! {
    #![sol(all_derives)]

    /// A tile to rent, with the NFT that is placed on it
    #[allow(missing_docs)]
    struct PlaceOrder {
        int256 x;
        int256 y;
        int256 z;
        uint256 tokenId;
        address tokenAddress;
    }

    /// A tile to release
    #[allow(missing_docs)]
    struct RemoveOrder {
        int256 x;
        int256 y;
        int256 z;
    }
}

impl PlaceOrder {
    /// Construct a place order for the tile at the given coordinates
    pub fn new(x: I256, y: I256, z: I256, token_id: U256, token_address: Address) -> Self {
        Self {
            x,
            y,
            z,
            tokenId: token_id,
            tokenAddress: token_address,
        }
    }

    /// The removal order releasing the same tile
    pub fn to_remove_order(&self) -> RemoveOrder {
        RemoveOrder::new(self.x, self.y, self.z)
    }
}

impl RemoveOrder {
    /// Construct a removal order for the tile at the given coordinates
    pub fn new(x: I256, y: I256, z: I256) -> Self {
        Self { x, y, z }
    }
}

/// Encode the user data for a new flow, i.e. `abi.encode(PlaceOrder[])`
pub fn encode_place_orders(orders: &[PlaceOrder]) -> Bytes {
    orders.to_vec().abi_encode().into()
}

/// Encode the user data for a flow update, i.e.
/// `abi.encode(PlaceOrder[], RemoveOrder[])`
pub fn encode_update_orders(new_orders: &[PlaceOrder], removed: &[RemoveOrder]) -> Bytes {
    (new_orders.to_vec(), removed.to_vec())
        .abi_encode_params()
        .into()
}

/// Decode user data produced by [`encode_place_orders`]
pub fn decode_place_orders(data: &[u8]) -> Result<Vec<PlaceOrder>, SolError> {
    Vec::<PlaceOrder>::abi_decode(data)
}

/// Decode user data produced by [`encode_update_orders`]
pub fn decode_update_orders(
    data: &[u8],
) -> Result<(Vec<PlaceOrder>, Vec<RemoveOrder>), SolError> {
    <(Vec<PlaceOrder>, Vec<RemoveOrder>)>::abi_decode_params(data)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, I256, U256};

    use super::*;

    /// The number of bytes in an ABI word
    const WORD: usize = 32;

    /// The tile used by the update script: (0, -2, 2) holding token 7
    fn sample_order() -> PlaceOrder {
        PlaceOrder::new(
            I256::ZERO,
            I256::try_from(-2i64).unwrap(),
            I256::try_from(2i64).unwrap(),
            U256::from(7u64),
            address!("0xF8a6a111daD517C56942A5BE4521163737003FF8"),
        )
    }

    fn word(data: &[u8], index: usize) -> U256 {
        U256::from_be_slice(&data[index * WORD..(index + 1) * WORD])
    }

    #[test]
    fn test_place_orders_deterministic() {
        let orders = vec![sample_order()];
        let a = encode_place_orders(&orders);
        let b = encode_place_orders(&orders);
        assert_eq!(a, b);
    }

    #[test]
    fn test_place_orders_layout() {
        let data = encode_place_orders(&[sample_order()]);

        // offset, length, then the five static fields of the single tuple
        assert_eq!(data.len(), 7 * WORD);
        assert_eq!(word(&data, 0), U256::from(WORD));
        assert_eq!(word(&data, 1), U256::from(1u64));
        assert_eq!(word(&data, 2), U256::ZERO);
        assert_eq!(word(&data, 3), U256::MAX - U256::from(1u64));
        assert_eq!(word(&data, 4), U256::from(2u64));
        assert_eq!(word(&data, 5), U256::from(7u64));
        assert_eq!(
            &data[6 * WORD + 12..],
            address!("0xF8a6a111daD517C56942A5BE4521163737003FF8").as_slice()
        );
    }

    #[test]
    fn test_update_orders_one_of_each() {
        let order = sample_order();
        let removal = RemoveOrder::new(
            I256::ZERO,
            I256::try_from(-2i64).unwrap(),
            I256::try_from(2i64).unwrap(),
        );
        let data = encode_update_orders(&[order.clone()], &[removal.clone()]);

        let (new_orders, removed) = decode_update_orders(&data).unwrap();
        assert_eq!(new_orders, vec![order]);
        assert_eq!(removed, vec![removal]);
    }

    #[test]
    fn test_update_orders_layout() {
        let order = sample_order();
        let data = encode_update_orders(&[order.clone()], &[order.to_remove_order()]);

        // Two head offsets, the place array (length + 5 words) and the
        // removal array (length + 3 words)
        assert_eq!(data.len(), 12 * WORD);
        assert_eq!(word(&data, 0), U256::from(2 * WORD));
        assert_eq!(word(&data, 1), U256::from(8 * WORD));
        assert_eq!(word(&data, 2), U256::from(1u64));
        assert_eq!(word(&data, 8), U256::from(1u64));
        assert_eq!(word(&data, 10), U256::MAX - U256::from(1u64));
    }

    #[test]
    fn test_decode_place_orders() {
        let orders = vec![sample_order(), sample_order()];
        let data = encode_place_orders(&orders);
        assert_eq!(decode_place_orders(&data).unwrap(), orders);
    }
}
