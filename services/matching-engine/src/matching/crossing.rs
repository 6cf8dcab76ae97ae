//! Crossing detection logic
//!
//! Walks price-sorted buys and sells against each other and emits a trade
//! for every crossing pair.

use types::ids::TickerId;
use types::numeric::Price;
use types::order::Order;
use types::trade::Trade;

use crate::matching::executor::MatchExecutor;

/// Check if a bid and ask can match at given prices
///
/// A buy matches a sell when the buy price is at or above the sell price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Cross sorted buys against sorted sells
///
/// `buys` must be ordered best (highest) first and `sells` best (lowest)
/// first. Each step matches the current pair, fills both in place and
/// advances past whichever side is exhausted. The walk stops at the first
/// pair that does not cross, even if a later pair would.
///
/// Orders left with a non-zero quantity are the remainders of the pass.
pub fn cross(
    ticker: TickerId,
    buys: &mut [Order],
    sells: &mut [Order],
    executor: &mut MatchExecutor,
) -> Vec<Trade> {
    let mut trades = Vec::new();
    let (mut b, mut s) = (0, 0);

    while b < buys.len() && s < sells.len() {
        let (buy, sell) = (&mut buys[b], &mut sells[s]);
        if !can_match(buy.price, sell.price) {
            break;
        }

        trades.push(executor.execute_trade(ticker, buy, sell));

        if buy.is_filled() {
            b += 1;
        }
        if sell.is_filled() {
            s += 1;
        }
    }

    trades
}
