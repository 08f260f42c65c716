//! Property tests for the totals calculator and the sales ladder.

use niaga_core::money::{Money, Percentage};
use niaga_core::status::{available_transitions, OrderKind, OrderStatus};
use niaga_core::totals::{calculate_line, calculate_order, Discount, LineInput};
use proptest::prelude::*;

fn line_strategy() -> impl Strategy<Value = LineInput> {
    (1i64..=1_000, 0i64..=10_000_000, 0u32..=10_000).prop_map(|(qty, price, bps)| {
        LineInput::new(
            qty,
            Money::from_rupiah(price),
            Discount::Percentage(Percentage::from_bps(bps)),
        )
    })
}

fn sales_status_strategy() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Draft),
        Just(OrderStatus::Confirmed),
        Just(OrderStatus::Processing),
        Just(OrderStatus::Shipped),
        Just(OrderStatus::Delivered),
        Just(OrderStatus::Completed),
        Just(OrderStatus::Cancelled),
    ]
}

proptest! {
    #[test]
    fn line_total_is_never_negative(
        qty in 1i64..=99_999,
        price in 0i64..=100_000_000,
        bps in 0u32..=10_000,
        amount in 0i64..=10_000_000_000,
    ) {
        let price = Money::from_rupiah(price);

        let pct = calculate_line(qty, price, Discount::Percentage(Percentage::from_bps(bps)));
        prop_assert!(!pct.total.is_negative());
        prop_assert!(pct.total <= pct.gross);

        let fixed = calculate_line(qty, price, Discount::Amount(Money::from_rupiah(amount)));
        prop_assert!(!fixed.total.is_negative());
    }

    #[test]
    fn percentage_line_total_matches_formula(
        qty in 1i64..=1_000,
        price in 0i64..=10_000_000,
        bps in 0u32..=10_000,
    ) {
        let line = calculate_line(qty, Money::from_rupiah(price), Discount::Percentage(Percentage::from_bps(bps)));
        let gross = qty as i128 * price as i128;
        let discount = (gross * bps as i128 + 5_000) / 10_000;
        prop_assert_eq!(line.total.rupiah() as i128, gross - discount);
    }

    #[test]
    fn order_total_is_independent_of_line_order(
        lines in prop::collection::vec(line_strategy(), 0..20),
        rate in 0u32..=2_000,
    ) {
        let rate = Percentage::from_bps(rate);
        let forward = calculate_order(&lines, rate, Money::zero());

        let mut reversed = lines.clone();
        reversed.reverse();
        let backward = calculate_order(&reversed, rate, Money::zero());

        prop_assert_eq!(forward, backward);
        prop_assert_eq!(forward.total_amount, forward.subtotal + forward.subtotal.apply_rate(rate));
    }

    #[test]
    fn sales_transitions_never_regress(current in sales_status_strategy()) {
        let next = available_transitions(current, OrderKind::Sales);
        if let Some(rank) = current.sales_rank() {
            for status in next {
                if let Some(target) = status.sales_rank() {
                    prop_assert!(target > rank);
                }
            }
        } else {
            prop_assert!(next.is_empty());
        }
    }
}
