//! Property-based tests for pricing and payoff invariants.

use options_analytics::options::{OptionType, Side};
use options_analytics::pricing::{BlackScholesParams, IvSolver, greeks, price};
use options_analytics::strategy::{
    PayoffParams, PriceRange, StrategyLeg, breakevens, curve_with_strikes, leg_payoff,
    strategy_payoff,
};
use proptest::prelude::*;

fn option_type() -> impl Strategy<Value = OptionType> {
    prop_oneof![Just(OptionType::Call), Just(OptionType::Put)]
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Long), Just(Side::Short)]
}

fn market() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
    // spot, strike, time, rate, vol
    (1.0..500.0, 1.0..500.0, 0.01..5.0, -0.02..0.10, 0.01..2.0)
}

fn leg() -> impl Strategy<Value = StrategyLeg> {
    (option_type(), side(), 50.0..150.0, 0.0..20.0, 1u32..5).prop_map(
        |(option_type, side, strike, premium, quantity)| StrategyLeg {
            option_type,
            side,
            strike,
            premium,
            quantity,
        },
    )
}

proptest! {
    #[test]
    fn put_call_parity((s, k, t, r, v) in market()) {
        let prices = price(&BlackScholesParams::new(s, k, t, r, v, OptionType::Call)).unwrap();
        let forward_gap = s - k * (-r * t).exp();
        prop_assert!((prices.call - prices.put - forward_gap).abs() < 1e-6);
        prop_assert!(prices.call >= 0.0 && prices.put >= 0.0);
    }

    #[test]
    fn vanishing_volatility_gives_discounted_intrinsic(
        (s, k, t, r, _) in market(),
        option_type in option_type(),
    ) {
        let discounted_strike = k * (-r * t).exp();
        let expected = option_type.intrinsic(s, discounted_strike);

        let tiny = price(&BlackScholesParams::new(s, k, t, r, 1e-9, option_type)).unwrap();
        prop_assert!((tiny.for_type(option_type) - expected).abs() < 1e-6);

        let zero = price(&BlackScholesParams::new(s, k, t, r, 0.0, option_type)).unwrap();
        prop_assert!((zero.for_type(option_type) - expected).abs() < 1e-9);
    }

    #[test]
    fn expiry_price_is_exact_intrinsic((s, k, _, r, v) in market()) {
        let prices = price(&BlackScholesParams::new(s, k, 0.0, r, v, OptionType::Call)).unwrap();
        prop_assert_eq!(prices.call, (s - k).max(0.0));
        prop_assert_eq!(prices.put, (k - s).max(0.0));
    }

    #[test]
    fn delta_monotonic_in_spot((s, k, t, r, v) in market(), bump in 0.01..50.0) {
        let call = BlackScholesParams::new(s, k, t, r, v, OptionType::Call);
        let low = greeks(&call).unwrap().delta;
        let high = greeks(&call.with_spot(s + bump)).unwrap().delta;
        prop_assert!(high >= low - 1e-12);

        // Put delta rises from -1 toward 0, so its magnitude shrinks
        let put = call.with_option_type(OptionType::Put);
        let low = greeks(&put).unwrap().delta;
        let high = greeks(&put.with_spot(s + bump)).unwrap().delta;
        prop_assert!(high.abs() <= low.abs() + 1e-12);
    }

    #[test]
    fn gamma_and_vega_non_negative(
        (s, k, t, r, v) in market(),
        option_type in option_type(),
    ) {
        let g = greeks(&BlackScholesParams::new(s, k, t, r, v, option_type)).unwrap();
        prop_assert!(g.gamma >= 0.0);
        prop_assert!(g.vega >= 0.0);
    }

    #[test]
    fn strategy_payoff_is_additive(
        legs in prop::collection::vec(leg(), 1..6),
        underlying in 0.0..250.0,
    ) {
        let params = PayoffParams::new(legs.clone(), 100.0);
        let total = strategy_payoff(&params, underlying).unwrap();
        let sum: f64 = legs.iter().map(|l| leg_payoff(l, underlying)).sum();
        prop_assert!((total - sum).abs() < 1e-9);

        // Any partition adds up to the whole
        let (left, right) = legs.split_at(legs.len() / 2);
        let partial = |part: &[StrategyLeg]| -> f64 {
            part.iter().map(|l| leg_payoff(l, underlying)).sum()
        };
        prop_assert!((partial(left) + partial(right) - total).abs() < 1e-9);

        let mut reversed = legs;
        reversed.reverse();
        let reordered = strategy_payoff(&PayoffParams::new(reversed, 100.0), underlying).unwrap();
        prop_assert!((reordered - total).abs() < 1e-9);
    }

    #[test]
    fn breakevens_ascending_and_zero(legs in prop::collection::vec(leg(), 1..5)) {
        let params = PayoffParams::new(legs, 100.0)
            .with_range(PriceRange::linear(0.0, 250.0, 26));
        let points = curve_with_strikes(&params).unwrap();
        let found = breakevens(&points);

        prop_assert!(found.windows(2).all(|w| w[0] < w[1]));
        for be in found {
            let payoff = strategy_payoff(&params, be).unwrap();
            prop_assert!(payoff.abs() < 1e-6, "payoff {} at breakeven {}", payoff, be);
        }
    }

    #[test]
    fn implied_volatility_round_trip(
        spot in 50.0..200.0,
        t in 0.1..2.0,
        r in 0.0..0.08,
        vol in 0.05..3.0,
        moneyness in 0.8..1.25,
        option_type in option_type(),
    ) {
        let strike = spot * moneyness;
        let params = BlackScholesParams::new(spot, strike, t, r, vol, option_type);
        // Far from the money at low vol the price is flat in volatility and
        // any vol in a wide band reprices within tolerance
        prop_assume!(greeks(&params).unwrap().vega > 1e-2);
        let target = price(&params).unwrap().for_type(option_type);

        let solved = IvSolver::default().solve(target, &params.query()).unwrap();
        prop_assert!((solved - vol).abs() < 1e-4, "solved {} expected {}", solved, vol);

        let repriced = price(&params.query().with_volatility(solved)).unwrap().for_type(option_type);
        prop_assert!((repriced - target).abs() < 1e-6, "repriced {} target {}", repriced, target);
    }
}
