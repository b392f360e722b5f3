use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{ClosedTrade, PositionType, Trade, Valuation};

/// Signed P/L of a position, rounded for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlFigures {
    pub pl: Decimal,
    pub pl_pct: Decimal,
}

/// Round to cents, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute P/L for a position marked at `price`.
///
/// Order of operations: subtract, multiply/divide, apply direction sign,
/// round once. An `entry` of zero yields a zero percentage. Returns `None`
/// if any step overflows the decimal range.
pub fn compute_pl(
    entry: Decimal,
    price: Decimal,
    shares: Decimal,
    position_type: PositionType,
) -> Option<PlFigures> {
    let diff = price.checked_sub(entry)?;
    let raw_pl = diff.checked_mul(shares)?;
    let raw_pct = if entry.is_zero() {
        Decimal::ZERO
    } else {
        diff.checked_div(entry)?.checked_mul(Decimal::ONE_HUNDRED)?
    };

    Some(PlFigures {
        pl: round2(position_type.apply_sign(raw_pl)),
        pl_pct: round2(position_type.apply_sign(raw_pct)),
    })
}

/// Build the valuation record for a trade priced at `live_price`.
/// Figures that overflow yield an error-flagged record.
pub fn valuation_at(trade: &Trade, live_price: Decimal) -> Valuation {
    let Some(figures) = compute_pl(
        trade.entry_price,
        live_price,
        trade.shares,
        trade.position_type,
    ) else {
        tracing::warn!(
            trade_id = %trade.id,
            ticker = %trade.ticker,
            live = %live_price,
            "P/L overflow"
        );
        return failed_valuation(trade, format!("P/L overflow for {}", trade.ticker));
    };

    Valuation {
        id: trade.id.clone(),
        ticker: trade.ticker.clone(),
        entry_price: trade.entry_price,
        live_price: round2(live_price),
        shares: trade.shares,
        unrealized_pl: figures.pl,
        unrealized_pl_pct: figures.pl_pct,
        position_type: trade.position_type,
        position_amount: trade.position_amount,
        error: None,
    }
}

/// Build the error-flagged record for a trade whose price could not be fetched.
pub fn failed_valuation(trade: &Trade, reason: impl Into<String>) -> Valuation {
    Valuation {
        id: trade.id.clone(),
        ticker: trade.ticker.clone(),
        entry_price: trade.entry_price,
        live_price: Decimal::ZERO,
        shares: trade.shares,
        unrealized_pl: Decimal::ZERO,
        unrealized_pl_pct: Decimal::ZERO,
        position_type: trade.position_type,
        position_amount: trade.position_amount,
        error: Some(reason.into()),
    }
}

/// Realized P/L of a closed trade, same sign convention as unrealized.
/// `None` on overflow.
pub fn realized_pl(closed: &ClosedTrade) -> Option<Decimal> {
    compute_pl(
        closed.trade.entry_price,
        closed.close_price,
        closed.trade.shares,
        closed.trade.position_type,
    )
    .map(|f| f.pl)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn trade(entry: Decimal, shares: Decimal, position_type: PositionType) -> Trade {
        Trade {
            id: "test-id-123".into(),
            ticker: "SLV".into(),
            entry_price: entry,
            shares,
            position_type,
            position_amount: Decimal::from(5),
            start_date: Utc::now(),
        }
    }

    #[test]
    fn test_overweight_gain() {
        // (26.75 - 25.50) * 100 = 125, 1.25 / 25.50 = 4.90%
        let t = trade(Decimal::new(2550, 2), Decimal::from(100), PositionType::Overweight);
        let v = valuation_at(&t, Decimal::new(2675, 2));

        assert_eq!(v.unrealized_pl, Decimal::new(12500, 2));
        assert_eq!(v.unrealized_pl_pct, Decimal::new(490, 2));
        assert_eq!(v.live_price, Decimal::new(2675, 2));
        assert_eq!(v.entry_price, Decimal::new(2550, 2));
        assert_eq!(v.position_amount, Decimal::from(5));
        assert!(v.error.is_none());
    }

    #[test]
    fn test_underweight_inverts_sign() {
        // -((24.25 - 25.50) * 100) = 125
        let t = trade(Decimal::new(2550, 2), Decimal::from(100), PositionType::Underweight);
        let v = valuation_at(&t, Decimal::new(2425, 2));

        assert_eq!(v.unrealized_pl, Decimal::from(125));
        assert_eq!(v.unrealized_pl_pct, Decimal::new(490, 2));
    }

    #[test]
    fn test_long_and_short_match_ow_and_uw() {
        let entry = Decimal::from(40);
        let live = Decimal::new(375, 1);
        let shares = Decimal::new(25, 1);

        let long = compute_pl(entry, live, shares, PositionType::Long).unwrap();
        let ow = compute_pl(entry, live, shares, PositionType::Overweight).unwrap();
        let short = compute_pl(entry, live, shares, PositionType::Short).unwrap();
        let uw = compute_pl(entry, live, shares, PositionType::Underweight).unwrap();

        assert_eq!(long, ow);
        assert_eq!(short, uw);
        assert_eq!(long.pl, Decimal::new(-625, 2));
        assert_eq!(short.pl, Decimal::new(625, 2));
        assert_eq!(long.pl_pct, Decimal::new(-625, 2));
        assert_eq!(short.pl_pct, Decimal::new(625, 2));
    }

    #[test]
    fn test_zero_entry_price_has_zero_pct() {
        let figures = compute_pl(
            Decimal::ZERO,
            Decimal::from(12),
            Decimal::from(10),
            PositionType::Overweight,
        )
        .unwrap();
        assert_eq!(figures.pl, Decimal::from(120));
        assert_eq!(figures.pl_pct, Decimal::ZERO);
    }

    #[test]
    fn test_rounds_only_the_final_figure() {
        // 0.005 * 3 = 0.015 → 0.02; rounding the diff first would give 0.03
        let figures = compute_pl(
            Decimal::from(10),
            Decimal::new(10_005, 3),
            Decimal::from(3),
            PositionType::Long,
        )
        .unwrap();
        assert_eq!(figures.pl, Decimal::new(2, 2));
    }

    #[test]
    fn test_fractional_shares_preserved() {
        let t = trade(Decimal::new(1_234_567, 5), Decimal::new(15, 1), PositionType::Long);
        let v = valuation_at(&t, Decimal::new(1_300_001, 5));

        assert_eq!(v.shares, Decimal::new(15, 1));
        assert_eq!(v.entry_price, Decimal::new(1_234_567, 5));
        assert_eq!(v.live_price, Decimal::new(1300, 2));
    }

    #[test]
    fn test_failed_valuation_zeroes_numbers() {
        let t = trade(Decimal::from(10), Decimal::from(1), PositionType::Long);
        let v = failed_valuation(&t, "no price data for INVALID");

        assert!(v.is_error());
        assert_eq!(v.live_price, Decimal::ZERO);
        assert_eq!(v.unrealized_pl, Decimal::ZERO);
        assert_eq!(v.unrealized_pl_pct, Decimal::ZERO);
        assert_eq!(v.entry_price, Decimal::from(10));

        let json = serde_json::to_value(&v).unwrap();
        assert!(json["unrealized_pl"].is_number());
        assert!(json["error"].is_string());
    }

    #[test]
    fn test_realized_pl_short() {
        let t = trade(Decimal::from(50), Decimal::from(10), PositionType::Short);
        let closed = ClosedTrade::new(t, Decimal::from(45), Utc::now());
        assert_eq!(realized_pl(&closed), Some(Decimal::from(50)));
    }

    #[test]
    fn test_overflow_becomes_failed_valuation() {
        let shares = Decimal::from_str_exact("70000000000000000000000000000").unwrap();
        let t = trade(Decimal::new(2550, 2), shares, PositionType::Long);

        assert!(compute_pl(t.entry_price, Decimal::from(30), shares, PositionType::Long).is_none());

        let v = valuation_at(&t, Decimal::from(30));
        assert!(v.is_error());
        assert!(v.error.as_deref().unwrap().contains("overflow"));
        assert_eq!(v.unrealized_pl, Decimal::ZERO);
        assert_eq!(v.shares, shares);
    }

    #[test]
    fn test_tiny_entry_pct_overflow() {
        let entry = Decimal::new(1, 28);
        assert!(compute_pl(entry, Decimal::from(1000), Decimal::ONE, PositionType::Long).is_none());
    }
}
