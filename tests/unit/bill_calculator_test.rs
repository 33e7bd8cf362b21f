// Property-based tests for the bill calculator
//
// Covers the calculation laws the billing UI and saved bills rely on:
// - discount is taken off the tax-exclusive base
// - CGST and SGST are always equal halves
// - inclusive-mode stripping round-trips to the entered price
// - grand total is the once-rounded sum of the line totals
// - a shared calculator gives the same result on every thread

use gstbill::core::round_money;
use gstbill::gst::models::{BillGstType, GstMode};
use gstbill::{BillCalculator, BillTaxConfig, LineItem};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn price() -> impl Strategy<Value = Decimal> {
    // 0.00 to 100,000.00
    (0i64..=10_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

fn quantity() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..=1_000i64).prop_map(Decimal::from),
        // fractional quantities such as 1.250 kg
        (1i64..=100_000i64).prop_map(|grams| Decimal::new(grams, 3)),
    ]
}

fn discount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|bp| Decimal::new(bp, 2))
}

fn gst_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        prop::sample::select(vec![0i64, 5, 12, 18, 28]).prop_map(Decimal::from),
        (0i64..=100i64).prop_map(Decimal::from),
    ]
}

fn line_item() -> impl Strategy<Value = LineItem> {
    (price(), quantity(), discount(), gst_rate())
        .prop_map(|(p, q, d, r)| LineItem::new(p, q, r).with_discount(d))
}

fn tax_config() -> impl Strategy<Value = BillTaxConfig> {
    (
        prop_oneof![Just(BillGstType::Gst), Just(BillGstType::NonGst)],
        prop_oneof![Just(GstMode::Inclusive), Just(GstMode::Exclusive)],
    )
        .prop_map(|(t, m)| BillTaxConfig::new(t, m))
}

proptest! {
    #[test]
    fn test_no_discount_no_tax_is_plain_product(
        unit_price in price(),
        qty in quantity(),
        config in tax_config(),
    ) {
        let item = LineItem::new(unit_price, qty, Decimal::ZERO);
        let result = BillCalculator::new().calculate(&[item], config).unwrap();

        prop_assert_eq!(result.lines[0].final_total, round_money(unit_price * qty));
        prop_assert_eq!(result.lines[0].gst_amount, Decimal::ZERO);
    }

    #[test]
    fn test_exclusive_total_is_taxable_plus_rate(item in line_item()) {
        let result = BillCalculator::new()
            .calculate(&[item.clone()], BillTaxConfig::exclusive())
            .unwrap();
        let line = &result.lines[0];

        let base = item.unit_price * item.quantity;
        let expected_taxable = base * (Decimal::ONE_HUNDRED - item.discount_percent) / Decimal::ONE_HUNDRED;
        let expected_total = expected_taxable
            * (Decimal::ONE_HUNDRED + item.gst_rate_percent) / Decimal::ONE_HUNDRED;

        prop_assert_eq!(line.taxable_amount, expected_taxable);
        prop_assert_eq!(line.final_total, round_money(expected_total));
    }

    #[test]
    fn test_inclusive_stripping_round_trips(
        unit_price in price(),
        qty in (1i64..=1_000i64).prop_map(Decimal::from),
        rate in (1i64..=100i64).prop_map(Decimal::from),
    ) {
        let item = LineItem::new(unit_price, qty, rate);
        let line = BillCalculator::calculate_line(1, &item, BillTaxConfig::inclusive()).unwrap();

        let divisor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
        let rebuilt = line.taxable_amount * divisor;

        prop_assert!(
            (rebuilt - line.base_amount).abs() <= dec!(0.01),
            "rebuilt {} from base {}", rebuilt, line.base_amount
        );
        prop_assert_eq!(line.final_total, round_money(line.base_amount));
    }

    #[test]
    fn test_cgst_equals_sgst(item in line_item(), config in tax_config()) {
        let line = BillCalculator::calculate_line(1, &item, config).unwrap();

        prop_assert_eq!(line.cgst_amount, line.sgst_amount);
        prop_assert_eq!(line.cgst_amount + line.sgst_amount, line.gst_amount);
        prop_assert_eq!(line.cgst_rate_percent, line.sgst_rate_percent);
    }

    #[test]
    fn test_final_total_is_taxable_plus_gst(item in line_item(), config in tax_config()) {
        let line = BillCalculator::calculate_line(1, &item, config).unwrap();

        let diff = (line.final_total - (line.taxable_amount + line.gst_amount)).abs();
        prop_assert!(diff <= dec!(0.01));
    }

    #[test]
    fn test_non_gst_never_charges_tax(
        items in prop::collection::vec(line_item(), 1..8),
        mode in prop_oneof![Just(GstMode::Inclusive), Just(GstMode::Exclusive)],
    ) {
        let result = BillCalculator::new()
            .calculate(&items, BillTaxConfig::new(BillGstType::NonGst, mode))
            .unwrap();

        for line in &result.lines {
            prop_assert_eq!(line.gst_amount, Decimal::ZERO);
            prop_assert_eq!(line.gst_rate_percent, Decimal::ZERO);
        }
        prop_assert_eq!(result.totals.total_gst_amount, Decimal::ZERO);
        prop_assert!(result.totals.gst_summary.keys().all(|rate| rate.is_zero()));
    }

    #[test]
    fn test_grand_total_matches_line_totals(
        items in prop::collection::vec(line_item(), 0..6),
        config in tax_config(),
    ) {
        let result = BillCalculator::new().calculate(&items, config).unwrap();

        let raw: Decimal = result
            .lines
            .iter()
            .map(|l| l.taxable_amount + l.gst_amount)
            .sum();
        prop_assert!((result.totals.grand_total - round_money(raw)).abs() <= dec!(0.01));

        // Each line total is off by at most half a paisa
        let rounded: Decimal = result.lines.iter().map(|l| l.final_total).sum();
        let tolerance = dec!(0.005) * Decimal::from(items.len()) + dec!(0.005);
        prop_assert!((result.totals.grand_total - rounded).abs() <= tolerance);
    }

    #[test]
    fn test_lines_keep_input_order(items in prop::collection::vec(line_item(), 0..10)) {
        let result = BillCalculator::new()
            .calculate(&items, BillTaxConfig::exclusive())
            .unwrap();

        prop_assert_eq!(result.lines.len(), items.len());
        for (item, line) in items.iter().zip(&result.lines) {
            prop_assert_eq!(line.base_amount, item.unit_price * item.quantity);
        }
    }

    #[test]
    fn test_summary_buckets_add_up(
        items in prop::collection::vec(line_item(), 1..8),
        config in tax_config(),
    ) {
        let totals = BillCalculator::new().calculate(&items, config).unwrap().totals;

        let bucket_taxable: Decimal = totals.gst_summary.values().map(|e| e.taxable_amount).sum();
        let bucket_count = Decimal::from(totals.gst_summary.len());

        // Buckets are rounded individually, so allow half a paisa per bucket
        prop_assert!(
            (bucket_taxable - totals.total_taxable_amount).abs()
                <= dec!(0.005) * bucket_count + dec!(0.005)
        );
    }
}

#[test]
fn test_exclusive_worked_example() {
    let item = LineItem::new(dec!(100), dec!(2), dec!(18)).with_discount(dec!(10));
    let result = BillCalculator::new()
        .calculate(&[item], BillTaxConfig::exclusive())
        .unwrap();

    let line = &result.lines[0];
    assert_eq!(line.base_amount, dec!(200));
    assert_eq!(line.discount_amount, dec!(20));
    assert_eq!(line.taxable_amount, dec!(180));
    assert_eq!(line.gst_amount, dec!(32.4));
    assert_eq!(line.cgst_amount, dec!(16.2));
    assert_eq!(line.sgst_amount, dec!(16.2));
    assert_eq!(line.final_total.to_string(), "212.40");

    assert_eq!(result.totals.grand_total, dec!(212.40));
    assert_eq!(result.totals.total_taxable_amount, dec!(180.00));
    assert_eq!(result.totals.total_gst_amount, dec!(32.40));
}

#[test]
fn test_inclusive_worked_example() {
    let item = LineItem::new(dec!(100), dec!(2), dec!(18)).with_discount(dec!(10));
    let result = BillCalculator::new()
        .calculate(&[item], BillTaxConfig::inclusive())
        .unwrap();

    let line = &result.lines[0];
    let actual_base = dec!(200) / dec!(1.18);
    assert!((line.discount_amount - dec!(16.9492)).abs() < dec!(0.0001));
    assert!((line.taxable_amount - dec!(152.5424)).abs() < dec!(0.0001));
    assert!((line.gst_amount - dec!(27.4576)).abs() < dec!(0.0001));
    assert_eq!(line.discount_amount, actual_base * dec!(10) / dec!(100));
    assert_eq!(line.final_total, dec!(180.00));
    assert_eq!(result.totals.grand_total, dec!(180.00));
}

#[test]
fn test_same_price_differs_by_mode() {
    // Entering 118 inclusive of 18% GST bills the same as 100 exclusive
    let inclusive = LineItem::new(dec!(118), dec!(2), dec!(18)).with_discount(dec!(10));
    let exclusive = LineItem::new(dec!(100), dec!(2), dec!(18)).with_discount(dec!(10));
    let calc = BillCalculator::new();

    let a = calc.calculate(&[inclusive], BillTaxConfig::inclusive()).unwrap();
    let b = calc.calculate(&[exclusive], BillTaxConfig::exclusive()).unwrap();

    assert_eq!(a.totals.grand_total, dec!(212.40));
    assert_eq!(a.totals, b.totals);
}

#[test]
fn test_shared_calculator_is_deterministic_across_threads() {
    let calculator = Arc::new(BillCalculator::new());
    let lines = Arc::new(vec![
        LineItem::new(dec!(118), dec!(2), dec!(18)).with_discount(dec!(10)),
        LineItem::new(dec!(99.99), dec!(3), dec!(12)),
        LineItem::new(dec!(10), dec!(0.75), dec!(5)).with_discount(dec!(2.5)),
    ]);
    let expected = calculator
        .calculate(&lines, BillTaxConfig::inclusive())
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let calculator = Arc::clone(&calculator);
            let lines = Arc::clone(&lines);
            std::thread::spawn(move || {
                calculator
                    .calculate(&lines, BillTaxConfig::inclusive())
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
