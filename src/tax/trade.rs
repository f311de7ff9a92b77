use super::de::FilingYear;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Trade tax (Gewerbesteuer) on the gated commercial income.
///
/// § 11 Abs. 1 S. 3 GewStG: the income is rounded down to a full multiple of
/// EUR 100 *before* the allowance is subtracted; the result is scaled by the
/// federal base rate and the municipal multiplier. Never negative.
pub fn calculate(
    taxable_income: Decimal,
    municipal_multiplier: Decimal,
    year: FilingYear,
) -> Decimal {
    let allowance = year.allowance();
    if taxable_income <= allowance {
        return Decimal::ZERO;
    }

    // Round down to the nearest 100 first - order matters
    let rounded = (taxable_income / dec!(100)).floor() * dec!(100);
    let base = rounded - allowance;

    let tax = base * year.trade_base_rate() * (municipal_multiplier / dec!(100));
    tax.max(Decimal::ZERO)
}
