//! Inter-sphere loss offsetting (Verlustverrechnung).
//!
//! The statute fixes both the direction and the order of the offsets, and
//! reordering changes the numeric outcome. Each step is an immutable
//! transformation returning a new set of results, so the sequence stays
//! explicit and each step is testable on its own.

use super::sphere::SphereResults;
use rust_decimal::Decimal;

/// Resolve the statutory offsetting sequence over the four initial sphere
/// results.
///
/// 1. A commercial profit first covers a purpose-related-business loss,
/// 2. then, with whatever remains, an asset-management loss.
/// 3. A commercial loss still open after that is covered by
///    purpose-related-business profit only - never by asset management.
///
/// The non-commercial core result is never read or written here. A
/// commercial loss that survives step 3 stays where it is.
pub fn resolve(initial: SphereResults) -> SphereResults {
    let results = offset_purpose_loss(initial);
    let results = offset_asset_loss(results);
    offset_commercial_loss(results)
}

/// Amount by which `profit` can cover `loss`: the smaller of the open loss
/// and the available profit, zero when either side has the wrong sign. The
/// loss only ever moves toward zero, never past it.
fn coverable(loss: Decimal, profit: Decimal) -> Decimal {
    if loss >= Decimal::ZERO || profit <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    loss.abs().min(profit)
}

/// Step 1: commercial profit covers a purpose-related-business loss
fn offset_purpose_loss(r: SphereResults) -> SphereResults {
    let amount = coverable(r.purpose_business, r.commercial);
    if amount > Decimal::ZERO {
        log::debug!(
            "offset: purpose-business loss {} covered by commercial profit, moving {}",
            r.purpose_business,
            amount
        );
    }
    SphereResults {
        purpose_business: r.purpose_business + amount,
        commercial: r.commercial - amount,
        ..r
    }
}

/// Step 2: remaining commercial profit covers an asset-management loss
fn offset_asset_loss(r: SphereResults) -> SphereResults {
    let amount = coverable(r.asset_management, r.commercial);
    if amount > Decimal::ZERO {
        log::debug!(
            "offset: asset-management loss {} covered by commercial profit, moving {}",
            r.asset_management,
            amount
        );
    }
    SphereResults {
        asset_management: r.asset_management + amount,
        commercial: r.commercial - amount,
        ..r
    }
}

/// Step 3: a remaining commercial loss is covered by purpose-related-business
/// profit. Asset management never absorbs a commercial loss.
fn offset_commercial_loss(r: SphereResults) -> SphereResults {
    let amount = coverable(r.commercial, r.purpose_business);
    if amount > Decimal::ZERO {
        log::debug!(
            "offset: commercial loss {} covered by purpose-business profit, moving {}",
            r.commercial,
            amount
        );
    }
    SphereResults {
        commercial: r.commercial + amount,
        purpose_business: r.purpose_business - amount,
        ..r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn results(
        core: Decimal,
        asset_management: Decimal,
        purpose_business: Decimal,
        commercial: Decimal,
    ) -> SphereResults {
        SphereResults {
            core,
            asset_management,
            purpose_business,
            commercial,
        }
    }

    #[test]
    fn no_losses_nothing_moves() {
        let initial = results(dec!(100), dec!(200), dec!(300), dec!(400));
        assert_eq!(resolve(initial), initial);
    }

    #[test]
    fn commercial_profit_covers_purpose_loss() {
        let r = resolve(results(dec!(0), dec!(0), dec!(-2000), dec!(5000)));
        assert_eq!(r.purpose_business, dec!(0));
        assert_eq!(r.commercial, dec!(3000));
    }

    #[test]
    fn commercial_profit_covers_both_losses_in_order() {
        // Profit 5,000 against purpose loss -2,000 and asset loss -1,500
        let r = resolve(results(dec!(0), dec!(-1500), dec!(-2000), dec!(5000)));
        assert_eq!(r.purpose_business, dec!(0));
        assert_eq!(r.asset_management, dec!(0));
        assert_eq!(r.commercial, dec!(1500));
    }

    #[test]
    fn small_commercial_profit_consumed_purpose_first() {
        // Profit 3,000 is smaller than the combined losses: purpose is
        // covered in full first, asset management only partially, and the
        // commercial result lands exactly on zero.
        let r = resolve(results(dec!(0), dec!(-4000), dec!(-2000), dec!(3000)));
        assert_eq!(r.purpose_business, dec!(0));
        assert_eq!(r.asset_management, dec!(-3000));
        assert_eq!(r.commercial, dec!(0));
    }

    #[test]
    fn loss_never_pushed_past_zero() {
        // Profit 10,000 against a single loss of -2,000: only 2,000 moves
        let r = resolve(results(dec!(0), dec!(-2000), dec!(0), dec!(10000)));
        assert_eq!(r.asset_management, dec!(0));
        assert_eq!(r.commercial, dec!(8000));
    }

    #[test]
    fn purpose_profit_covers_commercial_loss() {
        let r = resolve(results(dec!(0), dec!(0), dec!(4000), dec!(-2500)));
        assert_eq!(r.commercial, dec!(0));
        assert_eq!(r.purpose_business, dec!(1500));
    }

    #[test]
    fn purpose_profit_only_partially_covers_commercial_loss() {
        let r = resolve(results(dec!(0), dec!(0), dec!(1000), dec!(-2500)));
        assert_eq!(r.purpose_business, dec!(0));
        assert_eq!(r.commercial, dec!(-1500));
    }

    #[test]
    fn asset_profit_never_covers_commercial_loss() {
        // The asymmetry: asset-management profit stays untouched even while
        // the commercial sphere keeps its loss.
        let r = resolve(results(dec!(0), dec!(8000), dec!(0), dec!(-3000)));
        assert_eq!(r.asset_management, dec!(8000));
        assert_eq!(r.commercial, dec!(-3000));
    }

    #[test]
    fn core_result_is_isolated() {
        for core in [dec!(-10000), dec!(0), dec!(12345.67)] {
            let r = resolve(results(core, dec!(-1500), dec!(-2000), dec!(5000)));
            assert_eq!(r.core, core);
        }
    }

    #[test]
    fn uncovered_commercial_loss_remains() {
        let r = resolve(results(dec!(0), dec!(0), dec!(0), dec!(-7000)));
        assert_eq!(r.commercial, dec!(-7000));
    }

    #[test]
    fn step_order_is_purpose_before_asset() {
        // Profit 1,000 cannot cover both: it must go to purpose first
        let r = resolve(results(dec!(0), dec!(-1000), dec!(-1000), dec!(1000)));
        assert_eq!(r.purpose_business, dec!(0));
        assert_eq!(r.asset_management, dec!(-1000));
        assert_eq!(r.commercial, dec!(0));
    }

    #[test]
    fn total_is_preserved_by_offsetting() {
        let initial = results(dec!(500), dec!(-1500), dec!(-2000), dec!(5000));
        let r = resolve(initial);
        let before =
            initial.core + initial.asset_management + initial.purpose_business + initial.commercial;
        let after = r.core + r.asset_management + r.purpose_business + r.commercial;
        assert_eq!(before, after);
    }
}
