//! Assessment facade: runs the full computation in the statutory order and
//! assembles the result. Pure over a validated filing snapshot; every
//! invocation computes from scratch.

use super::corporate;
use super::de::FilingYear;
use super::offset;
use super::sphere::{self, SphereResults};
use super::trade;
use super::vat::{self, VatReturn};
use crate::filing::Filing;
use rust_decimal::Decimal;

/// The complete computed tax position for one filing year. Derived, never
/// persisted; recomputed from the filing on every invocation.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub year: FilingYear,
    /// Per-sphere results before offsetting
    pub initial_results: SphereResults,
    /// Per-sphere results after the statutory offsetting sequence
    pub final_results: SphereResults,
    /// Commercial income after the § 64 Abs. 3 AO gate
    pub taxable_commercial_income: Decimal,
    pub corporate_tax: Decimal,
    pub solidarity_surcharge: Decimal,
    pub trade_tax: Decimal,
    pub vat: VatReturn,
    pub total_liability: Decimal,
}

/// The § 64 Abs. 3 AO gate: at or below the gross-income exemption
/// threshold, the taxable commercial figure is zero regardless of the offset
/// result. The test reads *gross* income (pre-deduction, pre-offsetting).
///
/// Note this zeroes a profit even when it only exists because offsetting
/// moved it into the commercial sphere; that bright-line reading follows the
/// observed statute application and should be confirmed with a domain expert
/// rather than changed here.
pub fn taxable_commercial_income(
    gross_income: Decimal,
    offset_result: Decimal,
    year: FilingYear,
) -> Decimal {
    let threshold = year.gross_income_exemption();
    if gross_income <= threshold {
        log::debug!(
            "gate: gross commercial income {} at or below the {} exemption, not taxable",
            gross_income,
            threshold
        );
        Decimal::ZERO
    } else {
        offset_result
    }
}

/// Compute the full assessment in the fixed statutory order: sphere results,
/// offsetting, threshold gate, the three tax calculations, total.
pub fn assess(filing: &Filing) -> Assessment {
    let year = FilingYear(filing.year);

    let initial_results = SphereResults::initial(filing);
    let final_results = offset::resolve(initial_results);

    let gross_commercial = sphere::gross_income(&filing.commercial);
    let taxable = taxable_commercial_income(gross_commercial, final_results.commercial, year);

    let corporate = corporate::calculate(taxable, year);
    let trade_tax = trade::calculate(taxable, filing.club.municipal_multiplier, year);
    let vat = vat::calculate(filing);

    let total_liability = corporate.tax + corporate.surcharge + trade_tax + vat.net_payable;

    Assessment {
        year,
        initial_results,
        final_results,
        taxable_commercial_income: taxable,
        corporate_tax: corporate.tax,
        solidarity_surcharge: corporate.surcharge,
        trade_tax,
        vat,
        total_liability,
    }
}
