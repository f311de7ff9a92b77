use super::de::FilingYear;
use rust_decimal::Decimal;

/// Corporate income tax (Körperschaftsteuer) and the solidarity surcharge
/// (Solidaritätszuschlag) computed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorporateTax {
    pub tax: Decimal,
    pub surcharge: Decimal,
}

impl CorporateTax {
    pub const ZERO: CorporateTax = CorporateTax {
        tax: Decimal::ZERO,
        surcharge: Decimal::ZERO,
    };
}

/// Corporate tax on the gated commercial income, § 23 Abs. 1 KStG, with the
/// surcharge per SolzG.
///
/// Income at or below the § 24 KStG allowance yields zero for both figures;
/// negative income is treated the same, never as a negative tax.
pub fn calculate(taxable_income: Decimal, year: FilingYear) -> CorporateTax {
    let allowance = year.allowance();
    if taxable_income <= allowance {
        return CorporateTax::ZERO;
    }

    let base = taxable_income - allowance;
    let tax = base * year.corporate_rate();
    let surcharge = tax * year.solidarity_rate();
    CorporateTax { tax, surcharge }
}
