use crate::filing::{Filing, Posting, Sphere};
use rust_decimal::Decimal;

/// Sum of posting amounts
pub fn sum_amounts(postings: &[Posting]) -> Decimal {
    postings.iter().map(|p| p.amount).sum()
}

/// Net result of one sphere: income minus expenses minus the lump-sum
/// deduction. The deduction is subtracted unconditionally, so the result may
/// be negative (a loss). Total function, no error paths.
pub fn net_result(sphere: &Sphere) -> Decimal {
    sum_amounts(&sphere.income) - sum_amounts(&sphere.expenses) - sphere.lump_sum_deduction
}

/// Gross income of a sphere: the sum of its income postings only, before any
/// deduction or offsetting. Consumed by the § 64 Abs. 3 AO threshold gate on
/// the commercial sphere, never by the offset resolver.
pub fn gross_income(sphere: &Sphere) -> Decimal {
    sum_amounts(&sphere.income)
}

/// The four sphere results, one named slot per legal role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereResults {
    pub core: Decimal,
    pub asset_management: Decimal,
    pub purpose_business: Decimal,
    pub commercial: Decimal,
}

impl SphereResults {
    /// Initial (pre-offsetting) results of a filing's four spheres
    pub fn initial(filing: &Filing) -> Self {
        SphereResults {
            core: net_result(&filing.core),
            asset_management: net_result(&filing.asset_management),
            purpose_business: net_result(&filing.purpose_business),
            commercial: net_result(&filing.commercial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn posting(label: &str, amount: Decimal) -> Posting {
        Posting {
            label: label.to_string(),
            amount,
            vat_rate: None,
            treat_as_donation: false,
        }
    }

    fn sphere(income: &[Decimal], expenses: &[Decimal], lump_sum: Decimal) -> Sphere {
        Sphere {
            income: income.iter().map(|a| posting("in", *a)).collect(),
            expenses: expenses.iter().map(|a| posting("out", *a)).collect(),
            lump_sum_deduction: lump_sum,
        }
    }

    #[test]
    fn sum_amounts_adds_up() {
        let postings = vec![
            posting("Posten 1", dec!(100.50)),
            posting("Posten 2", dec!(50.25)),
            posting("Posten 3", dec!(200)),
        ];
        assert_eq!(sum_amounts(&postings), dec!(350.75));
    }

    #[test]
    fn net_result_surplus() {
        let s = sphere(&[dec!(1000), dec!(500)], &[dec!(300), dec!(200)], dec!(0));
        assert_eq!(net_result(&s), dec!(1000));
    }

    #[test]
    fn net_result_deducts_lump_sum() {
        let s = sphere(&[dec!(1000)], &[dec!(200)], dec!(840));
        assert_eq!(net_result(&s), dec!(-40));
    }

    #[test]
    fn net_result_loss() {
        let s = sphere(&[dec!(10000)], &[dec!(15000)], dec!(0));
        assert_eq!(net_result(&s), dec!(-5000));
    }

    #[test]
    fn net_result_empty_sphere_is_zero() {
        assert_eq!(net_result(&Sphere::default()), dec!(0));
    }

    #[test]
    fn gross_income_ignores_expenses_and_lump_sum() {
        let s = sphere(&[dec!(40000), dec!(10000)], &[dec!(30000)], dec!(840));
        assert_eq!(gross_income(&s), dec!(50000));
    }
}
