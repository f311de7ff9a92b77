use crate::filing::Filing;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// VAT position: output VAT collected on income, input VAT (Vorsteuer) paid
/// on expenses, and the resulting net payable (Zahllast). A negative net
/// payable is a refund claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VatReturn {
    pub output_vat: Decimal,
    pub input_vat: Decimal,
    pub net_payable: Decimal,
}

/// VAT liability over the filing's VAT-relevant spheres.
///
/// Under the § 19 UStG small-business exemption every figure is zero, with no
/// further computation. Otherwise only the purpose-related and commercial
/// spheres contribute; postings elsewhere are ignored even when they carry a
/// VAT rate.
pub fn calculate(filing: &Filing) -> VatReturn {
    if filing.club.small_business_exemption {
        log::debug!("vat: small-business exemption set, liability is zero");
        return VatReturn::default();
    }

    let mut output_vat = Decimal::ZERO;
    let mut input_vat = Decimal::ZERO;

    for (kind, sphere) in filing.spheres() {
        if !kind.is_vat_relevant() {
            continue;
        }
        for posting in &sphere.income {
            if let Some(rate) = posting.vat_rate {
                output_vat += posting.amount * rate / dec!(100);
            }
        }
        for posting in &sphere.expenses {
            if let Some(rate) = posting.vat_rate {
                input_vat += posting.amount * rate / dec!(100);
            }
        }
    }

    VatReturn {
        output_vat,
        input_vat,
        net_payable: output_vat - input_vat,
    }
}
