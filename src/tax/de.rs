use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// German assessment year (Veranlagungszeitraum, calendar year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilingYear(pub i32);

impl FilingYear {
    /// Gross-income exemption threshold (Freigrenze) for the commercial
    /// sphere, § 64 Abs. 3 AO. A bright-line test on gross turnover: at or
    /// below it, no profit of the sphere is taxed at all.
    pub fn gross_income_exemption(&self) -> Decimal {
        match self.0 {
            // Raised by the Jahressteuergesetz 2020
            2021.. => dec!(45000),
            // 2007-2020: EUR 35,000
            2007..=2020 => dec!(35000),
            // Earlier: EUR 30,678 (DM 60,000 converted)
            _ => dec!(30678),
        }
    }

    /// Tax-free allowance (Freibetrag) deducted from taxable commercial
    /// income, § 24 KStG and § 11 Abs. 1 S. 3 Nr. 2 GewStG.
    pub fn allowance(&self) -> Decimal {
        match self.0 {
            // 2009 onwards: EUR 5,000
            2009.. => dec!(5000),
            // Earlier: EUR 3,835
            _ => dec!(3835),
        }
    }

    /// Corporate income tax rate, § 23 Abs. 1 KStG
    pub fn corporate_rate(&self) -> Decimal {
        match self.0 {
            // Unternehmensteuerreform 2008: 15%
            2008.. => dec!(0.15),
            // Earlier: 25%
            _ => dec!(0.25),
        }
    }

    /// Solidarity surcharge rate on the corporate tax, SolzG 1995
    pub fn solidarity_rate(&self) -> Decimal {
        // Stable at 5.5% since 1998
        dec!(0.055)
    }

    /// Federal trade tax base rate (Steuermesszahl), § 11 Abs. 2 GewStG.
    /// Scaled by the municipal multiplier to give the actual trade tax.
    pub fn trade_base_rate(&self) -> Decimal {
        match self.0 {
            // Unternehmensteuerreform 2008: 3.5%
            2008.. => dec!(0.035),
            // Earlier: 5%
            _ => dec!(0.05),
        }
    }
}

impl std::fmt::Display for FilingYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
