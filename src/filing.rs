use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilingError {
    #[error("invalid amount for \"{label}\": {value}")]
    InvalidAmount { label: String, value: String },
    #[error("invalid VAT rate for \"{label}\": {value}")]
    InvalidVatRate { label: String, value: String },
    #[error("invalid filing: {0}")]
    InvalidFiling(String),
}

/// The four activity spheres of a German non-profit club.
///
/// Each sphere has a fixed legal role driving its own offsetting and tax
/// rules, so the spheres are named slots on [`Filing`], never a keyed map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SphereKind {
    /// Ideeller Bereich - core statutory purpose activity (dues, donations)
    Core,
    /// Vermögensverwaltung - passive investment and rental income
    AssetManagement,
    /// Zweckbetrieb - revenue activity serving the exempt purpose
    PurposeBusiness,
    /// Wirtschaftlicher Geschäftsbetrieb - unrelated commercial activity
    Commercial,
}

impl SphereKind {
    pub fn from_str(s: &str) -> Option<SphereKind> {
        match s.to_lowercase().as_str() {
            "core" => Some(SphereKind::Core),
            "asset_management" => Some(SphereKind::AssetManagement),
            "purpose_business" => Some(SphereKind::PurposeBusiness),
            "commercial" => Some(SphereKind::Commercial),
            _ => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            SphereKind::Core => "non-commercial core",
            SphereKind::AssetManagement => "asset management",
            SphereKind::PurposeBusiness => "purpose-related business",
            SphereKind::Commercial => "commercial business",
        }
    }

    /// Only the purpose-related and commercial spheres are subject to VAT
    /// (§ 12 Abs. 2 Nr. 8 UStG); the other two are structurally excluded,
    /// whatever rates their postings carry.
    pub fn is_vat_relevant(&self) -> bool {
        matches!(self, SphereKind::PurposeBusiness | SphereKind::Commercial)
    }
}

impl std::fmt::Display for SphereKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// A single labeled income or expense line item.
///
/// The amount is always non-negative; whether it acts as a gain or a cost is
/// determined by the list it sits in, not by sign.
#[derive(Debug, Clone)]
pub struct Posting {
    pub label: String,
    pub amount: Decimal,
    /// VAT rate in percent, only meaningful within VAT-relevant spheres
    pub vat_rate: Option<Decimal>,
    /// Carried for the donation annex of the filing, not consumed by the
    /// tax computations
    pub treat_as_donation: bool,
}

/// One activity sphere: income and expense postings plus a flat lump-sum
/// deduction (statutory allowances already consumed, e.g. volunteer-work
/// allowances) applied once per sphere.
#[derive(Debug, Clone, Default)]
pub struct Sphere {
    pub income: Vec<Posting>,
    pub expenses: Vec<Posting>,
    pub lump_sum_deduction: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct Address {
    pub street: String,
    pub postal_code: String,
    pub city: String,
}

/// Club master data. The municipal multiplier and the small-business flag are
/// read-only inputs to the tax calculators.
#[derive(Debug, Clone)]
pub struct ClubDetails {
    pub name: String,
    pub address: Address,
    pub tax_number: Option<String>,
    pub tax_office: Option<String>,
    /// Hebesatz in percent (e.g. 400)
    pub municipal_multiplier: Decimal,
    /// § 19 UStG Kleinunternehmerregelung
    pub small_business_exemption: bool,
}

/// One validated filing year for one club.
///
/// Constructed only through [`FilingRecord::into_filing`], so the tax engine
/// never observes unvalidated data.
#[derive(Debug, Clone)]
pub struct Filing {
    pub year: i32,
    pub club: ClubDetails,
    pub core: Sphere,
    pub asset_management: Sphere,
    pub purpose_business: Sphere,
    pub commercial: Sphere,
}

impl Filing {
    /// The four spheres with their legal roles, in statutory order.
    pub fn spheres(&self) -> [(SphereKind, &Sphere); 4] {
        [
            (SphereKind::Core, &self.core),
            (SphereKind::AssetManagement, &self.asset_management),
            (SphereKind::PurposeBusiness, &self.purpose_business),
            (SphereKind::Commercial, &self.commercial),
        ]
    }
}

/// Parse a raw amount input into a non-negative decimal.
///
/// Trims whitespace and accepts a single comma as the decimal separator when
/// no dot is present ("1234,56"). Rejects anything unparseable or negative.
/// Idempotent over its own output, no side effects.
pub fn parse_amount(label: &str, raw: &str) -> Result<Decimal, FilingError> {
    let invalid = || FilingError::InvalidAmount {
        label: label.to_string(),
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    let amount = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    if amount < Decimal::ZERO {
        return Err(invalid());
    }
    Ok(amount)
}

fn check_vat_rate(label: &str, rate: Decimal) -> Result<(), FilingError> {
    if rate < Decimal::ZERO || rate > Decimal::from(100) {
        return Err(FilingError::InvalidVatRate {
            label: label.to_string(),
            value: rate.to_string(),
        });
    }
    Ok(())
}

/// Input root for filing JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FilingRecord {
    /// Assessment year (e.g. 2024)
    pub year: i32,
    pub club: ClubRecord,
    /// Ideeller Bereich
    #[serde(default)]
    pub core: SphereRecord,
    /// Vermögensverwaltung
    #[serde(default)]
    pub asset_management: SphereRecord,
    /// Zweckbetrieb
    #[serde(default)]
    pub purpose_business: SphereRecord,
    /// Wirtschaftlicher Geschäftsbetrieb
    #[serde(default)]
    pub commercial: SphereRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ClubRecord {
    /// Registered club name
    pub name: String,
    #[serde(default)]
    pub address: AddressRecord,
    /// Steuernummer, if already assigned
    #[serde(default)]
    pub tax_number: Option<String>,
    /// Responsible tax office (Finanzamt)
    #[serde(default)]
    pub tax_office: Option<String>,
    /// Municipal trade-tax multiplier (Hebesatz) in percent, e.g. 400
    #[schemars(with = "f64")]
    pub municipal_multiplier: Decimal,
    /// § 19 UStG small-business exemption; zeroes all VAT when set
    #[serde(default)]
    pub small_business_exemption: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AddressRecord {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SphereRecord {
    #[serde(default)]
    pub income: Vec<PostingRecord>,
    #[serde(default)]
    pub expenses: Vec<PostingRecord>,
    /// Flat lump-sum deduction for this sphere, decimal string (e.g. "840")
    #[serde(default)]
    pub lump_sum_deduction: Option<String>,
}

/// A single income or expense line item as entered by the user.
///
/// Amounts travel as strings so that exact decimal parsing and the
/// non-negativity check happen in one place, before any calculation runs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PostingRecord {
    /// Short description of the line item
    pub label: String,
    /// Non-negative decimal string, dot or comma separated ("1234.56")
    pub amount: String,
    /// VAT rate in percent (0-100), only used in VAT-relevant spheres
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub vat_rate: Option<Decimal>,
    /// Treat this posting as a donation equivalent
    #[serde(default)]
    pub treat_as_donation: bool,
}

impl PostingRecord {
    fn into_posting(self) -> Result<Posting, FilingError> {
        let amount = parse_amount(&self.label, &self.amount)?;
        if let Some(rate) = self.vat_rate {
            check_vat_rate(&self.label, rate)?;
        }
        Ok(Posting {
            label: self.label,
            amount,
            vat_rate: self.vat_rate,
            treat_as_donation: self.treat_as_donation,
        })
    }
}

impl SphereRecord {
    fn into_sphere(self, kind: SphereKind) -> Result<Sphere, FilingError> {
        let income = self
            .income
            .into_iter()
            .map(PostingRecord::into_posting)
            .collect::<Result<Vec<_>, _>>()?;
        let expenses = self
            .expenses
            .into_iter()
            .map(PostingRecord::into_posting)
            .collect::<Result<Vec<_>, _>>()?;
        let lump_sum_deduction = match self.lump_sum_deduction {
            Some(raw) => parse_amount(&format!("{} lump-sum deduction", kind), &raw)?,
            None => Decimal::ZERO,
        };
        Ok(Sphere {
            income,
            expenses,
            lump_sum_deduction,
        })
    }

    fn collect_issues(&self, kind: SphereKind, issues: &mut Vec<FilingError>) {
        for posting in self.income.iter().chain(self.expenses.iter()) {
            if let Err(e) = parse_amount(&posting.label, &posting.amount) {
                issues.push(e);
            }
            if let Some(rate) = posting.vat_rate {
                if let Err(e) = check_vat_rate(&posting.label, rate) {
                    issues.push(e);
                }
            }
        }
        if let Some(raw) = &self.lump_sum_deduction {
            if let Err(e) = parse_amount(&format!("{} lump-sum deduction", kind), raw) {
                issues.push(e);
            }
        }
    }
}

impl FilingRecord {
    /// Validate and convert into a [`Filing`], failing fast on the first
    /// problem. Nothing downstream runs when this fails.
    pub fn into_filing(self) -> Result<Filing, FilingError> {
        check_structure(&self)?;
        Ok(Filing {
            year: self.year,
            club: ClubDetails {
                name: self.club.name,
                address: Address {
                    street: self.club.address.street,
                    postal_code: self.club.address.postal_code,
                    city: self.club.address.city,
                },
                tax_number: self.club.tax_number,
                tax_office: self.club.tax_office,
                municipal_multiplier: self.club.municipal_multiplier,
                small_business_exemption: self.club.small_business_exemption,
            },
            core: self.core.into_sphere(SphereKind::Core)?,
            asset_management: self
                .asset_management
                .into_sphere(SphereKind::AssetManagement)?,
            purpose_business: self
                .purpose_business
                .into_sphere(SphereKind::PurposeBusiness)?,
            commercial: self.commercial.into_sphere(SphereKind::Commercial)?,
        })
    }

    /// Collect every validation problem at once, for reporting near the
    /// offending entries. The engine itself stays fail-fast.
    pub fn issues(&self) -> Vec<FilingError> {
        let mut issues = Vec::new();
        if let Err(e) = check_structure(self) {
            issues.push(e);
        }
        self.core.collect_issues(SphereKind::Core, &mut issues);
        self.asset_management
            .collect_issues(SphereKind::AssetManagement, &mut issues);
        self.purpose_business
            .collect_issues(SphereKind::PurposeBusiness, &mut issues);
        self.commercial
            .collect_issues(SphereKind::Commercial, &mut issues);
        issues
    }
}

fn check_structure(record: &FilingRecord) -> Result<(), FilingError> {
    if !(2000..=2100).contains(&record.year) {
        return Err(FilingError::InvalidFiling(format!(
            "assessment year {} out of range",
            record.year
        )));
    }
    if record.club.name.trim().is_empty() {
        return Err(FilingError::InvalidFiling("club name is missing".into()));
    }
    if record.club.municipal_multiplier <= Decimal::ZERO {
        return Err(FilingError::InvalidFiling(format!(
            "municipal multiplier must be positive, got {}",
            record.club.municipal_multiplier
        )));
    }
    Ok(())
}

/// Read a filing document from JSON
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<FilingRecord> {
    let record: FilingRecord = serde_json::from_reader(reader)?;
    Ok(record)
}

/// CSV record for the flat postings import format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingCsvRecord {
    /// core, asset_management, purpose_business or commercial
    pub sphere: String,
    /// income or expense
    pub flow: String,
    pub label: String,
    pub amount: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<Decimal>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation: Option<bool>,
}

/// Read flat postings from CSV, in file order
pub fn read_postings_csv<R: Read>(reader: R) -> anyhow::Result<Vec<PostingCsvRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records: Result<Vec<PostingCsvRecord>, _> =
        rdr.deserialize::<PostingCsvRecord>().collect();
    Ok(records?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn posting(label: &str, amount: &str) -> PostingRecord {
        PostingRecord {
            label: label.to_string(),
            amount: amount.to_string(),
            vat_rate: None,
            treat_as_donation: false,
        }
    }

    fn minimal_record() -> FilingRecord {
        FilingRecord {
            year: 2024,
            club: ClubRecord {
                name: "Musterverein e.V.".to_string(),
                municipal_multiplier: dec!(400),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn parse_amount_plain() {
        assert_eq!(parse_amount("a", "1234.56"), Ok(dec!(1234.56)));
        assert_eq!(parse_amount("a", "0"), Ok(dec!(0)));
        assert_eq!(parse_amount("a", "  250 "), Ok(dec!(250)));
    }

    #[test]
    fn parse_amount_comma_decimal() {
        assert_eq!(parse_amount("a", "1234,56"), Ok(dec!(1234.56)));
        assert_eq!(parse_amount("a", "0,05"), Ok(dec!(0.05)));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        for raw in ["", "abc", "12.34.56", "1.234,56", "--5"] {
            assert!(
                matches!(
                    parse_amount("Eintritt", raw),
                    Err(FilingError::InvalidAmount { .. })
                ),
                "expected rejection for {:?}",
                raw
            );
        }
    }

    #[test]
    fn parse_amount_rejects_negative() {
        let err = parse_amount("Eintritt", "-10").unwrap_err();
        assert_eq!(
            err,
            FilingError::InvalidAmount {
                label: "Eintritt".to_string(),
                value: "-10".to_string(),
            }
        );
    }

    #[test]
    fn parse_amount_idempotent() {
        let once = parse_amount("a", "1234,56").unwrap();
        let twice = parse_amount("a", &once.to_string()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn into_filing_converts_postings() {
        let mut record = minimal_record();
        record.commercial.income.push(posting("Verkauf", "50000"));
        record.commercial.expenses.push(posting("Waren", "10000,50"));
        record.commercial.lump_sum_deduction = Some("0".to_string());

        let filing = record.into_filing().unwrap();
        assert_eq!(filing.year, 2024);
        assert_eq!(filing.commercial.income[0].amount, dec!(50000));
        assert_eq!(filing.commercial.expenses[0].amount, dec!(10000.50));
        assert_eq!(filing.commercial.lump_sum_deduction, dec!(0));
    }

    #[test]
    fn into_filing_rejects_bad_amount() {
        let mut record = minimal_record();
        record.core.income.push(posting("Beiträge", "n/a"));

        assert!(matches!(
            record.into_filing(),
            Err(FilingError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn into_filing_rejects_vat_rate_out_of_range() {
        let mut record = minimal_record();
        record.commercial.income.push(PostingRecord {
            vat_rate: Some(dec!(119)),
            ..posting("Verkauf", "100")
        });

        assert!(matches!(
            record.into_filing(),
            Err(FilingError::InvalidVatRate { .. })
        ));
    }

    #[test]
    fn into_filing_rejects_missing_club_name() {
        let mut record = minimal_record();
        record.club.name = "  ".to_string();

        assert!(matches!(
            record.into_filing(),
            Err(FilingError::InvalidFiling(_))
        ));
    }

    #[test]
    fn into_filing_rejects_year_out_of_range() {
        let mut record = minimal_record();
        record.year = 1999;

        assert!(matches!(
            record.into_filing(),
            Err(FilingError::InvalidFiling(_))
        ));
    }

    #[test]
    fn into_filing_rejects_nonpositive_multiplier() {
        let mut record = minimal_record();
        record.club.municipal_multiplier = dec!(0);

        assert!(matches!(
            record.into_filing(),
            Err(FilingError::InvalidFiling(_))
        ));
    }

    #[test]
    fn issues_collects_all_problems() {
        let mut record = minimal_record();
        record.core.income.push(posting("Beiträge", "abc"));
        record.commercial.expenses.push(posting("Waren", "-5"));
        record.purpose_business.lump_sum_deduction = Some("x".to_string());

        let issues = record.issues();
        assert_eq!(issues.len(), 3);
        assert!(record.into_filing().is_err());
    }

    #[test]
    fn spheres_in_statutory_order() {
        let filing = minimal_record().into_filing().unwrap();
        let kinds: Vec<_> = filing.spheres().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                SphereKind::Core,
                SphereKind::AssetManagement,
                SphereKind::PurposeBusiness,
                SphereKind::Commercial,
            ]
        );
    }

    #[test]
    fn sphere_kind_from_str() {
        assert_eq!(SphereKind::from_str("core"), Some(SphereKind::Core));
        assert_eq!(
            SphereKind::from_str("COMMERCIAL"),
            Some(SphereKind::Commercial)
        );
        assert_eq!(
            SphereKind::from_str("asset_management"),
            Some(SphereKind::AssetManagement)
        );
        assert_eq!(SphereKind::from_str("ideell"), None);
    }

    #[test]
    fn read_json_filing() {
        let json = r#"{
            "year": 2024,
            "club": {
                "name": "Musterverein e.V.",
                "municipal_multiplier": 400,
                "small_business_exemption": true
            },
            "purpose_business": {
                "income": [
                    {"label": "Kursgebühren", "amount": "1200,50", "vat_rate": 7}
                ]
            }
        }"#;

        let record = read_json(json.as_bytes()).unwrap();
        let filing = record.into_filing().unwrap();
        assert!(filing.club.small_business_exemption);
        assert_eq!(filing.purpose_business.income[0].amount, dec!(1200.50));
        assert_eq!(filing.purpose_business.income[0].vat_rate, Some(dec!(7)));
        assert!(filing.commercial.income.is_empty());
    }

    #[test]
    fn read_postings_csv_records() {
        let csv_data = "\
sphere,flow,label,amount,vat_rate,donation
core,income,Mitgliedsbeiträge,12000,,
commercial,income,Vereinsheim-Verkauf,50000,19,
commercial,expense,Wareneinsatz,10000,19,
core,income,Spende Stadtwerke,500,,true";

        let records = read_postings_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].sphere, "core");
        assert_eq!(records[1].vat_rate, Some(dec!(19)));
        assert_eq!(records[3].donation, Some(true));
    }
}
