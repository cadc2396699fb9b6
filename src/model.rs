use crate::error::Error;

/// Validated client and investment parameters driving one document.
/// Field names follow the upstream intake form's JSON shape.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "camelCase"))]
pub struct ProposalRecord {
    pub client_name: String,
    /// May contain embedded newlines; each is honored as a hard line break.
    pub client_address: String,
    pub proposal_date: String,
    pub investment_amount: f64,
    /// Target return over the full horizon, in percent.
    pub target_return: f64,
    /// Investment horizon in years.
    pub time_horizon: u32,
    /// Per-share dividend rates for the three projected years.
    pub year1_dividend: f64,
    pub year2_dividend: f64,
    pub year3_dividend: f64,
}

impl ProposalRecord {
    /// Input invariants. Rendering divides by the amount and uses the horizon
    /// as an exponent denominator, so both must be positive.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.investment_amount > 0.0) || !self.investment_amount.is_finite() {
            return Err(Error::InvalidProposal(format!(
                "investment amount must be positive, got {}",
                self.investment_amount
            )));
        }
        if self.time_horizon == 0 {
            return Err(Error::InvalidProposal(
                "time horizon must be at least one year".into(),
            ));
        }
        for (name, rate) in [
            ("year 1", self.year1_dividend),
            ("year 2", self.year2_dividend),
            ("year 3", self.year3_dividend),
        ] {
            if !(rate >= 0.0) || !rate.is_finite() {
                return Err(Error::InvalidProposal(format!(
                    "{name} dividend rate must be non-negative, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

/// Optional image bytes tagged by role. Read-only inputs; the same buffers
/// may be shared across concurrent generation calls.
#[derive(Clone, Debug, Default)]
pub struct ProposalAssets {
    pub cover: Option<Vec<u8>>,
    pub logo: Option<Vec<u8>>,
    pub signature: Option<Vec<u8>>,
}

/// Finished document bytes plus the physical page count (informational).
#[derive(Clone, Debug)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// One content block of the narrative. The assembler interprets the ordered
/// block list with a single generic draw routine, reserving vertical space
/// before each block.
pub(crate) enum Block {
    /// Numbered section heading, bold.
    Heading(String),
    /// Justified body paragraph.
    Paragraph(String),
    /// Left-aligned lines, each wrapped independently (client block, greeting).
    Lines(Vec<String>),
    /// Bulleted list; every item wraps independently with a hanging indent.
    Bullets(Vec<String>),
    /// Numbered list.
    Numbered(Vec<String>),
    Table(TableSpec),
    /// Extra vertical gap, in points.
    Spacer(f32),
    /// Closing block: optional signature image above these contact lines.
    Signature(Vec<String>),
    /// Small gray wrapped paragraph at the end of the document.
    Disclaimer(String),
}

pub(crate) struct TableSpec {
    pub(crate) col_widths: Vec<f32>,
    pub(crate) rows: Vec<Vec<String>>,
}
