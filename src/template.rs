use crate::model::{Block, ProposalRecord, TableSpec};
use crate::projection::{ProjectionFigures, SHARE_PRICE};

pub(crate) const COMPANY_NAME: &str = "Harborview Capital Partners";
pub(crate) const SIGNER_NAME: &str = "Daniel Okafor";
pub(crate) const SIGNER_TITLE: &str = "Managing Partner";
pub(crate) const COMPANY_EMAIL: &str = "invest@harborviewcapital.com";
pub(crate) const COMPANY_PHONE: &str = "+1 (415) 555-0142";

/// Legal footer re-applied to every content page.
pub(crate) const FOOTER_LINES: [&str; 4] = [
    "Harborview Capital Partners LLC",
    "200 Pier Avenue, Suite 400, San Francisco, CA 94111",
    "Investment advisory services offered through Harborview Capital Partners LLC, a registered investment adviser.",
    "This document is confidential and intended solely for the named recipient.",
];

pub(crate) const COVER_BOILERPLATE: [&str; 3] = [
    "Harborview Capital Partners LLC is a registered investment adviser.",
    "invest@harborviewcapital.com  \u{2022}  +1 (415) 555-0142",
    "200 Pier Avenue, Suite 400, San Francisco, CA 94111",
];

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `$1,234,567.89` — grouping separators, two fixed decimals.
pub(crate) fn format_currency(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let (sign, cents) = if cents < 0 { ("-", -cents) } else { ("", cents) };
    let whole = group_thousands(&(cents / 100).to_string());
    format!("{sign}${whole}.{:02}", cents % 100)
}

/// Grouped whole number, e.g. a share count.
pub(crate) fn format_count(value: f64) -> String {
    let n = value.round() as i64;
    let (sign, n) = if n < 0 { ("-", -n) } else { ("", n) };
    format!("{sign}{}", group_thousands(&n.to_string()))
}

/// Two fixed decimals: `72.00%`.
pub(crate) fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Per-share dividend rate, three fixed decimals: `$1.440`.
pub(crate) fn format_rate(value: f64) -> String {
    format!("${value:.3}")
}

/// Split an address on embedded newlines; each hard line is later width-
/// wrapped like any other text.
fn address_lines(address: &str) -> Vec<String> {
    address
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// The fixed narrative, in document order, with projection figures merged
/// into the template strings. Pure data; the assembler interprets it.
pub(crate) fn build_blocks(record: &ProposalRecord, figures: &ProjectionFigures) -> Vec<Block> {
    let amount = format_currency(record.investment_amount);
    let target_value = format_currency(figures.target_value);
    let target_return = format_percent(record.target_return);
    let annualized = format_percent(figures.annualized_return * 100.0);
    let shares = format_count(figures.shares_issued);
    let share_price = format_currency(SHARE_PRICE);
    let year3_value = format_currency(figures.year_values[3]);
    let horizon = record.time_horizon;

    let mut client_block = vec![record.client_name.clone()];
    client_block.extend(address_lines(&record.client_address));

    let dividends = [
        record.year1_dividend,
        record.year2_dividend,
        record.year3_dividend,
    ];
    let mut cash_flow_rows = vec![
        vec![
            "Year".to_string(),
            "Shares".to_string(),
            "Dividend rate".to_string(),
            "Return".to_string(),
            "Growth".to_string(),
            "Cumulative value".to_string(),
        ],
        vec![
            "0".to_string(),
            shares.clone(),
            "\u{2013}".to_string(),
            "\u{2013}".to_string(),
            "\u{2013}".to_string(),
            amount.clone(),
        ],
    ];
    for (i, rate) in dividends.into_iter().enumerate() {
        cash_flow_rows.push(vec![
            (i + 1).to_string(),
            shares.clone(),
            format_rate(rate),
            format_currency(figures.year_returns[i]),
            format_percent(figures.year_growth[i]),
            format_currency(figures.year_values[i + 1]),
        ]);
    }

    vec![
        Block::Lines(vec![record.proposal_date.clone()]),
        Block::Spacer(6.0),
        Block::Lines(client_block),
        Block::Spacer(10.0),
        Block::Lines(vec![format!("Dear {},", record.client_name)]),
        Block::Paragraph(
            "Thank you for the time you have taken to consider this opportunity. The pages \
             that follow set out the structure, projected returns, and key risks of the \
             proposed investment, together with the steps required to proceed."
                .into(),
        ),
        Block::Heading("1. Executive Summary".into()),
        Block::Paragraph(format!(
            "{COMPANY_NAME} is pleased to present this investment proposal for your \
             consideration. The proposal contemplates a capital commitment of {amount} over \
             a {horizon}-year horizon, targeting a total return of {target_return} and a \
             portfolio value of {target_value} at maturity. Returns are generated through a \
             dividend-bearing share structure: your commitment purchases {shares} shares at \
             a fixed issue price of {share_price} per share, and each year's dividend \
             compounds into the cumulative value of your holding. On the stated target, \
             this corresponds to an annualized return of {annualized} per year."
        )),
        Block::Heading("2. Key Highlights".into()),
        Block::Bullets(vec![
            format!("Fixed issue price of {share_price} per share, with {shares} shares allocated at closing."),
            format!("Projected cumulative value of {year3_value} by the end of year 3 on the declared dividend schedule alone."),
            format!("Target portfolio value of {target_value}, an uplift of {target_return} on committed capital."),
            "Quarterly reporting with full transparency on dividend declarations and portfolio composition.".into(),
            "No lock-in beyond the stated horizon; exit options are reviewed with each client annually.".into(),
        ]),
        Block::Heading("3. Market Outlook".into()),
        Block::Paragraph(
            "Our allocation committee expects dividend-generating assets to remain well \
             supported through the coming investment cycle. Income-focused strategies \
             continue to benefit from stable underlying cash flows even in periods of \
             broader market volatility, and the portfolio underlying this proposal is \
             weighted toward sectors with durable demand characteristics:"
                .into(),
        ),
        Block::Bullets(vec![
            "Infrastructure and utilities".into(),
            "Healthcare and life sciences".into(),
            "Consumer staples".into(),
            "Industrial technology".into(),
            "Energy transition".into(),
        ]),
        Block::Heading("4. Investment Structure".into()),
        Block::Table(TableSpec {
            col_widths: vec![190.0, 291.0],
            rows: vec![
                vec!["Item".into(), "Detail".into()],
                vec!["Investment amount".into(), amount.clone()],
                vec!["Share price at issue".into(), share_price.clone()],
                vec!["Shares issued".into(), shares.clone()],
                vec!["Investment horizon".into(), format!("{horizon} years")],
                vec!["Target value at maturity".into(), target_value.clone()],
                vec!["Target annualized return".into(), annualized.clone()],
            ],
        }),
        Block::Heading("5. Projected Returns".into()),
        Block::Table(TableSpec {
            col_widths: vec![50.0, 88.0, 88.0, 88.0, 72.0, 95.0],
            rows: cash_flow_rows,
        }),
        Block::Heading("6. Risk Mitigation".into()),
        Block::Bullets(vec![
            "Dividend declarations are reviewed quarterly against realized portfolio cash flow, and payout schedules are adjusted before capital is impaired.".into(),
            "Counterparty exposure is capped at ten percent of portfolio value for any single position.".into(),
            "An independent administrator reconciles the share register and dividend entitlements every quarter.".into(),
            "Liquidity reserves are maintained so that end-of-horizon redemptions never force asset sales at depressed prices.".into(),
        ]),
        Block::Heading("7. Why Invest With Us".into()),
        Block::Bullets(vec![
            "A senior team with more than two decades of combined experience in income-focused portfolio management.".into(),
            "A track record of meeting or exceeding declared dividend schedules across prior programs.".into(),
            "Alignment of interest: the principals invest their own capital alongside clients in every program.".into(),
            "Clear, plain-language reporting with no hidden fees or performance claw-backs.".into(),
        ]),
        Block::Heading("8. Next Steps".into()),
        Block::Numbered(vec![
            "Review this proposal and the accompanying terms at your convenience.".into(),
            "Schedule a call with your adviser to resolve any outstanding questions.".into(),
            "Execute the subscription agreement and remit the committed capital.".into(),
            "Receive your share allocation confirmation and first quarterly statement.".into(),
        ]),
        Block::Heading("9. Conclusion".into()),
        Block::Paragraph(format!(
            "We believe this proposal offers a compelling balance of projected income and \
             disciplined risk management. A commitment of {amount} today is projected to \
             grow to {target_value} over {horizon} years, and the dividend schedule set out \
             above provides a transparent path to that outcome. We would welcome the \
             opportunity to discuss any aspect of this document with you."
        )),
        Block::Spacer(10.0),
        Block::Lines(vec!["Sincerely,".into()]),
        Block::Signature(vec![
            SIGNER_NAME.into(),
            format!("{SIGNER_TITLE}, {COMPANY_NAME}"),
            COMPANY_EMAIL.into(),
            COMPANY_PHONE.into(),
        ]),
        Block::Spacer(12.0),
        Block::Disclaimer(
            "This document is provided for discussion purposes only and does not constitute \
             an offer to sell or a solicitation of an offer to buy any security. Projected \
             returns, including dividend rates and portfolio values, are illustrative \
             targets rather than guarantees, and actual results may differ materially. Past \
             performance is not indicative of future results. Prospective investors should \
             rely solely on the definitive subscription documents and consult their own \
             legal, tax, and financial advisers before committing capital. Capital is at \
             risk, and investors may receive back less than the amount invested."
                .into(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ProposalRecord, ProjectionFigures) {
        let record = ProposalRecord {
            client_name: "Jordan Meyer".into(),
            client_address: "14 Quay Street\nHarbourside\nBristol BS1 4DB".into(),
            proposal_date: "12 March 2026".into(),
            investment_amount: 150_000.0,
            target_return: 72.0,
            time_horizon: 3,
            year1_dividend: 1.440,
            year2_dividend: 1.888,
            year3_dividend: 2.378,
        };
        let figures = ProjectionFigures::compute(&record);
        (record, figures)
    }

    #[test]
    fn currency_grouping_and_decimals() {
        assert_eq!(format_currency(150_000.0), "$150,000.00");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(8.0), "$8.00");
        assert_eq!(format_currency(44_587.5), "$44,587.50");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }

    #[test]
    fn rate_and_percent_precision() {
        assert_eq!(format_rate(1.44), "$1.440");
        assert_eq!(format_rate(2.378), "$2.378");
        assert_eq!(format_percent(18.0), "18.00%");
        assert_eq!(format_percent(20.992_23), "20.99%");
        assert_eq!(format_count(18_750.0), "18,750");
    }

    #[test]
    fn cash_flow_table_has_six_columns_and_a_year_zero_row() {
        let (record, figures) = sample();
        let blocks = build_blocks(&record, &figures);
        let tables: Vec<&TableSpec> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].col_widths.len(), 2);
        assert_eq!(tables[1].col_widths.len(), 6);
        // Header plus years 0..=3.
        assert_eq!(tables[1].rows.len(), 5);
        assert_eq!(tables[1].rows[1][5], "$150,000.00");
        assert_eq!(tables[1].rows[2][3], "$27,000.00");
        assert_eq!(tables[1].rows[4][4], "20.99%");
        assert_eq!(tables[1].rows[4][5], "$256,987.50");
        for row in &tables[1].rows {
            assert_eq!(row.len(), 6);
        }
    }

    #[test]
    fn address_newlines_become_separate_lines() {
        let (record, figures) = sample();
        let blocks = build_blocks(&record, &figures);
        let client_block = match &blocks[2] {
            Block::Lines(lines) => lines,
            _ => panic!("client block expected"),
        };
        assert_eq!(
            client_block,
            &vec![
                "Jordan Meyer".to_string(),
                "14 Quay Street".to_string(),
                "Harbourside".to_string(),
                "Bristol BS1 4DB".to_string(),
            ]
        );
    }

    #[test]
    fn executive_summary_interpolates_the_figures() {
        let (record, figures) = sample();
        let blocks = build_blocks(&record, &figures);
        let summary = blocks
            .iter()
            .find_map(|b| match b {
                Block::Paragraph(p) if p.contains("capital commitment") => Some(p),
                _ => None,
            })
            .expect("executive summary paragraph");
        assert!(summary.contains("$150,000.00"));
        assert!(summary.contains("72.00%"));
        assert!(summary.contains("$258,000.00"));
        assert!(summary.contains("18,750"));
        assert!(summary.contains("19.81%"));
    }
}
