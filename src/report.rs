//! Plain-text analysis report

use chrono::{DateTime, TimeZone};
use std::fmt::{self, Display};

use crate::models::{AnalysisReport, Outcome};

/// Render a report as plain text for export
///
/// The home-win recommendation is the headline bet, matching how the
/// checklist is phrased (each answer moves the home side's chances).
pub fn render_text<Tz>(report: &AnalysisReport, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    TextReport { report, generated_at }.to_string()
}

struct TextReport<'a, Tz: TimeZone> {
    report: &'a AnalysisReport,
    generated_at: &'a DateTime<Tz>,
}

impl<Tz> Display for TextReport<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let p = &report.probabilities;

        writeln!(f, "Match Analysis Report - {}", self.generated_at.format("%d/%m/%Y %H:%M"))?;
        writeln!(f, "===============================")?;
        writeln!(f, "Match: {} x {} ({})", report.home_team, report.away_team, report.match_id)?;
        writeln!(f, "Policy: {}", report.policy.name())?;
        writeln!(f)?;

        writeln!(f, "Estimated probabilities:")?;
        writeln!(f, "- {} win: {:.1}%", report.home_team, p.home)?;
        writeln!(f, "- Draw: {:.1}%", p.draw)?;
        writeln!(f, "- {} win: {:.1}%", report.away_team, p.away)?;
        writeln!(
            f,
            "Advantage balance: {} {:.1} | {} {:.1}",
            report.home_team, report.home_balance, report.away_team, report.away_balance
        )?;
        writeln!(f)?;

        writeln!(f, "Odds (fair / market / de-margined market %):")?;
        for comparison in &report.market.outcomes {
            writeln!(
                f,
                "- {}: {} / {:.2} / {:.2}%",
                comparison.outcome.label(),
                format_odds(comparison.fair_odds),
                comparison.market_odds,
                comparison.normalized
            )?;
        }
        writeln!(f, "Market overround: {:.2}%", report.market.overround)?;
        writeln!(f)?;

        if let Some(home) = report.stake(Outcome::Home) {
            writeln!(f, "Suggested Kelly stake: {:.2}", home.stake)?;
            writeln!(f, "Kelly fraction: {:.1}%", home.recommended_fraction * 100.0)?;
            writeln!(f, "Expected value (EV): {:.2}", home.expected_value)?;
        }

        writeln!(f, "Estimated risk by market:")?;
        for (name, risk) in [
            ("Draw No Bet", report.alternatives.draw_no_bet),
            ("Double Chance", report.alternatives.double_chance),
            ("Handicap", report.alternatives.handicap),
        ] {
            writeln!(f, "- {}: {}", name, format_risk(risk))?;
        }
        writeln!(f)?;
        writeln!(f, "Notes:")?;
        writeln!(f, "- Based on {} checklist criteria.", report.criteria)
    }
}

/// Decimal odds with two places, or "-" when there is no finite price
pub fn format_odds(odds: f64) -> String {
    if odds.is_finite() {
        format!("{:.2}", odds)
    } else {
        "-".to_string()
    }
}

/// Signed percentage with a value/risk label
pub fn format_risk(risk: Option<f64>) -> String {
    match risk {
        Some(r) if r > 0.0 => format!("{:.1}% value", r * 100.0),
        Some(r) => format!("{:.1}% risk", r * 100.0),
        None => "n/a".to_string(),
    }
}
