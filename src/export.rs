//! CSV table of the rounds of a session.
//!
//! One row per match under a fixed header. The resting players of a round are listed once, on
//! its first row. A third team member shares the "Player 2" cell with the second, joined by
//! `" & "`, so 3v2 courts keep every name.

use anyhow::{anyhow, Context};
use csv::Writer;

use crate::round::Round;

/// Header row of the export.
pub const HEADER: [&str; 7] = [
    "Round",
    "Court",
    "Team A Player 1",
    "Team A Player 2",
    "Team B Player 1",
    "Team B Player 2",
    "Resting Players",
];

/// Writes `rounds` as CSV text.
///
/// # Errors
/// Returned if the CSV writer fails.
pub fn rounds_to_csv(rounds: &[Round]) -> anyhow::Result<String> {
    let mut writer = Writer::from_writer(vec![]);
    writer.write_record(HEADER)?;

    for round in rounds {
        let number = round.round.to_string();
        for (n, m) in round.matches.iter().enumerate() {
            let resting = if n == 0 {
                round.resting.join("; ")
            } else {
                String::new()
            };
            let (a1, a2) = team_cells(&m.team_a);
            let (b1, b2) = team_cells(&m.team_b);
            let court = m.court.to_string();
            writer.write_record([
                number.as_str(),
                court.as_str(),
                a1,
                a2.as_str(),
                b1,
                b2.as_str(),
                resting.as_str(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("could not flush CSV export: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV export is not valid UTF-8")
}

/// First player, then everyone else in one cell.
fn team_cells(team: &[String]) -> (&str, String) {
    match team.split_first() {
        Some((first, rest)) => (first.as_str(), rest.join(" & ")),
        None => ("", String::new()),
    }
}
