use std::env;

use anyhow::{bail, Context};
use court_rotation::logger::init_logger;
use court_rotation::prelude::*;

/// Simulates a session: `simulate <rounds> <player>...`
///
/// Rackets, courts and search settings come from the `ROTATION_*` environment variables, and
/// `ROTATION_SEED` makes the run reproducible.
fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let rounds: usize = args
        .next()
        .context("usage: simulate <rounds> <player>...")?
        .parse()
        .context("number of rounds must be a positive integer")?;

    let config = Configuration::from_env();
    config.validate()?;
    if config.log() {
        init_logger(true)?;
    }

    let mut session = Session::new(&config);
    for name in args {
        if !session.add_player(&name) {
            bail!("invalid or duplicate player name '{name}'");
        }
    }

    match env::var("ROTATION_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => run(&mut session, &config, rounds, &mut SeededRandom::from_seed(seed)),
        None => run(&mut session, &config, rounds, &mut ThreadRandom),
    }
}

fn run<R: RandomSource>(
    session: &mut Session,
    config: &Configuration,
    rounds: usize,
    rng: &mut R,
) -> anyhow::Result<()> {
    for _ in 0..rounds {
        let round = session.generate_next_round_with(config, rng)?;
        println!("Round {}", round.round);
        for m in &round.matches {
            println!(
                "  court {}: {} vs {}",
                m.court,
                m.team_a.join(" & "),
                m.team_b.join(" & ")
            );
        }
        if !round.resting.is_empty() {
            println!("  resting: {}", round.resting.join(", "));
        }
    }

    println!("Games played:");
    for player in session.players() {
        println!("{}: {}", player.name, player.games_played);
    }
    Ok(())
}
