use super::{parse_date_arg, Env};
use chrono::NaiveDate;
use clap::Args;
use lottoforge_core::codec;
use lottoforge_core::game::{DrawTier, GameKind};
use lottoforge_core::history::{DrawRecord, InsertOutcome};
use lottoforge_core::profile::GameProfile;

#[derive(Args, Debug, Clone)]
pub struct SaveDrawArgs {
    #[arg(long)]
    pub game: GameKind,

    /// IL draw tier (JP, M1, M2). Ignored for MM and PB.
    #[arg(long)]
    pub tier: Option<DrawTier>,

    #[arg(long, value_parser = parse_date_arg)]
    pub date: NaiveDate,

    /// Draw as `[[m1, ..., mk], bonus]` (`null` bonus for IL).
    #[arg(long)]
    pub draw: String,

    /// Replace a different draw already stored for the same date.
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

pub fn run(args: &SaveDrawArgs, env: &Env) -> anyhow::Result<()> {
    let profile = GameProfile::for_game(args.game);
    let combination = codec::parse(profile, &args.draw)?;

    let mut store = env.open_store()?;
    let outcome = store.insert(
        DrawRecord {
            game: args.game,
            tier: if args.game.has_draw_tiers() { args.tier } else { None },
            date: args.date,
            draw: combination.to_raw(),
        },
        args.overwrite,
    )?;
    store.save()?;

    let verb = match outcome {
        InsertOutcome::Added => "added",
        InsertOutcome::Updated => "updated",
        InsertOutcome::Unchanged => "unchanged",
        InsertOutcome::KeptExisting => "kept existing (use --overwrite to replace)",
    };
    println!(
        "{} {} {}: {}",
        args.game,
        args.date.format("%m/%d/%Y"),
        combination,
        verb
    );
    Ok(())
}
