use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lottoforge_core::api::{ConfirmReport, Phase1Report, Phase2Report};
use lottoforge_core::error::LineWarning;
use lottoforge_core::game::GameKind;
use lottoforge_core::history::{DatedDraw, ImportSummary};
use lottoforge_core::persist::RunFile;
use lottoforge_core::scorer::{HitResult, Tier};

const MAX_LISTED_ROWS: usize = 12;

fn new_table(header: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(header);
    table
}

fn align_right(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn tier_cell(tier: Option<Tier>) -> Cell {
    match tier {
        Some(t) if t.bonus || t.mains >= 5 => Cell::new(t).fg(Color::Green),
        Some(t) => Cell::new(t),
        None => Cell::new("-"),
    }
}

fn list_positions<T: ToString>(items: &[T]) -> String {
    let mut out: Vec<String> = items
        .iter()
        .take(MAX_LISTED_ROWS)
        .map(ToString::to_string)
        .collect();
    if items.len() > MAX_LISTED_ROWS {
        out.push(format!("+{} more", items.len() - MAX_LISTED_ROWS));
    }
    out.join(", ")
}

fn hit_table(label: &str, hits: &HitResult) -> Table {
    let mut table = new_table(vec![
        Cell::new(label).add_attribute(Attribute::Bold),
        Cell::new("Count").fg(Color::Cyan),
        Cell::new("Rows"),
    ]);
    align_right(&mut table, 1..=1);

    // Rarest tier first.
    for (tier, rows) in hits.tier_rows.iter().rev() {
        table.add_row(vec![
            tier_cell(Some(*tier)),
            Cell::new(rows.len()),
            Cell::new(list_positions(rows)),
        ]);
    }
    if hits.is_empty() {
        table.add_row(vec![Cell::new("no reportable hits"), Cell::new(0), Cell::new("")]);
    }
    table
}

pub fn phase1(report: &Phase1Report) {
    println!(
        "\n{} Phase 1 | seed {} | {} rows | sum band {}",
        report.game.title(),
        report.seed,
        report.batch.len(),
        report.band
    );
    for r in &report.results {
        println!("\nTarget {} {}", r.label, r.target);
        println!("{}", hit_table(&r.label, &r.hit_result));
    }
}

pub fn phase2(report: &Phase2Report) {
    let agg = &report.aggregate_hit_result;
    println!(
        "\n{} Phase 2 | seed {} | target {} {} | sum band {}",
        report.game.title(),
        report.seed,
        report.target.label,
        report.target.target,
        report.band
    );

    let mut table = new_table(vec![
        Cell::new("Tier").add_attribute(Attribute::Bold),
        Cell::new("Count").fg(Color::Cyan),
        Cell::new("Per run"),
        Cell::new("First rows (run:row)"),
    ]);
    align_right(&mut table, 1..=2);
    for (tier, rows) in agg.tier_rows.iter().rev() {
        let per_run = rows.len() as f64 / agg.runs.max(1) as f64;
        let refs: Vec<String> = rows
            .iter()
            .map(|r| format!("{}:{}", r.run + 1, r.row))
            .collect();
        table.add_row(vec![
            tier_cell(Some(*tier)),
            Cell::new(rows.len()),
            Cell::new(format!("{:.2}", per_run)),
            Cell::new(list_positions(&refs)),
        ]);
    }
    println!("{}", table);

    let s = &report.stats;
    println!(
        "Pool: {} runs, {} rows, {} unique, most common row seen {}x",
        s.runs, s.total_rows, s.unique_rows, s.most_common_frequency
    );

    let mut buy = new_table(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Ticket"),
        Cell::new("Bonus"),
        Cell::new("Sum"),
        Cell::new("Tier"),
        Cell::new("Freq"),
        Cell::new("Score"),
    ]);
    align_right(&mut buy, 3..=3);
    align_right(&mut buy, 5..=6);
    for (i, e) in report.buy_list.iter().enumerate() {
        buy.add_row(vec![
            Cell::new(i + 1),
            Cell::new(e.combination.dashed()).add_attribute(Attribute::Bold),
            Cell::new(
                e.combination
                    .bonus()
                    .map(|b| format!("{:02}", b))
                    .unwrap_or_default(),
            ),
            Cell::new(e.combination.main_sum()),
            tier_cell(e.tier),
            Cell::new(e.frequency),
            Cell::new(format!("{:.3}", e.score)),
        ]);
    }
    println!("\nBuy list\n{}", buy);
}

pub fn confirm(report: &ConfirmReport) {
    println!(
        "\n{} confirmation | {} tickets",
        report.game.title(),
        report.buy_list.len()
    );
    for r in &report.results {
        println!("\nTarget {} {}", r.label, r.target);
        let mut table = new_table(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Ticket"),
            Cell::new("Mains"),
            Cell::new("Bonus"),
            Cell::new("Tier"),
        ]);
        align_right(&mut table, 2..=2);
        for t in &r.tickets {
            table.add_row(vec![
                Cell::new(t.position),
                Cell::new(t.combination.dashed()),
                Cell::new(t.matched_mains),
                Cell::new(if t.bonus_hit { "yes" } else { "" }),
                tier_cell(t.tier),
            ]);
        }
        println!("{}", table);
        println!("{}", hit_table(&r.label, &r.hit_result));
    }
}

pub fn history(game: GameKind, draws: &[DatedDraw]) {
    let mut table = new_table(vec![
        Cell::new("Date").add_attribute(Attribute::Bold),
        Cell::new(game.title()),
        Cell::new("Bonus"),
        Cell::new("Sum"),
    ]);
    align_right(&mut table, 3..=3);
    for d in draws {
        table.add_row(vec![
            Cell::new(d.date.format("%m/%d/%Y")),
            Cell::new(d.combination.dashed()),
            Cell::new(
                d.combination
                    .bonus()
                    .map(|b| format!("{:02}", b))
                    .unwrap_or_default(),
            ),
            Cell::new(d.combination.main_sum()),
        ]);
    }
    println!("{}", table);
}

pub fn import_summary(summary: &ImportSummary) {
    let mut table = new_table(vec![
        Cell::new("Added").fg(Color::Green),
        Cell::new("Updated"),
        Cell::new("Unchanged"),
        Cell::new("Skipped").fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new(summary.added),
        Cell::new(summary.updated),
        Cell::new(summary.unchanged),
        Cell::new(summary.skipped),
    ]);
    println!("{}", table);
    warnings("CSV", &summary.warnings);
}

pub fn warnings(source: &str, warnings: &[LineWarning]) {
    if warnings.is_empty() {
        return;
    }
    let mut table = new_table(vec![
        Cell::new(format!("{} line", source)).add_attribute(Attribute::Bold),
        Cell::new("Text"),
        Cell::new("Reason").fg(Color::Red),
    ]);
    for w in warnings {
        table.add_row(vec![
            Cell::new(w.line),
            Cell::new(&w.text),
            Cell::new(&w.reason),
        ]);
    }
    println!("{}", table);
}

pub fn recent(files: &[RunFile]) {
    if files.is_empty() {
        println!("No saved runs.");
        return;
    }
    let mut table = new_table(vec![
        Cell::new("Stamp").add_attribute(Attribute::Bold),
        Cell::new("Phase"),
        Cell::new("Game"),
        Cell::new("Path"),
    ]);
    for f in files {
        table.add_row(vec![
            Cell::new(&f.stamp),
            Cell::new(f.phase),
            Cell::new(f.game),
            Cell::new(f.path.display()),
        ]);
    }
    println!("{}", table);
}
