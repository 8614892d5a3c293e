use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use stamina_core::{FreshReason, LoadOutcome, OverflowStatus, Projection, StaminaState};

/// Everything a report renders for one evaluation of the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub date_key: String,
    pub outcome: LoadOutcome,
    pub state: StaminaState,
    pub projection: Projection,
}

fn describe_outcome(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Resumed { recovered } => {
            format!("resumed today's record (+{recovered} recovered while away)")
        }
        LoadOutcome::Fresh(FreshReason::Missing) => "new record for today".to_string(),
        LoadOutcome::Fresh(FreshReason::Unreadable) => {
            "stored record unreadable, started fresh".to_string()
        }
        LoadOutcome::Fresh(FreshReason::Malformed) => {
            "stored record malformed, started fresh".to_string()
        }
        LoadOutcome::Fresh(FreshReason::Stale { stored_date_key }) => {
            format!("new game day (previous record from {stored_date_key})")
        }
        LoadOutcome::Fresh(FreshReason::Rollover { previous_date_key }) => {
            format!("reset to defaults (was tracking {previous_date_key})")
        }
    }
}

fn signed(value: i64) -> String {
    if value < 0 {
        value.to_string()
    } else {
        format!("+{value}")
    }
}

fn bonus_lines(projection: &Projection) -> [(&'static str, i64); 6] {
    let bonuses = &projection.bonuses;
    [
        ("Activity reward", bonuses.activity),
        ("Mini-program sign-in", bonuses.mini_program),
        ("Friend gifts", bonuses.friend_gift),
        ("Purchases (+100 each)", bonuses.buy_100),
        ("Purchases (+50 each)", bonuses.buy_50),
        ("Other", bonuses.other),
    ]
}

pub fn write_console_report(out: &mut dyn Write, report: &StatusReport) -> Result<()> {
    let p = &report.projection;
    writeln!(
        out,
        "{}",
        format!(
            "⚡ Stamina Planner · {} {}",
            report.date_key, report.state.current_time
        )
        .bright_cyan()
        .bold()
    )?;
    writeln!(out, "{}", "=================================".cyan())?;
    writeln!(out, "Session: {}", describe_outcome(&report.outcome))?;
    writeln!(out)?;
    writeln!(out, "Until reset:       {}h {}m", p.hours_left, p.minutes_left)?;
    writeln!(out, "Current / max:     {} / {}", p.current, p.max)?;
    writeln!(
        out,
        "Natural recovery:  {} (usable {}, daily cap {})",
        p.natural_recovery, p.remaining_recovery, p.daily_recovery_max
    )?;
    writeln!(out, "Expected at reset: {}", p.expected_at_midnight)?;
    let overflow = if p.overflow > 0 {
        p.overflow.to_string().red()
    } else {
        p.overflow.to_string().green()
    };
    writeln!(out, "Overflow:          {overflow}")?;
    writeln!(out, "Full at:           {}", p.full_time)?;
    writeln!(out)?;
    writeln!(out, "{}", "Daily sources".bright_yellow().bold())?;
    for (label, amount) in bonus_lines(p) {
        writeln!(out, "  {label:24} {}", signed(amount))?;
    }
    writeln!(out, "Daily total:       {}", p.daily_total.to_string().bold())?;
    writeln!(out)?;
    let summary = match p.status {
        OverflowStatus::Alert { .. } => format!("🔴 {}", p.summary()).red(),
        OverflowStatus::Projected { .. } => format!("🟡 {}", p.summary()).yellow(),
        OverflowStatus::Clear => format!("🟢 {}", p.summary()).green(),
    };
    writeln!(out, "{summary}")?;
    Ok(())
}

pub fn write_json_report(out: &mut dyn Write, report: &StatusReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn write_markdown_report(out: &mut dyn Write, report: &StatusReport) -> Result<()> {
    let p = &report.projection;
    writeln!(
        out,
        "# Stamina Planner: {} {}\n",
        report.date_key, report.state.current_time
    )?;
    writeln!(out, "_{}_\n", describe_outcome(&report.outcome))?;

    writeln!(out, "## Natural recovery\n")?;
    writeln!(
        out,
        "- **Until reset**: {}h {}m",
        p.hours_left, p.minutes_left
    )?;
    writeln!(out, "- **Current / max**: {} / {}", p.current, p.max)?;
    writeln!(
        out,
        "- **Natural recovery**: {} (usable {}, daily cap {})",
        p.natural_recovery, p.remaining_recovery, p.daily_recovery_max
    )?;
    writeln!(out, "- **Expected at reset**: {}", p.expected_at_midnight)?;
    writeln!(out, "- **Overflow**: {}", p.overflow)?;
    writeln!(out, "- **Full at**: {}\n", p.full_time)?;

    writeln!(out, "## Daily sources\n")?;
    writeln!(out, "| Source | Stamina |")?;
    writeln!(out, "| --- | ---: |")?;
    for (label, amount) in bonus_lines(p) {
        writeln!(out, "| {label} | {} |", signed(amount))?;
    }
    writeln!(out, "| **Daily total** | **{}** |\n", p.daily_total)?;

    let marker = if p.is_alert() { "⚠️" } else { "ℹ️" };
    writeln!(out, "> {marker} {}", p.summary())?;
    Ok(())
}
