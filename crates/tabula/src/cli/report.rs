//! End-of-run summaries.

use std::fmt;
use std::time::Duration;
use tabula_purge::PurgeStats;

const RULE_WIDTH: usize = 70;

fn rule(f: &mut fmt::Formatter<'_>, ch: char) -> fmt::Result {
    writeln!(f, "{}", ch.to_string().repeat(RULE_WIDTH))
}

/// Totals, per-server breakdown and timing of a purge run.
struct PurgeSummary<'a>(&'a PurgeStats);

impl fmt::Display for PurgeSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;

        rule(f, '=')?;
        writeln!(f, "PURGE COMPLETE")?;
        rule(f, '=')?;
        writeln!(f)?;
        writeln!(f, "Total messages deleted:     {}", stats.messages_deleted())?;
        writeln!(f, "Total reactions removed:    {}", stats.reactions_removed())?;
        writeln!(f, "Total DM messages deleted:  {}", stats.dm_messages_deleted())?;
        writeln!(f)?;
        writeln!(f, "Per-server breakdown:")?;
        rule(f, '-')?;

        if stats.guilds().is_empty() {
            writeln!(f, "   No servers processed.")?;
        }
        for guild in stats.guilds() {
            writeln!(f, "   {}", guild.name())?;
            writeln!(f, "      Messages deleted:  {}", guild.messages())?;
            writeln!(f, "      Reactions removed: {}", guild.reactions())?;
            writeln!(f)?;
        }

        rule(f, '-')?;
        writeln!(f, "Time elapsed:               {}", format_elapsed(*stats.elapsed()))?;
        writeln!(f, "Servers processed:          {}", stats.guilds_processed())?;
        writeln!(f, "Conversations processed:    {}", stats.conversations_processed())?;
        rule(f, '=')
    }
}

/// Purge totals plus the cleanup counts.
struct CleanupSummary<'a> {
    stats: &'a PurgeStats,
    friends_removed: u64,
    servers_left: u64,
}

impl fmt::Display for CleanupSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rule(f, '=')?;
        writeln!(f, "CLEANUP COMPLETE")?;
        rule(f, '=')?;
        writeln!(f)?;
        writeln!(f, "   Messages deleted:     {}", self.stats.messages_deleted())?;
        writeln!(f, "   Reactions removed:    {}", self.stats.reactions_removed())?;
        writeln!(f, "   DM messages deleted:  {}", self.stats.dm_messages_deleted())?;
        writeln!(f, "   Friends removed:      {}", self.friends_removed)?;
        writeln!(f, "   Servers left:         {}", self.servers_left)?;
        rule(f, '=')
    }
}

/// Render the end-of-run purge report.
pub fn purge_summary(stats: &PurgeStats) -> String {
    PurgeSummary(stats).to_string()
}

/// Render the report shown after account cleanup.
pub fn cleanup_summary(stats: &PurgeStats, friends_removed: u64, servers_left: u64) -> String {
    CleanupSummary {
        stats,
        friends_removed,
        servers_left,
    }
    .to_string()
}

/// `1h2m3s` style, rounded to whole seconds.
pub fn format_elapsed(elapsed: Duration) -> String {
    let mut secs = elapsed.as_secs();
    if elapsed.subsec_millis() >= 500 {
        secs += 1;
    }
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    match (hours, minutes) {
        (0, 0) => format!("{}s", seconds),
        (0, _) => format!("{}m{}s", minutes, seconds),
        _ => format!("{}h{}m{}s", hours, minutes, seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(400)), "0s");
        assert_eq!(format_elapsed(Duration::from_millis(59_600)), "1m0s");
        assert_eq!(format_elapsed(Duration::from_secs(3_725)), "1h2m5s");
    }

    #[test]
    fn test_empty_run_summary() {
        let summary = purge_summary(&PurgeStats::default());

        assert!(summary.contains("Total messages deleted:     0"));
        assert!(summary.contains("No servers processed."));
        assert!(summary.contains("Conversations processed:    0"));
    }

    #[test]
    fn test_cleanup_summary_counts() {
        let summary = cleanup_summary(&PurgeStats::default(), 3, 7);

        assert!(summary.contains("Friends removed:      3"));
        assert!(summary.contains("Servers left:         7"));
        assert!(summary.ends_with(&format!("{}\n", "=".repeat(RULE_WIDTH))));
    }
}
