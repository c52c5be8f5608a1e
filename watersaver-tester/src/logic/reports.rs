use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = (passed as f64 / results.len() as f64) * 100.0;
    rate
}

fn outcome_label(result: &ScenarioResult) -> String {
    let record = &result.record;
    let outcome = match record.outcome.reward() {
        Some(reward) if record.outcome.is_success() => {
            format!("won (+{} coins, +{} xp)", reward.coins, reward.xp)
        }
        Some(reward) => format!("lost (+{} coins, +{} xp)", reward.coins, reward.xp),
        None => "unresolved".to_string(),
    };
    let halted = if record.halted { ", halted" } else { "" };
    format!(
        "{outcome} after {} ticks, level {:.1}, phase {}{halted}",
        record.elapsed_ticks, record.final_level, record.final_phase
    )
}

/// Human-readable summary.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Mission Scenario Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total scenarios: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{} {}", status, result.scenario_name.bold())?;
        writeln!(out, "   {}", result.description)?;
        writeln!(out, "   Result: {}", outcome_label(result))?;
        writeln!(
            out,
            "   Expiries: {}/{} still live",
            result.record.expiries_removed, result.record.expiries_fired
        )?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Pretty-printed JSON array of results.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

/// Markdown summary suitable for CI job output.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Water Saver Mission Scenario Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(out, "| | Scenario | Tuning | Result |")?;
    writeln!(out, "|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {status} | `{}` | {:?} | {} |",
            result.scenario_name,
            result.tuning,
            outcome_label(result)
        )?;
    }

    let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();
    if !failed.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failed {
            writeln!(out, "### {}\n", result.scenario_name)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::runner::ScenarioRunner;
    use crate::logic::scenarios::get_scenario;
    use watersaver_game::MissionConfig;

    fn results() -> Vec<ScenarioResult> {
        let runner = ScenarioRunner::new(MissionConfig::default(), 40, false);
        let mut failing = MissionConfig::default();
        failing.initial_level = 100.0;
        let strict = ScenarioRunner::new(failing, 40, false);
        vec![
            runner.run(&get_scenario("practice-run").unwrap()),
            strict.run(&get_scenario("idle").unwrap()),
        ]
    }

    #[test]
    fn json_report_round_trips_results() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &results()).unwrap();
        let parsed: Vec<ScenarioResult> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].passed);
        assert!(!parsed[1].passed);
    }

    #[test]
    fn markdown_report_lists_failures() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &results()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# Water Saver Mission Scenario Results"));
        assert!(text.contains("- **Success rate**: 50.0%"));
        assert!(text.contains("won (+50 coins, +100 xp) after 12 ticks"));
        assert!(text.contains("## Failures"));
        assert!(text.contains("expected 1 ticks, got 3"));
    }

    #[test]
    fn console_report_counts_results() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &results(), Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Total scenarios: 2"));
        assert!(text.contains("✅ PASS practice-run"));
        assert!(text.contains("❌ FAIL idle"));
    }
}
