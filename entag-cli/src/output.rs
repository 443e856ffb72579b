//! Human-readable summary output.

use colored::*;
use entag::prelude::ExtractionReport;

/// Print a colored per-type summary of one processed document.
pub fn print_summary(report: &ExtractionReport) {
    println!("{}", "Extraction summary".bold());
    println!(
        "  {} raw matches, {} entities after dedup, {} overlaps suppressed, {} ms",
        report.summary.raw_match_count.to_string().cyan(),
        report.summary.entity_count.to_string().cyan(),
        report.summary.suppressed_overlaps.to_string().yellow(),
        report.summary.processing_time_ms
    );

    for (entity_type, count) in &report.summary.entities_by_type {
        let matches = report
            .summary
            .matches_by_type
            .get(entity_type)
            .copied()
            .unwrap_or_default();
        println!(
            "  {:<14} {} {}",
            entity_type.green(),
            count,
            format!("({matches} mentions)").dimmed()
        );
    }

    let flagged = report
        .entities
        .iter()
        .filter(|e| matches!(e.metadata, entag::types::EntityMetadata::Unparsed(_)))
        .count();
    if flagged > 0 {
        println!(
            "  {} {}",
            flagged.to_string().yellow(),
            "entities kept verbatim after parse failures".yellow()
        );
    }
}
