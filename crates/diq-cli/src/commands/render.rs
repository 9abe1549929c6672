use colored::Colorize;
use diq_core::decision::{DecisionRecord, DecisionSummary};

pub fn records(records: &[DecisionRecord]) {
    if records.is_empty() {
        println!("{}", "No decisions.".dimmed());
        return;
    }
    for record in records {
        self::record(record);
    }
}

pub fn record(record: &DecisionRecord) {
    let date = record
        .date
        .as_deref()
        .and_then(|d| d.get(..10))
        .unwrap_or("----------");
    println!(
        "{} {} {}",
        date.dimmed(),
        record.id.dimmed(),
        record.situation.bold()
    );
    println!("    → {}", record.decision);
    if !record.reasoning.is_empty() {
        println!("    {} {}", "because".dimmed(), record.reasoning);
    }

    match &record.outcome {
        None => println!("    {}", "outcome pending".yellow()),
        Some(outcome) => {
            let verdict = if outcome.success {
                "success".green()
            } else {
                "failure".red()
            };
            println!(
                "    {} (stress {}/10, happiness {}/10)",
                verdict, outcome.stress, outcome.happiness
            );
            if !outcome.notes.is_empty() {
                println!("    {}", outcome.notes.italic());
            }
        }
    }
}

pub fn summary(summary: &DecisionSummary) {
    println!("{:<20} {}", "Decisions", summary.total);
    println!("{:<20} {}", "With outcome", summary.with_outcome);
    println!("{:<20} {}", "Pending", summary.pending);
    println!("{:<20} {:.0}%", "Success rate", summary.success_rate);
    println!("{:<20} {:.1}", "Avg happiness", summary.average_happiness);
    println!("{:<20} {:.1}", "Avg stress", summary.average_stress);
}
