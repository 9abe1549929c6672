use anyhow::{Result, anyhow};
use clap::Args;
use diq_core::decision::{DecisionDraft, Outcome};

use super::render;
use crate::app::App;

#[derive(Args)]
pub struct LogArgs {
    /// What was going on
    #[arg(short, long, default_value = "")]
    situation: String,
    /// What you wanted to achieve
    #[arg(short, long, default_value = "")]
    intent: String,
    #[arg(short, long, default_value = "")]
    constraints: String,
    /// Options you considered
    #[arg(short, long, default_value = "")]
    alternatives: String,
    /// What you chose
    #[arg(short, long, default_value = "")]
    decision: String,
    #[arg(short, long, default_value = "")]
    reasoning: String,
}

#[derive(Args)]
pub struct OutcomeArgs {
    id: String,
    /// Record the decision as a failure
    #[arg(long)]
    failure: bool,
    /// 1 (calm) to 10
    #[arg(long, default_value_t = 5)]
    stress: u8,
    /// 1 to 10 (delighted)
    #[arg(long, default_value_t = 5)]
    happiness: u8,
    #[arg(long, default_value = "")]
    notes: String,
}

pub async fn list(app: &App) -> Result<()> {
    app.signed_in().await?;
    render::records(&app.coordinator.gateway().records().await);
    Ok(())
}

pub async fn search(app: &App, query: &str) -> Result<()> {
    app.signed_in().await?;
    render::records(&app.coordinator.gateway().search(query).await);
    Ok(())
}

pub async fn pending(app: &App) -> Result<()> {
    app.signed_in().await?;
    render::records(&app.coordinator.gateway().pending_outcomes().await);
    Ok(())
}

pub async fn stats(app: &App) -> Result<()> {
    app.signed_in().await?;
    render::summary(&app.coordinator.gateway().summary().await);
    Ok(())
}

pub async fn log(app: &App, args: LogArgs) -> Result<()> {
    let credential = app.signed_in().await?;
    let mut draft = DecisionDraft {
        situation: args.situation,
        intent: args.intent,
        constraints: args.constraints,
        alternatives: args.alternatives,
        decision: args.decision,
        reasoning: args.reasoning,
    };

    let created = app
        .coordinator
        .gateway()
        .create_decision(&credential, &mut draft)
        .await?;
    render::record(&created);
    Ok(())
}

pub async fn outcome(app: &App, args: OutcomeArgs) -> Result<()> {
    let credential = app.signed_in().await?;
    let gateway = app.coordinator.gateway();

    gateway
        .begin_outcome_edit(&args.id)
        .await
        .map_err(|_| anyhow!("No decision with id {}", args.id))?;

    let outcome = Outcome {
        success: !args.failure,
        stress: args.stress,
        happiness: args.happiness,
        notes: args.notes,
    };
    let updated = gateway.patch_outcome(&credential, &args.id, outcome).await?;
    render::record(&updated);
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    let credential = app.signed_in().await?;
    app.coordinator
        .gateway()
        .delete_decision(&credential, id)
        .await?;
    Ok(())
}
