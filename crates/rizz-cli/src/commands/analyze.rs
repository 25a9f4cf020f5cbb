use anyhow::Context;
use rizz_analysis::RunOutcome;
use rizz_app::{AnalysisRun, SendStatus};
use rizz_core::{Contact, Profile, RizzGrade};
use serde::Serialize;

use crate::cli::{AnalyzeArgs, GlobalFlags, NewChatArgs, ResultArgs};
use crate::context::CliContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct AnalyzeResponse {
    contact: Contact,
    degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    rizz_score: u8,
    grade: RizzGrade,
    profile: Profile,
    insights: Vec<String>,
    pickup_line: String,
    pickup_lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send: Option<SendStatus>,
}

/// How a finished run ended, as reported in the output.
#[derive(Debug, PartialEq, Eq)]
struct RunSummary {
    degraded: bool,
    error: Option<String>,
}

impl RunSummary {
    /// `None` for a cancelled run.
    fn of(outcome: &RunOutcome) -> Option<Self> {
        match outcome {
            RunOutcome::Completed(_) => Some(Self {
                degraded: false,
                error: None,
            }),
            RunOutcome::Degraded { error, .. } => Some(Self {
                degraded: true,
                error: Some(error.to_string()),
            }),
            RunOutcome::Cancelled => None,
        }
    }
}

/// Handle `rizz analyze <username>`.
pub async fn handle(args: &AnalyzeArgs, ctx: &CliContext, flags: GlobalFlags) -> anyhow::Result<()> {
    ctx.resume()?;
    let contact = Contact {
        id: args.thread_id.clone().filter(|id| !id.trim().is_empty()),
        ..Contact::named(args.username.as_str())
    };
    let run = ctx.app.select_contact(contact)?;
    finish(run, &args.results, ctx, flags).await
}

/// Handle `rizz new-chat <user_id>...`.
pub async fn handle_new_chat(
    args: &NewChatArgs,
    ctx: &CliContext,
    flags: GlobalFlags,
) -> anyhow::Result<()> {
    ctx.resume()?;
    let run = ctx.app.start_new_chat(&args.user_ids).await?;
    finish(run, &args.results, ctx, flags).await
}

/// Render progress until the run ends, then act on the results screen.
async fn finish(
    run: AnalysisRun,
    results: &ResultArgs,
    ctx: &CliContext,
    flags: GlobalFlags,
) -> anyhow::Result<()> {
    let progress = Progress::bar(flags.progress(), "Analysing");
    let mut updates = ctx.app.subscribe();
    let wait = run.wait();
    tokio::pin!(wait);

    let outcome = loop {
        tokio::select! {
            outcome = &mut wait => break outcome,
            changed = updates.changed() => {
                if changed.is_err() {
                    break (&mut wait).await;
                }
                let board = updates.borrow_and_update().pipeline.clone();
                if let Some(board) = board {
                    progress.show(&board);
                }
            }
        }
    };

    let Some(summary) = RunSummary::of(&outcome) else {
        progress.finish_clear();
        anyhow::bail!("analysis was cancelled");
    };
    if summary.degraded {
        progress.finish_err("Analysis failed");
    } else {
        progress.finish_ok("Analysis complete");
    }

    for _ in 0..results.regenerate {
        ctx.app.regenerate_pickup_line()?;
    }
    if results.send {
        if let Err(error) = ctx.app.send_current_pickup_line().await {
            tracing::warn!(%error, "pickup line not sent");
        }
    }

    let snapshot = ctx.app.snapshot();
    let pickup_line = snapshot
        .current_pickup_line()
        .context("analysis finished without a result")?
        .to_string();
    let contact = snapshot
        .selected
        .context("analysis finished without a selected contact")?;
    let result = snapshot
        .result
        .context("analysis finished without a result")?;

    output(
        &AnalyzeResponse {
            contact,
            degraded: summary.degraded,
            error: summary.error,
            rizz_score: result.rizz_score,
            grade: result.grade(),
            profile: result.profile,
            insights: result.insights,
            pickup_line,
            pickup_lines: result.pickup_lines.into(),
            send: snapshot.send_status,
        },
        flags.format,
    )
}
