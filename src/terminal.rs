//! Interactive terminal front-end for a single local interview

use crate::interview::Event;
use crate::question::QuestionService;
use crate::runtime::{InterviewRuntime, Outcome, Screen};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Drive one runtime from line-oriented input until the user quits or input ends
pub async fn run<Q, R, W>(
    runtime: &mut InterviewRuntime<Q>,
    input: R,
    mut output: W,
) -> io::Result<()>
where
    Q: QuestionService,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    write(&mut output, "🧠 AI Healthcare Assistant\n\n").await?;

    loop {
        let event = match runtime.screen().clone() {
            Screen::Intake {
                min_questions,
                max_questions,
            } => {
                let prompt = format!(
                    "How many questions would you like to answer? ({min_questions}-{max_questions}): "
                );
                write(&mut output, &prompt).await?;
                let Some(line) = lines.next_line().await? else {
                    return Ok(());
                };
                let Ok(count) = line.trim().parse::<u32>() else {
                    write(&mut output, "Please enter a number.\n").await?;
                    continue;
                };

                write(
                    &mut output,
                    "What symptoms are you experiencing? (Example: headache, dizziness)\n> ",
                )
                .await?;
                let Some(symptoms) = lines.next_line().await? else {
                    return Ok(());
                };
                Event::start(count, symptoms)
            }

            Screen::Question {
                number,
                total,
                text,
            } => {
                write(&mut output, &format!("\nQuestion {number} of {total}:\n{text}\n> ")).await?;
                let Some(answer) = lines.next_line().await? else {
                    return Ok(());
                };
                // Blank answers redraw the question, which asks for it again
                if answer.trim().is_empty() {
                    Event::Render
                } else {
                    Event::answer(answer)
                }
            }

            Screen::Result { outcome } => {
                write(
                    &mut output,
                    "\n✅ The questions are complete. Analyzing your health status now...\n",
                )
                .await?;
                let report = match outcome {
                    Outcome::Prediction {
                        disease, advice, ..
                    } => format!("🔍 Predicted Disease: {disease}\n💡 {advice}\n"),
                    Outcome::Error { message } => format!("❌ {message}\n"),
                };
                write(&mut output, &report).await?;
                write(&mut output, "\nRestart? [y/N] ").await?;
                let Some(line) = lines.next_line().await? else {
                    return Ok(());
                };
                if !line.trim().eq_ignore_ascii_case("y") {
                    return Ok(());
                }
                write(&mut output, "\n").await?;
                Event::Restart
            }
        };

        if let Err(e) = runtime.handle(event).await {
            tracing::warn!(error = %e, "Terminal action rejected");
        }
    }
}

async fn write<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}
