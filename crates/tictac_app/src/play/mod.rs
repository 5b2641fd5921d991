//! Line-oriented terminal front end.

mod command;
mod render;

pub use command::{Keyword, ParseError, PlayCommand, help_text};
pub use render::{render_board, render_games, render_history, render_state, render_status};

use std::io::Write;
use tictac_session::{Completion, GameGateway, GameService};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument};

/// What the loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Print the optional notice, then the screen.
    Redraw(Option<String>),
    /// Print the text only.
    Print(String),
    /// Leave the loop.
    Quit,
}

fn completion_notice(completion: Completion, done: impl Into<String>) -> Option<String> {
    match completion {
        Completion::Applied => Some(done.into()),
        Completion::Failed(message) => Some(format!("! {}", message)),
        Completion::Stale => Some("(superseded by a newer request)".to_string()),
    }
}

#[instrument(skip(service))]
async fn execute<G: GameGateway>(service: &GameService<G>, command: PlayCommand) -> Step {
    let result = match command {
        PlayCommand::Claim { row, col } => service
            .claim_cell(row, col)
            .await
            .map(|mv| Some(format!("{} claimed ({}, {})", mv.mark(), mv.row(), mv.col()))),
        PlayCommand::Rewind(turn) => service.rewind_to(turn).await.map(|()| None),
        PlayCommand::Reset => service.reset().await.map(|()| None),
        PlayCommand::New => {
            service.new_game().await;
            Ok(None)
        }
        PlayCommand::Save(title) => service
            .save_current(&title)
            .await
            .map(|c| completion_notice(c, format!("Saved \"{}\"", title))),
        PlayCommand::Load(id) => service
            .load_game(id)
            .await
            .map(|c| completion_notice(c, format!("Loaded game #{}", id))),
        PlayCommand::List => Ok(completion_notice(
            service.refresh_games().await,
            "Games list refreshed",
        )),
        PlayCommand::Delete(id) => Ok(completion_notice(
            service.delete_game(id).await,
            format!("Deleted game #{}", id),
        )),
        PlayCommand::Show => Ok(None),
        PlayCommand::Help => return Step::Print(help_text()),
        PlayCommand::Quit => return Step::Quit,
    };

    match result {
        Ok(notice) => Step::Redraw(notice),
        Err(e) => Step::Redraw(Some(format!("! {}", e))),
    }
}

/// Reads commands from `input` until `quit` or end of input, printing the
/// screen to `output` after each one.
///
/// # Errors
///
/// Returns I/O errors from reading `input` or writing `output`. Game and
/// network failures are printed, not returned.
#[instrument(skip_all)]
pub async fn run<G, R, W>(service: &GameService<G>, input: R, mut output: W) -> std::io::Result<()>
where
    G: GameGateway,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!("Front end started");
    service.refresh_games().await;
    writeln!(output, "{}", render_state(&service.snapshot().await))?;
    writeln!(output, "Type 'help' for commands.")?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("End of input");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<PlayCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "! {}", e)?;
                continue;
            }
        };

        match execute(service, command).await {
            Step::Quit => break,
            Step::Print(text) => writeln!(output, "{}", text)?,
            Step::Redraw(notice) => {
                if let Some(notice) = notice {
                    writeln!(output, "{}", notice)?;
                }
                writeln!(output, "{}", render_state(&service.snapshot().await))?;
            }
        }
    }

    info!("Front end stopped");
    Ok(())
}
