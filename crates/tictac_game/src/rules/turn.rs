//! Turn order.

use crate::{FIRST_MARK, Mark, Move};
use tracing::instrument;

/// Returns the mark that moves next at `cursor`.
///
/// Circle opens; afterwards the turn alternates from whoever made the move
/// just before the cursor. Loaded logs are trusted here, so the answer
/// follows the stored mark rather than the cursor's parity.
#[instrument(skip(turns), fields(len = turns.len()))]
pub fn current_player(turns: &[Move], cursor: usize) -> Mark {
    let played = &turns[..cursor.min(turns.len())];
    match played.last() {
        Some(previous) => previous.mark().opponent(),
        None => FIRST_MARK,
    }
}
