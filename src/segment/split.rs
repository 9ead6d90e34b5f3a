use crate::models::{Token, Turn};

use super::pauses::{Pause, PauseKind};

/// Re-partition each turn at the hard pauses that fall inside it
///
/// Only `sentence_end` and `time_gap` pauses split; `natural_break` is
/// detected upstream but deliberately never used as a split trigger. A turn
/// containing no qualifying pause passes through unchanged.
pub fn split_turns_at_pauses(tokens: &[Token], turns: Vec<Turn>, pauses: &[Pause]) -> Vec<Turn> {
    let mut result = Vec::with_capacity(turns.len());

    for turn in turns {
        let (Some(&first), Some(&last)) = (turn.token_indices.first(), turn.token_indices.last())
        else {
            continue;
        };

        let qualifying: Vec<usize> = pauses
            .iter()
            .filter(|pause| {
                pause.token_index >= first
                    && pause.token_index <= last
                    && matches!(pause.kind, PauseKind::SentenceEnd | PauseKind::TimeGap)
            })
            .map(|pause| pause.token_index)
            .collect();

        if qualifying.is_empty() {
            result.push(turn);
            continue;
        }

        let mut sub = Turn::open(turn.speaker_label.clone(), turn.start_time);
        let count = turn.token_indices.len();

        for (position, &token_index) in turn.token_indices.iter().enumerate() {
            let Some(token) = tokens.get(token_index) else {
                continue;
            };
            sub.push_token(token_index, token);

            let pause_here = qualifying.contains(&token_index);
            if pause_here || position == count - 1 {
                // The closing token's end time bounds this sub-turn; fall
                // back to the whole turn's end time when it is unknown.
                let boundary = token.end_time.or(turn.end_time);
                let mut closed =
                    std::mem::replace(&mut sub, Turn::open(turn.speaker_label.clone(), boundary));
                closed.end_time = boundary;
                result.push(closed);
            }
        }
    }

    result
}
