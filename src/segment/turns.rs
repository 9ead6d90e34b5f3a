use crate::models::{Token, Turn};

/// Group the raw token sequence into contiguous speaker turns
///
/// A new turn opens on the first retained token, on a speaker change (both
/// labels present), or on a silence gap strictly greater than
/// `silence_threshold`. Punctuation never opens a turn: it joins the current
/// one, and leading punctuation with no open turn is dropped.
pub fn group_into_turns(tokens: &[Token], silence_threshold: f64) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if !token.has_content() {
            continue;
        }

        if token.is_punctuation() {
            if let Some(current) = turns.last_mut() {
                current.push_token(index, token);
            }
            continue;
        }

        let start_new = match turns.last() {
            None => true,
            Some(current) => {
                let speaker_changed = matches!(
                    (&token.speaker_label, &current.speaker_label),
                    (Some(incoming), Some(held)) if incoming != held
                );
                let silence = matches!(
                    (token.start_time, current.end_time),
                    (Some(start), Some(end)) if start - end > silence_threshold
                );
                speaker_changed || silence
            }
        };

        if start_new {
            turns.push(Turn::open(token.speaker_label.clone(), token.start_time));
        }
        if let Some(current) = turns.last_mut() {
            current.push_token(index, token);
        }
    }

    turns
}
