//! Keyboard-to-note mapping for the harness.
//!
//! The bottom letter row is a piano octave starting at C4, with sharps on
//! the row above - the usual tracker layout. This mapping is a UI concern;
//! the engine only ever sees note numbers.

/// Map a pressed character to a MIDI note number.
pub fn note_for_key(ch: char) -> Option<u8> {
    let note = match ch.to_ascii_lowercase() {
        'z' => 60, // C4
        's' => 61,
        'x' => 62, // D4
        'd' => 63,
        'c' => 64, // E4
        'v' => 65, // F4
        'g' => 66,
        'b' => 67, // G4
        'h' => 68,
        'n' => 69, // A4
        'j' => 70,
        'm' => 71, // B4
        ',' => 72, // C5
        _ => return None,
    };
    Some(note)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_the_home_octave() {
        assert_eq!(note_for_key('z'), Some(60));
        assert_eq!(note_for_key('n'), Some(69));
        assert_eq!(note_for_key(','), Some(72));
        assert_eq!(note_for_key('Z'), Some(60), "case-insensitive");
        assert_eq!(note_for_key('q'), None);
    }
}
