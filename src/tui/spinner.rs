const BRAILLE_FRAMES: &[char] = &[
    '⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏',
];
const BAR_SEGMENT: usize = 6;

pub fn frame(idx: usize) -> char {
    BRAILLE_FRAMES[idx % BRAILLE_FRAMES.len()]
}

/// Indeterminate progress bar: a short block sweeping across `width` cells.
pub fn progress_bar(idx: usize, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let segment = BAR_SEGMENT.min(width);
    let travel = width - segment + 1;
    let start = idx % travel;
    (0..width)
        .map(|i| if (start..start + segment).contains(&i) { '█' } else { '░' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braille_char_range() {
        for &ch in BRAILLE_FRAMES {
            assert!(('\u{2800}'..='\u{28FF}').contains(&ch), "char {ch:?} not in Braille range");
        }
    }

    #[test]
    fn frames_wrap_around() {
        assert_eq!(frame(0), frame(BRAILLE_FRAMES.len()));
        let _ = frame(usize::MAX);
    }

    #[test]
    fn bar_has_requested_width() {
        for idx in 0..30 {
            assert_eq!(progress_bar(idx, 20).chars().count(), 20);
        }
    }

    #[test]
    fn bar_segment_moves() {
        assert!(progress_bar(0, 10).starts_with("██████"));
        assert!(progress_bar(4, 10).ends_with("██████"));
        assert_ne!(progress_bar(0, 10), progress_bar(1, 10));
    }

    #[test]
    fn bar_narrower_than_segment() {
        assert_eq!(progress_bar(3, 3), "███");
        assert_eq!(progress_bar(3, 0), "");
    }
}
