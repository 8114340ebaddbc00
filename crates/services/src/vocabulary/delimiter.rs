/// Delimiters the sniffer considers, in order of preference.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Default number of leading bytes inspected when sniffing.
pub const SNIFF_SAMPLE_BYTES: usize = 4096;

/// Share of sample lines that must agree on a delimiter count.
const CONSISTENCY_NUM: usize = 9;
const CONSISTENCY_DEN: usize = 10;

/// Leading slice of `text` no longer than `max_bytes`, cut on a char boundary.
///
/// The flag is true when the text was shortened.
#[must_use]
pub fn sample_of(text: &str, max_bytes: usize) -> (&str, bool) {
    if text.len() <= max_bytes {
        return (text, false);
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], true)
}

/// Guess the delimiter from a sample by looking for a per-line count that holds on
/// nearly every line. Returns `None` when no candidate is consistent.
#[must_use]
pub fn sniff_delimiter(sample: &str, truncated: bool) -> Option<u8> {
    let mut lines: Vec<&str> = sample.lines().filter(|line| !line.trim().is_empty()).collect();
    // the last line of a cut sample is probably partial
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    if lines.is_empty() {
        return None;
    }

    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .find(|&delimiter| is_consistent(&lines, delimiter))
}

/// Sniff the delimiter, falling back to `;` when only semicolons appear and `,` otherwise.
#[must_use]
pub fn detect_delimiter(text: &str, sample_bytes: usize) -> u8 {
    let (sample, truncated) = sample_of(text, sample_bytes);
    sniff_delimiter(sample, truncated).unwrap_or_else(|| fallback_delimiter(sample))
}

fn fallback_delimiter(sample: &str) -> u8 {
    if sample.contains(';') && !sample.contains(',') {
        b';'
    } else {
        b','
    }
}

fn is_consistent(lines: &[&str], delimiter: u8) -> bool {
    let counts: Vec<usize> = lines
        .iter()
        .map(|line| count_unquoted(line, delimiter))
        .collect();

    let Some(mode) = modal_count(&counts) else {
        return false;
    };
    let agreeing = counts.iter().filter(|&&count| count == mode).count();
    agreeing * CONSISTENCY_DEN >= counts.len() * CONSISTENCY_NUM
}

/// Most frequent non-zero count; ties go to the smaller count.
fn modal_count(counts: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for &candidate in counts.iter().filter(|&&count| count > 0) {
        let frequency = counts.iter().filter(|&&count| count == candidate).count();
        let better = match best {
            None => true,
            Some((count, freq)) => frequency > freq || (frequency == freq && candidate < count),
        };
        if better {
            best = Some((candidate, frequency));
        }
    }
    best.map(|(count, _)| count)
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_candidate() {
        assert_eq!(detect_delimiter("fi,en\ntalo,house\n", 4096), b',');
        assert_eq!(detect_delimiter("fi;en\ntalo;house\n", 4096), b';');
        assert_eq!(detect_delimiter("fi|en\ntalo|house\n", 4096), b'|');
        assert_eq!(detect_delimiter("fi\ten\ntalo\thouse\n", 4096), b'\t');
    }

    #[test]
    fn commas_inside_translations_do_not_win() {
        let text = "finnish;english\ntalo;house, home\nkoira;dog\nkuu;moon, month, crescent\n";
        assert_eq!(detect_delimiter(text, 4096), b';');
    }

    #[test]
    fn quoted_delimiters_are_ignored() {
        let text = "finnish,english\n\"talo\",\"house; home\"\nkoira,dog\n";
        assert_eq!(detect_delimiter(text, 4096), b',');
    }

    #[test]
    fn inconsistent_sample_falls_back_to_semicolon_when_no_commas() {
        let text = "finnish;english;notes\ntalo;house\nkoira;dog;animal;pet\n";
        assert_eq!(sniff_delimiter(text, false), None);
        assert_eq!(detect_delimiter(text, 4096), b';');
    }

    #[test]
    fn inconsistent_sample_defaults_to_comma() {
        let text = "single column\nno delimiters here\n";
        assert_eq!(detect_delimiter(text, 4096), b',');
        assert_eq!(detect_delimiter("", 4096), b',');
    }

    #[test]
    fn sample_respects_char_boundaries() {
        let text = "ääää";
        let (sample, truncated) = sample_of(text, 3);
        assert_eq!(sample, "ä");
        assert!(truncated);
        assert_eq!(sample_of(text, 64), (text, false));
    }

    #[test]
    fn only_the_leading_sample_is_inspected() {
        let mut text = String::from("finnish;english\n");
        while text.len() <= SNIFF_SAMPLE_BYTES {
            text.push_str("talo;house\n");
        }
        // comma rows past the sample would dominate a whole-text sniff
        for _ in 0..5000 {
            text.push_str("x,y\n");
        }

        assert_eq!(detect_delimiter(&text, SNIFF_SAMPLE_BYTES), b';');
        assert_eq!(detect_delimiter(&text, text.len()), b',');
    }

    #[test]
    fn partial_last_line_is_ignored_when_truncated() {
        let text = "a;b\nc;d\ne;f;g;h;i";
        assert_eq!(sniff_delimiter(text, false), None);
        assert_eq!(sniff_delimiter(text, true), Some(b';'));
    }
}
