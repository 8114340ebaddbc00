use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;

use services::{DrillError, DrillService, SourceConfig, VocabularySource};
use vocab_core::time::{fixed_clock, fixed_now};
use vocab_core::{AnswerOutcome, DrillPhase, SessionError};

#[tokio::test]
async fn drill_runs_over_ingested_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"Finnish;English\ntalo;house\nkoira;dog\nkissa;cat\n")
        .unwrap();

    let config = SourceConfig::new(file.path().to_string_lossy().into_owned());
    let load = VocabularySource::from_config(config).load().await;
    assert!(load.is_available());

    let vocabulary = Arc::new(load.into_vocabulary());
    let service = DrillService::new(Arc::clone(&vocabulary)).with_clock(fixed_clock());
    let id = service.open_session().unwrap();

    let mut snapshot = service.start(id).unwrap();
    let mut seen = BTreeSet::new();
    let mut answered = 0;

    while !snapshot.is_complete {
        let term = snapshot.current_term.clone().unwrap();
        assert_eq!(snapshot.progress.unwrap().position, answered + 1);
        seen.insert(term.clone());

        // blank input is refused and changes nothing
        let err = service.submit_answer(id, "  ").unwrap_err();
        assert!(matches!(err, DrillError::Session(SessionError::EmptyAnswer)));

        // first term gets a typo, the rest are exact
        let expected = vocabulary.translation(&term).unwrap().to_string();
        let answer = if answered == 0 {
            format!("{expected}s")
        } else {
            expected.to_uppercase()
        };
        let graded = service.submit_answer(id, &answer).unwrap();
        assert_eq!(graded.phase, DrillPhase::Feedback);
        let feedback = graded.feedback.unwrap();
        assert_eq!(feedback.expected, expected);
        let wanted = if answered == 0 {
            AnswerOutcome::Close
        } else {
            AnswerOutcome::Correct
        };
        assert_eq!(feedback.outcome, wanted);

        snapshot = service.advance(id).unwrap();
        answered += 1;
    }

    let expected_terms: BTreeSet<String> = vocabulary.terms().map(str::to_string).collect();
    assert_eq!(seen, expected_terms);

    assert_eq!(snapshot.phase, DrillPhase::Complete);
    assert_eq!(snapshot.correct_count, 2);
    assert_eq!(snapshot.total_count, 3);
    let summary = snapshot.summary.unwrap();
    assert_eq!(summary.completed_at, fixed_now());

    service.restart(id).unwrap();
    let fresh = service.start(id).unwrap();
    assert_eq!(fresh.correct_count, 0);
    assert_eq!(fresh.total_count, 0);
    assert_eq!(fresh.progress.unwrap().position, 1);
}
