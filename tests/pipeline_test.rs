//! End-to-end pipeline tests: pages → lines → roles → agenda.

use gavel::{
    read_labeled_csv, write_labeled_csv, AgendaPipeline, DocumentRequest, LabeledLine, Line,
    LineClassifier, Role, TrainOptions,
};

mod support {
    use super::*;

    pub fn line(text: &str, font_size: f32, inset: f32, index: u32) -> Line {
        Line {
            agency: "gavilan".to_string(),
            meeting_date: "04-05-2016".to_string(),
            page_index: 0,
            line_index: index,
            text: text.to_string(),
            font_name: "Times".to_string(),
            font_size,
            left_inset: inset,
            is_uppercase: text
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(|c| c.is_uppercase())
                && text.chars().any(|c| c.is_alphabetic()),
            starts_with_number: text.starts_with(char::is_numeric),
            starts_with_subnumber: false,
            starts_with_roman_numeral: false,
            starts_with_enum_letter: false,
            includes_time: false,
            is_bold: false,
            is_italic: false,
        }
    }

    /// Structurally separable corpus: uppercase large headings, numbered
    /// item headings at a middle inset, plain indented body text.
    pub fn corpus() -> Vec<LabeledLine> {
        let mut labeled = Vec::new();
        let mut index = 0;
        for i in 0..12 {
            labeled.push(LabeledLine::new(
                line(&format!("SECTION HEADING {i}"), 16.0, 72.0, index),
                Role::SectionHeading,
            ));
            index += 1;
            labeled.push(LabeledLine::new(
                line(&format!("{i}. Item heading number {i}"), 12.0, 90.0, index),
                Role::ItemHeading,
            ));
            index += 1;
            labeled.push(LabeledLine::new(
                line(&format!("continuation of the item body text {i}"), 12.0, 110.0, index),
                Role::ItemText,
            ));
            index += 1;
        }
        labeled
    }

    pub fn train_options() -> TrainOptions {
        TrainOptions {
            l2_grid: vec![0.1],
            cv_folds: 3,
            max_epochs: 300,
            ..Default::default()
        }
    }

    /// One page of pdfplumber-style character records matching the corpus
    /// shape, as a JSON page dump.
    pub fn page_dump_json() -> String {
        let mut chars = Vec::new();
        let mut push_word = |text: &str, x0: f32, top: f32, size: f32| {
            for (i, c) in text.chars().enumerate() {
                chars.push(format!(
                    r#"{{"text":{:?},"x0":{},"top":{},"size":{},"fontname":"Times"}}"#,
                    c.to_string(),
                    x0 + i as f32 * 6.0,
                    top,
                    size
                ));
            }
        };
        push_word("CONSENT CALENDAR", 72.0, 100.0, 16.0);
        push_word("3. Approval of Minutes", 90.0, 130.0, 12.0);
        push_word("continuation of the minutes text", 110.0, 150.0, 12.0);

        format!(
            r#"[{{"width":612.0,"height":792.0,"chars":[{}],"rules":[]}}]"#,
            chars.join(",")
        )
    }
}

use support::*;

#[test]
fn test_pipeline_end_to_end_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gavilan_04-05-2016.json");
    std::fs::write(&input, page_dump_json()).unwrap();

    let classifier = LineClassifier::train(&corpus(), &train_options()).unwrap();
    let pipeline = AgendaPipeline::new(classifier);
    let output = pipeline
        .run(&gavel::JsonSource::new(&input), "gavilan", "04-05-2016")
        .unwrap();

    assert_eq!(output.labeled.len(), 3);
    assert_eq!(output.agenda.section_count(), 1);
    assert_eq!(output.agenda.item_count(), 1);

    let section = &output.agenda.meeting_parts[0].agenda_sections[0];
    assert_eq!(section.section_name, "CONSENT CALENDAR");
    let item = &section.items[0];
    assert_eq!(item.item_number, "3.");
    assert!(item.item_text.starts_with("Approval of Minutes"));
    assert!(item.item_text.contains("continuation of the minutes text"));
}

#[test]
fn test_pipeline_deterministic_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gavilan_04-05-2016.json");
    std::fs::write(&input, page_dump_json()).unwrap();

    let run = || {
        let classifier = LineClassifier::train(&corpus(), &train_options()).unwrap();
        let pipeline = AgendaPipeline::new(classifier);
        let output = pipeline
            .run(&gavel::JsonSource::new(&input), "gavilan", "04-05-2016")
            .unwrap();
        gavel::render::to_json(&output.agenda, gavel::JsonFormat::Compact).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_model_persistence_preserves_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");

    let classifier = LineClassifier::train(&corpus(), &train_options()).unwrap();
    classifier.save_path(&model_path).unwrap();
    let restored = LineClassifier::load_path(&model_path).unwrap();

    let probe: Vec<Line> = vec![
        line("PUBLIC COMMENT", 16.0, 72.0, 0),
        line("7. Adjournment of the meeting", 12.0, 90.0, 1),
    ];
    assert_eq!(
        classifier.predict_scores(&probe).unwrap(),
        restored.predict_scores(&probe).unwrap()
    );
}

#[test]
fn test_labeled_csv_round_trip_feeds_training() {
    let labeled = corpus();

    let mut buf = Vec::new();
    write_labeled_csv(&labeled, &mut buf).unwrap();
    let restored = read_labeled_csv(buf.as_slice()).unwrap();

    assert_eq!(restored.len(), labeled.len());
    for (a, b) in labeled.iter().zip(&restored) {
        assert_eq!(a.role, b.role);
        assert_eq!(a.line.text, b.line.text);
        assert_eq!(a.line.line_id(), b.line.line_id());
    }

    // The round-tripped table is still a valid training corpus.
    assert!(LineClassifier::train(&restored, &train_options()).is_ok());
}

#[test]
fn test_batch_outputs_align_with_requests() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("gavilan_04-05-2016.json");
    let second = dir.path().join("slvwd_2017-01-05.json");
    std::fs::write(&first, page_dump_json()).unwrap();
    std::fs::write(&second, page_dump_json()).unwrap();

    let classifier = LineClassifier::train(&corpus(), &train_options()).unwrap();
    let pipeline = AgendaPipeline::new(classifier);

    let requests = vec![
        DocumentRequest {
            agency: "gavilan".to_string(),
            meeting_date: "04-05-2016".to_string(),
            path: first,
        },
        DocumentRequest {
            agency: "slvwd".to_string(),
            meeting_date: "2017-01-05".to_string(),
            path: second,
        },
    ];

    let results = pipeline.run_batch(&requests);
    assert_eq!(results.len(), 2);
    let agendas: Vec<_> = results.into_iter().map(|r| r.unwrap().agenda).collect();
    assert_eq!(agendas[0].agency, "gavilan");
    assert_eq!(agendas[1].agency, "slvwd");
    assert_eq!(agendas[0].item_count(), agendas[1].item_count());
}
