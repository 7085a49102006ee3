use iep_qa_core::{AnalyzerKind, GeneratedContent, QuantifiedData, SourceDocuments};
use iep_qa_quality::similarity::{jaccard, ngram_jaccard, sequence_ratio};
use iep_qa_quality::{QualityAssuranceEngine, SimilarityScorer};
use proptest::prelude::*;

fn prose() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z]{1,10}",
            "[0-9]{1,3}%?",
            "\\PC{1,8}",
            Just("\u{212A}.".to_string()),
            Just("standard score".to_string()),
            Just("reading".to_string()),
            Just("will".to_string()),
            Just("within 12 weeks".to_string()),
            Just(".".to_string()),
        ],
        0..60,
    )
    .prop_map(|words| words.join(" "))
}

fn sections() -> impl Strategy<Value = GeneratedContent> {
    prop::collection::btree_map("(goals|present_levels|summary|objective_[0-9])", prose(), 0..4)
        .prop_map(|map| map.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn report_is_deterministic(generated in sections(), source in prose()) {
        let engine = QualityAssuranceEngine::default();
        let sources: SourceDocuments = [source].into_iter().collect();
        let quantified = QuantifiedData::default();
        let a = engine.validate_generated_content(&generated, &sources, &quantified);
        let b = engine.validate_generated_content(&generated, &sources, &quantified);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn scores_stay_in_bounds(generated in sections(), source in prose()) {
        let engine = QualityAssuranceEngine::default();
        let sources: SourceDocuments = [source].into_iter().collect();
        let report = engine.validate_generated_content(&generated, &sources, &QuantifiedData::default());

        prop_assert!((0.0..=1.0).contains(&report.overall_quality_score));
        for kind in AnalyzerKind::ALL {
            let score = report.detailed_results.score(kind);
            prop_assert!((0.0..=1.0).contains(&score), "{} score {}", kind, score);
        }
        let d = &report.detailed_results;
        prop_assert!((0.0..=100.0).contains(&d.regurgitation.similarity_percentage));
        prop_assert!((0.0..=100.0).contains(&d.smart_criteria.compliance_percentage));
        prop_assert!((0.0..=1.0).contains(&d.specificity.overall_specificity));
        prop_assert_eq!(report.passes_quality_gates, report.quality_gates.iter().all(|g| g.passed));
    }

    #[test]
    fn no_sources_always_pass_regurgitation(generated in sections()) {
        let engine = QualityAssuranceEngine::default();
        let report = engine.validate_generated_content(
            &generated,
            &SourceDocuments::new(),
            &QuantifiedData::default(),
        );
        prop_assert_eq!(report.detailed_results.regurgitation.score, 1.0);
        prop_assert!(report.detailed_results.regurgitation.passes_threshold);
    }

    #[test]
    fn similarity_signals_bounded_and_symmetric(a in prose(), b in prose()) {
        let ta: Vec<String> = a.split_whitespace().map(str::to_string).collect();
        let tb: Vec<String> = b.split_whitespace().map(str::to_string).collect();

        let j = jaccard(&ta, &tb);
        prop_assert!((0.0..=1.0).contains(&j));
        prop_assert_eq!(j, jaccard(&tb, &ta));

        let n = ngram_jaccard(&ta, &tb, 3);
        prop_assert!((0.0..=1.0).contains(&n));

        let s = sequence_ratio(&ta, &tb);
        prop_assert!((0.0..=1.0).contains(&s));

        let blended = SimilarityScorer::new().text_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&blended));
    }

    #[test]
    fn window_falls_back_to_direct_similarity_for_short_sources(a in prose(), b in prose()) {
        let scorer = SimilarityScorer::new();
        let ta = iep_qa_quality::text::tokenize(&a);
        let tb = iep_qa_quality::text::tokenize(&b);
        prop_assume!(tb.len() <= ta.len());
        prop_assert_eq!(scorer.best_window_similarity(&ta, &tb, 0.75), scorer.similarity(&ta, &tb));
    }
}
