use std::sync::Arc;

use serde_json::json;
use sibyl_core::{Evidence, NextQuestion, NoQuestionReason};
use sibyl_tests::{catalog, engine, flies_scenario, heroes};

fn evidence(value: serde_json::Value) -> Evidence {
    serde_json::from_value(value).expect("failed to build evidence")
}

// ---------------------------------------------------------------------------
// Worked two-entity scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flies_evidence_gives_two_thirds_to_x() {
    let (source, manifests) = flies_scenario();
    let engine = engine(source, manifests);

    let out = engine
        .infer(&evidence(json!({ "flies": 1 })), &[])
        .await
        .expect("inference failed");

    assert_eq!(out.ranked.len(), 2);
    assert_eq!(out.ranked[0].name, "X");
    assert!((out.ranked[0].probability - 2.0 / 3.0).abs() < 1e-3);
    assert!((out.ranked[1].probability - 1.0 / 3.0).abs() < 1e-3);
    assert!(out.threshold_met);
    assert_eq!(out.candidate.as_deref(), Some("X"));
}

#[tokio::test]
async fn flies_posterior_entropy_is_point_918_bits() {
    let (source, manifests) = flies_scenario();
    let engine = engine(source, manifests);

    let model = engine.cache().get().await.expect("training failed");
    let belief = model
        .belief(&evidence(json!({ "flies": 1 })))
        .expect("belief failed");

    assert!((belief.entropy() - 0.918).abs() < 1e-3);
}

#[tokio::test]
async fn flies_is_the_first_question() {
    let (source, manifests) = flies_scenario();
    let engine = engine(source, manifests);

    match engine.next_question(&Evidence::new(), &[]).await.expect("selection failed") {
        NextQuestion::Ask { choice, text } => {
            assert_eq!(choice.attribute, "flies");
            assert!(choice.expected_gain > 0.0);
            assert!(text.is_none());
        }
        other => panic!("expected a question, got {other:?}"),
    }
}

#[tokio::test]
async fn excluding_the_only_attribute_leaves_no_question() {
    let (source, manifests) = flies_scenario();
    let engine = engine(source, manifests);

    let next = engine
        .next_question(&Evidence::new(), &["flies".to_string()])
        .await
        .expect("selection failed");

    assert!(next.attribute().is_none());
    assert_eq!(
        next,
        NextQuestion::None {
            reason: NoQuestionReason::Exhausted
        }
    );
}

// ---------------------------------------------------------------------------
// Belief properties across topics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fused_belief_is_normalized_for_every_evidence_subset() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);
    let model = engine.cache().get().await.expect("training failed");

    let attributes = ["flies", "strong", "hammer", "shield", "alien", "mutant"];
    for mask in 0u32..(1 << attributes.len()) {
        let subset: Evidence = attributes
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(i, a)| (*a, Some(((mask >> (i + 1)) & 1) as u8)))
            .collect();

        let belief = model.belief(&subset).expect("belief failed");
        let sum: f64 = belief.probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "mask {mask:#b} summed to {sum}");
    }
}

#[tokio::test]
async fn empty_evidence_is_uniform_across_topics() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);

    let out = engine.infer(&Evidence::new(), &[]).await.expect("inference failed");

    assert_eq!(out.ranked.len(), 5);
    for r in &out.ranked {
        assert!((r.probability - 1.0 / 6.0).abs() < 1e-9);
    }
    // equal scores keep catalog order
    assert_eq!(out.ranked[0].name, "Thor");
    assert!(!out.threshold_met);
    assert!(out.candidate.is_none());
}

#[tokio::test]
async fn malformed_entries_are_ignored() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);

    let clean = engine
        .infer(&evidence(json!({ "hammer": 1 })), &[])
        .await
        .expect("inference failed");
    let noisy = engine
        .infer(
            &evidence(json!({ "hammer": 1, "flies": 7, "telepathy": 1, "alien": "yes", "shield": null })),
            &[],
        )
        .await
        .expect("inference failed");

    assert_eq!(clean.ranked, noisy.ranked);
}

#[tokio::test]
async fn threshold_contract_holds() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);

    let cases = [
        json!({}),
        json!({ "flies": 1 }),
        json!({ "flies": 1, "hammer": 1 }),
        json!({ "flies": 1, "hammer": 1, "alien": 1, "strong": 1 }),
        json!({ "flies": 0, "strong": 0, "mutant": 0 }),
        json!({ "shield": 1, "strong": 1, "flies": 0 }),
    ];

    for case in cases {
        let out = engine.infer(&evidence(case.clone()), &[]).await.expect("inference failed");
        let top = out.ranked[0].probability;

        assert_eq!(out.threshold_met, top >= 0.5, "case {case}");
        if out.threshold_met {
            assert_eq!(out.candidate.as_deref(), Some(out.ranked[0].name.as_str()));
        } else {
            assert!(out.candidate.is_none(), "case {case}");
        }
    }
}

#[tokio::test]
async fn strong_evidence_identifies_thor() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);

    let out = engine
        .infer(
            &evidence(json!({ "flies": 1, "strong": 1, "hammer": 1, "alien": 1, "shield": 0 })),
            &[],
        )
        .await
        .expect("inference failed");

    assert_eq!(out.candidate.as_deref(), Some("Thor"));
}

#[tokio::test]
async fn rejected_entities_are_dropped_from_ranking() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);

    let answers = evidence(json!({ "flies": 1, "hammer": 1 }));
    let out = engine
        .infer(&answers, &["Thor".to_string()])
        .await
        .expect("inference failed");

    assert!(out.ranked.iter().all(|r| r.name != "Thor"));
    let sum: f64 = out.ranked.iter().map(|r| r.probability).sum();
    assert!(sum <= 1.0 + 1e-9);
}

#[tokio::test]
async fn rejected_entity_is_absent_from_a_short_ranking() {
    let (source, manifests) = flies_scenario();
    let engine = engine(source, manifests);

    let out = engine
        .infer(&evidence(json!({ "flies": 1 })), &["Y".to_string()])
        .await
        .expect("inference failed");

    assert_eq!(out.ranked.len(), 1);
    assert_eq!(out.ranked[0].name, "X");
    assert!((out.ranked[0].probability - 1.0).abs() < 1e-9);
    assert_eq!(out.candidate.as_deref(), Some("X"));
}

#[tokio::test]
async fn rejecting_every_entity_proposes_nobody() {
    let (source, manifests) = flies_scenario();
    let engine = engine(source, manifests);

    let out = engine
        .infer(
            &evidence(json!({ "flies": 1 })),
            &["X".to_string(), "Y".to_string()],
        )
        .await
        .expect("inference failed");

    assert!(out.ranked.is_empty());
    assert!(!out.threshold_met);
    assert!(out.candidate.is_none());
}

// ---------------------------------------------------------------------------
// Idempotence and determinism
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_inference_is_identical() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);
    let answers = evidence(json!({ "flies": 1, "mutant": 0 }));

    let first = engine.infer(&answers, &[]).await.expect("inference failed");
    let second = engine.infer(&answers, &[]).await.expect("inference failed");

    assert_eq!(first, second);
}

#[tokio::test]
async fn next_question_is_deterministic() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);
    let answers = evidence(json!({ "strong": 1 }));
    let excluded = vec!["alien".to_string()];

    let first = engine
        .next_question(&answers, &excluded)
        .await
        .expect("selection failed");
    for _ in 0..10 {
        let again = engine
            .next_question(&answers, &excluded)
            .await
            .expect("selection failed");
        assert_eq!(again, first);
    }

    let attribute = first.attribute().expect("a question should remain");
    assert_ne!(attribute, "strong");
    assert_ne!(attribute, "alien");
}

#[tokio::test]
async fn answering_everything_exhausts_questions() {
    let (source, manifests) = heroes();
    let engine = engine(source, manifests);

    let answers = evidence(json!({
        "flies": 1, "strong": 1, "hammer": 0, "shield": 0, "alien": 0, "mutant": 1
    }));
    let next = engine.next_question(&answers, &[]).await.expect("selection failed");

    assert!(next.attribute().is_none());
}

// ---------------------------------------------------------------------------
// Model cache behaviour seen through the engine
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_first_games_train_once() {
    let (source, manifests) = heroes();
    let engine = Arc::new(engine(source.clone(), manifests));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.infer(&Evidence::new(), &[]).await })
        })
        .collect();

    for handle in handles {
        handle
            .await
            .expect("task panicked")
            .expect("inference failed");
    }

    assert_eq!(source.loads(), 1);
}

#[tokio::test]
async fn catalog_changes_need_explicit_retrain() {
    let (source, manifests) = flies_scenario();
    let engine = engine(source.clone(), manifests);

    let before = engine.infer(&Evidence::new(), &[]).await.expect("inference failed");
    assert_eq!(before.ranked.len(), 2);

    source
        .replace(catalog(&["flies"], &[("X", &[1]), ("Y", &[0]), ("Z", &[1])]))
        .await;

    let stale = engine.infer(&Evidence::new(), &[]).await.expect("inference failed");
    assert_eq!(stale.ranked.len(), 2);

    let summary = engine.retrain().await.expect("retrain failed");
    assert_eq!(summary.entity_count, 3);

    let fresh = engine.infer(&Evidence::new(), &[]).await.expect("inference failed");
    assert_eq!(fresh.ranked.len(), 3);
    assert_eq!(source.loads(), 2);
}

#[tokio::test]
async fn invalidate_retrains_lazily() {
    let (source, manifests) = flies_scenario();
    let engine = engine(source.clone(), manifests);

    engine.warm_up().await.expect("warm up failed");
    engine.invalidate().await;
    assert!(engine.model_summary().await.is_none());
    assert_eq!(source.loads(), 1);

    engine.infer(&Evidence::new(), &[]).await.expect("inference failed");
    assert_eq!(source.loads(), 2);
}
