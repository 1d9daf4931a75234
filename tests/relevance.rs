use pressespiegel::{tokenize, KeywordConfig, KeywordMatcher, Keywords, Topic};

fn filler(n: usize) -> String {
    "wort ".repeat(n)
}

fn preset(topic: Topic) -> KeywordMatcher {
    topic.keyword_config().unwrap().into()
}

#[test]
fn migration_article() {
    let matcher = preset(Topic::RefugeesMigration);
    let text = format!(
        "Immer mehr Flüchtlinge erreichen Europa. {} Die Asylverfahren dauern zu lange.",
        filler(60)
    );
    let decision = matcher.evaluate_text(&text);
    assert!(decision.is_match());
    assert_eq!(
        decision.into_query_keywords(),
        Some(vec!["asyl".to_string(), "flüchtl".to_string()])
    );
}

#[test]
fn matches_too_close() {
    let matcher = preset(Topic::RefugeesMigration);
    let text = format!(
        "Flüchtlinge und Asylbewerber warten. {} Ende.",
        filler(100)
    );
    assert!(!matcher.evaluate_text(&text).is_match());
}

#[test]
fn green_deal_compounds() {
    let matcher = preset(Topic::GreenDeal);
    let text = format!(
        "Der Green Deal der Kommission {} mehr Geld für den EU Green Deal",
        filler(60)
    );
    let decision = matcher.evaluate_text(&text);
    assert!(decision.is_match());
    assert!(decision.matched_stems().contains("green deal"));
    assert!(decision.matched_stems().contains("eu green deal"));
}

#[test]
fn soft_drugs_combination() {
    let matcher = preset(Topic::LegalizationSoftDrugs);

    let relevant = format!(
        "Weiche Drogen wie Cannabis {} eine Legalisierung wird gefordert",
        filler(60)
    );
    let decision = matcher.evaluate_text(&relevant);
    assert!(decision.is_match());
    assert_eq!(
        decision.into_query_keywords(),
        Some(vec![
            "cannabis".to_string(),
            "legal".to_string(),
            "weich droge".to_string()
        ])
    );

    let without_b2 = format!("Weiche Drogen wie Cannabis {} Ende", filler(60));
    assert!(!matcher.evaluate_text(&without_b2).is_match());

    let without_b1 = format!("Weiche Drogen {} eine Legalisierung", filler(60));
    assert!(!matcher.evaluate_text(&without_b1).is_match());
}

#[test]
fn custom_keywords_from_json() {
    let keywords: Keywords = serde_json::from_str(r#"["Windkraft", "windrad"]"#).unwrap();
    let config = KeywordConfig::builder()
        .keywords(keywords)
        .min_frequency(2)
        .min_distance(3)
        .build()
        .unwrap();
    let matcher = KeywordMatcher::new(config);
    let tokens = tokenize("Windkraftanlagen und ein neues Windrad im Norden");
    let decision = matcher.evaluate(&tokens);
    assert!(decision.is_match());
    assert_eq!(
        decision.matched_stems().iter().collect::<Vec<_>>(),
        vec!["windkraft", "windrad"]
    );

    let groups: Keywords =
        serde_json::from_str(r#"[["soft drug"], ["thc"], ["legal"]]"#).unwrap();
    assert!(matches!(groups, Keywords::Combination(_)));
    assert!(KeywordConfig::builder().keywords(groups).build().unwrap().is_combination());
}

#[test]
fn invalid_configurations() {
    assert!(KeywordConfig::builder()
        .stems(Vec::<String>::new())
        .build()
        .is_err());
    assert!(KeywordConfig::builder()
        .stems(vec!["a b c d"])
        .build()
        .is_err());
    assert!(KeywordConfig::builder()
        .combination(&["a"], &["b"], &["c d"])
        .build()
        .is_err());
}
