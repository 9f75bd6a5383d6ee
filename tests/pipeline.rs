use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use epochlens::tooltip::{LABEL_JQ, LABEL_JS, LABEL_JSON_PATH, LABEL_LOCAL, LABEL_RELATIVE, LABEL_UTC};
use epochlens::{
    annotate, compute_confidence, detect_context, interpret, relative_time_from, tooltip_for,
    ContextInfo, ContextKind, Settings,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0).unwrap()
}

fn offset_of(text: &str, needle: &str) -> usize {
    text.find(needle).unwrap()
}

#[test]
fn test_interpreter_length_gate() {
    assert_eq!(interpret(1_704_067_200).map(|d| d.year()), Some(2024));
    assert_eq!(interpret(999_999_999_999_999), None);
    for value in [123_456_789u64, 12_345_678_901, 123_456_789_012] {
        assert_eq!(interpret(value), None);
        let rows = tooltip_for(value, &Settings::default(), &ContextInfo::raw(), &fixed_now());
        assert!(rows.is_none());
    }
}

#[test]
fn test_json_key_beats_keywords() {
    let text = r#"time "createdAt": 1704067200"#;
    let ctx = detect_context(text, offset_of(text, "1704067200"));
    assert_eq!(ctx.kind(), ContextKind::Json);

    let text = r#""createdAt": 1704067200"#;
    assert_eq!(
        detect_context(text, offset_of(text, "1704067200")).kind(),
        ContextKind::Json
    );
}

#[test]
fn test_bare_number_is_raw() {
    let text = "createdAt 1704067200";
    let ctx = detect_context(text, offset_of(text, "1704067200"));
    assert_eq!(ctx.kind(), ContextKind::Raw);
    assert_eq!(ctx.json_path(), None);
}

#[test]
fn test_score_clamped() {
    let settings = Settings {
        raw_length_bonus: 6,
        ..Settings::default()
    };
    let c = compute_confidence(1_704_067_200, &ContextInfo::raw(), &settings);
    assert_eq!(c.score, 10);
    assert_eq!(c.percent, 100);
}

#[test]
fn test_relative_boundaries() {
    let now = fixed_now();
    assert_eq!(relative_time_from(&now, &(now - Duration::seconds(45))), "45s ago");
    assert_eq!(relative_time_from(&now, &(now - Duration::seconds(3 * 60))), "3m ago");
    assert_eq!(relative_time_from(&now, &(now + Duration::seconds(60))), "in 1m");
}

#[test]
fn test_human_readable_flag_removes_two_rows() {
    let ctx = ContextInfo::raw();
    let on = tooltip_for(1_704_067_200, &Settings::default(), &ctx, &fixed_now()).unwrap();
    let off_settings = Settings {
        show_human_readable: false,
        ..Settings::default()
    };
    let off = tooltip_for(1_704_067_200, &off_settings, &ctx, &fixed_now()).unwrap();

    assert_eq!(on.len(), off.len() + 2);
    assert!(on.iter().any(|r| r.label == LABEL_UTC));
    assert!(!off.iter().any(|r| r.label == LABEL_UTC || r.label == LABEL_LOCAL));
}

#[test]
fn test_json_path_rows() {
    let text = r#"{"createdAt": 1704067200}"#;
    let ctx = detect_context(text, offset_of(text, "1704067200"));
    let rows = tooltip_for(1_704_067_200, &Settings::default(), &ctx, &fixed_now()).unwrap();

    let path_rows: Vec<_> = rows
        .iter()
        .filter(|r| [LABEL_JSON_PATH, LABEL_JQ, LABEL_JS].contains(&r.label.as_str()))
        .map(|r| r.display.as_str())
        .collect();
    assert_eq!(path_rows, vec!["$.createdAt", ".createdAt", "obj.createdAt"]);
}

#[test]
fn test_pipeline_over_mixed_text() {
    let text = concat!(
        "2024-01-01 level=info ts=1704067200 msg=\"started\"\n",
        "{\"orders\": [{\"updated_at\": 1704067200000}]}\n",
        "INSERT INTO t (created_at) VALUES (1704067200);\n",
        "order id 4102444801 and zip 123456789\n",
    );
    let found = annotate(text, &Settings::default(), &fixed_now());

    let kinds: Vec<_> = found.iter().map(|a| a.context.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ContextKind::Log,
            ContextKind::Json,
            ContextKind::Raw,
            ContextKind::Raw,
            ContextKind::Raw,
        ]
    );

    assert!(found[0].is_surfaced());
    assert_eq!(found[1].context.json_path(), Some("$.updated_at[0]"));
    assert!(found[1].is_surfaced());
    // 2100-01-01T00:00:01Z is still in range
    assert!(found[3].is_surfaced());
    // 9 digits never interpret
    assert!(!found[4].is_surfaced());

    for a in &found {
        assert_eq!(&text[a.span()], a.raw);
        if let Some(rows) = &a.rows {
            assert!(!rows.is_empty());
        }
    }
}

#[test]
fn test_pipeline_is_idempotent() {
    let text = r#"{"events": [{"ts": 1704067200}, {"ts": 1704067300}]}"#;
    let settings = Settings::default();
    let a = annotate(text, &settings, &fixed_now());
    let b = annotate(text, &settings, &fixed_now());
    assert_eq!(a, b);

    let later = annotate(text, &settings, &(fixed_now() + Duration::days(2)));
    for (x, y) in a.iter().zip(&later) {
        let xr = x.rows.as_ref().unwrap();
        let yr = y.rows.as_ref().unwrap();
        for (rx, ry) in xr.iter().zip(yr) {
            if rx.label != LABEL_RELATIVE {
                assert_eq!(rx, ry);
            }
        }
    }
}
