//! Tests for marker extraction and inline formatting.

use super::*;

// ===== segments =====

#[test]
fn test_marker_free_text_is_single_segment() {
    let text = "Plain answer with [brackets], **bold** and `code`.\nSecond line.";
    assert_eq!(segments(text), vec![Segment::Text(text.to_string())]);
    assert_eq!(RenderModel::parse(text).plain_text, text);
}

#[test]
fn test_empty_text_has_no_segments() {
    assert!(segments("").is_empty());
    assert_eq!(RenderModel::parse(""), RenderModel::default());
}

#[test]
fn test_calc_result_extraction() {
    let model = RenderModel::parse("Result: [CALC_RESULT]42[/CALC_RESULT] done");

    assert_eq!(model.plain_text, "Result:  done");
    assert_eq!(model.calc_result.as_deref(), Some("42"));
    assert!(model.links.is_empty());
}

#[test]
fn test_links_collected_in_order() {
    let model = RenderModel::parse("[LINK]http://a[/LINK] and [LINK]http://b[/LINK]");

    assert_eq!(model.links, vec!["http://a", "http://b"]);
    assert_eq!(model.plain_text, " and ");
}

#[test]
fn test_unterminated_marker_left_untouched() {
    let model = RenderModel::parse("[WEATHER_ICON]http://x");

    assert_eq!(model.plain_text, "[WEATHER_ICON]http://x");
    assert!(model.weather_icon_url.is_none());
    assert!(!model.has_attachments());
}

#[test]
fn test_segments_preserve_order() {
    let text = concat!(
        "Paris: [WEATHER_ICON]https://icons/10d.png[/WEATHER_ICON] rainy.\n",
        "See [LINK]https://weather.example[/LINK]\n",
        "[IMAGE_ID]abc-123[/IMAGE_ID]"
    );

    assert_eq!(
        segments(text),
        vec![
            Segment::Text("Paris: ".to_string()),
            Segment::WeatherIcon("https://icons/10d.png".to_string()),
            Segment::Text(" rainy.\nSee ".to_string()),
            Segment::Link("https://weather.example".to_string()),
            Segment::Text("\n".to_string()),
            Segment::ImageRef("abc-123".to_string()),
        ]
    );
}

#[test]
fn test_single_value_markers_first_wins_but_all_removed() {
    let text = concat!(
        "[WEATHER_ICON]first.png[/WEATHER_ICON]a",
        "[WEATHER_ICON]second.png[/WEATHER_ICON]b",
        "[CALC_RESULT]1[/CALC_RESULT]c[CALC_RESULT]2[/CALC_RESULT]"
    );
    let model = RenderModel::parse(text);

    assert_eq!(model.weather_icon_url.as_deref(), Some("first.png"));
    assert_eq!(model.calc_result.as_deref(), Some("1"));
    assert_eq!(model.plain_text, "abc");
}

#[test]
fn test_image_ids_collected_in_order() {
    let model = RenderModel::parse(
        "Chart:\n\n[IMAGE_ID]img-1[/IMAGE_ID]\n\n[IMAGE_ID]img-2[/IMAGE_ID]\n\n",
    );

    assert_eq!(model.image_ids, vec!["img-1", "img-2"]);
    assert_eq!(model.plain_text, "Chart:\n\n\n\n\n\n");
    assert_eq!(
        model.image_urls("http://127.0.0.1:8888"),
        vec![
            "http://127.0.0.1:8888/images/img-1",
            "http://127.0.0.1:8888/images/img-2"
        ]
    );
}

#[test]
fn test_marker_does_not_span_lines() {
    let text = "[LINK]http://a\n[/LINK]";
    let model = RenderModel::parse(text);

    assert!(model.links.is_empty());
    assert_eq!(model.plain_text, text);
}

#[test]
fn test_marker_after_unterminated_one_on_next_line() {
    let model = RenderModel::parse("[LINK]broken\n[LINK]http://ok[/LINK]");

    assert_eq!(model.links, vec!["http://ok"]);
    assert_eq!(model.plain_text, "[LINK]broken\n");
}

#[test]
fn test_nearest_closing_tag_wins() {
    let model = RenderModel::parse("[LINK]a[/LINK][/LINK]");
    assert_eq!(model.links, vec!["a"]);
    assert_eq!(model.plain_text, "[/LINK]");
}

#[test]
fn test_repeated_opening_tag_belongs_to_value() {
    let model = RenderModel::parse("[LINK][LINK]x[/LINK]");
    assert_eq!(model.links, vec!["[LINK]x"]);
    assert_eq!(model.plain_text, "");
}

#[test]
fn test_empty_marker_value() {
    let model = RenderModel::parse("a[LINK][/LINK]b");
    assert_eq!(model.links, vec![""]);
    assert_eq!(model.plain_text, "ab");
}

#[test]
fn test_closing_tag_of_other_kind_does_not_close() {
    let text = "[CALC_RESULT]7[/LINK]";
    let model = RenderModel::parse(text);
    assert!(model.calc_result.is_none());
    assert_eq!(model.plain_text, text);
}

#[test]
fn test_outer_marker_swallows_inner_marker() {
    let model = RenderModel::parse("[LINK]a[CALC_RESULT]1[/CALC_RESULT]b[/LINK]");
    assert_eq!(model.links, vec!["a[CALC_RESULT]1[/CALC_RESULT]b"]);
    assert!(model.calc_result.is_none());
}

#[test]
fn test_unicode_around_markers() {
    let model = RenderModel::parse("東京 🌸 [CALC_RESULT]π≈3.14[/CALC_RESULT] ✓");
    assert_eq!(model.calc_result.as_deref(), Some("π≈3.14"));
    assert_eq!(model.plain_text, "東京 🌸  ✓");
}

#[test]
fn test_parse_is_idempotent() {
    let text = "x [LINK]l[/LINK] y [IMAGE_ID]i[/IMAGE_ID] **z**";
    assert_eq!(RenderModel::parse(text), RenderModel::parse(text));
}

#[test]
fn test_wrap_round_trips_through_segments() {
    for kind in MarkerKind::ALL {
        let text = kind.wrap("value");
        let segs = segments(&text);
        assert_eq!(segs.len(), 1, "kind {:?}", kind);
        assert_eq!(segs[0], kind.segment("value"));
    }
}

#[test]
fn test_has_attachments() {
    assert!(RenderModel::parse("[LINK]a[/LINK]").has_attachments());
    assert!(RenderModel::parse("[IMAGE_ID]a[/IMAGE_ID]").has_attachments());
    assert!(!RenderModel::parse("plain").has_attachments());
}

#[test]
fn test_render_model_serializes_camel_case() {
    let model = RenderModel::parse("a[CALC_RESULT]1[/CALC_RESULT]");
    let json = serde_json::to_value(&model).unwrap();

    assert_eq!(json["plainText"], "a");
    assert_eq!(json["calcResult"], "1");
    assert!(json.get("weatherIconUrl").is_none());
    assert_eq!(json["links"], serde_json::json!([]));
}

// ===== image_url =====

#[test]
fn test_image_url_joins_base_and_id() {
    assert_eq!(
        image_url("http://localhost:8888", "abc"),
        "http://localhost:8888/images/abc"
    );
    assert_eq!(
        image_url("http://localhost:8888/", "abc"),
        "http://localhost:8888/images/abc"
    );
}

// ===== format_inline =====

#[test]
fn test_bold_then_code() {
    assert_eq!(
        format_inline("**a** `b`"),
        vec![
            InlineSpan::strong("a"),
            InlineSpan::plain(" "),
            InlineSpan::code("b"),
        ]
    );
}

#[test]
fn test_plain_text_is_one_span() {
    assert_eq!(
        format_inline("nothing special"),
        vec![InlineSpan::plain("nothing special")]
    );
    assert!(format_inline("").is_empty());
}

#[test]
fn test_code_inside_bold() {
    assert_eq!(
        format_inline("**run `ls` now**"),
        vec![
            InlineSpan::strong("run "),
            InlineSpan {
                text: "ls".to_string(),
                strong: true,
                code: true,
            },
            InlineSpan::strong(" now"),
        ]
    );
}

#[test]
fn test_unpaired_delimiters_stay_literal() {
    assert_eq!(
        format_inline("2 ** 3 and `tick"),
        vec![InlineSpan::plain("2 ** 3 and `tick")]
    );
}

#[test]
fn test_delimiters_do_not_cross_lines() {
    assert_eq!(
        format_inline("**a\nb**"),
        vec![InlineSpan::plain("**a\nb**")]
    );
}

#[test]
fn test_multiple_bold_spans() {
    assert_eq!(
        format_inline("**Paris**: 18°C, **London**: 14°C"),
        vec![
            InlineSpan::strong("Paris"),
            InlineSpan::plain(": 18°C, "),
            InlineSpan::strong("London"),
            InlineSpan::plain(": 14°C"),
        ]
    );
}

#[test]
fn test_empty_pairs_vanish() {
    assert_eq!(format_inline("a****b"), vec![InlineSpan::plain("ab")]);
}

#[test]
fn test_formatting_applies_after_marker_removal() {
    let model = RenderModel::parse("**[LINK]x[/LINK]done**");
    assert_eq!(model.plain_text, "**done**");
    assert_eq!(model.inline_spans(), vec![InlineSpan::strong("done")]);
}
