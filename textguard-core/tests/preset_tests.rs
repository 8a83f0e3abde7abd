// textguard-core/tests/preset_tests.rs
//! End-to-end behaviour of the built-in presets.

use serde_json::{Map, Value};
use textguard_core::{TextGuard, TextGuardError};

const PRESETS: [&str; 5] = ["safe", "strict", "username", "nickname", "rich_text"];

/// Inputs that every preset must map to a fixed point in one pass.
const CORPUS: &[&str] = &[
    "",
    "   ",
    "Hello World",
    "  Hello   World  \u{200B}  ",
    "<p>Hello <b>World</b></p>",
    "<script>alert('xss')</script>Text",
    "<a href=\"javascript:alert(1)\" title='x'>link</a> <a HREF='https://example.com'>ok</a>",
    "ＵｓｅｒＮａｍｅ１２３！！！",
    "Ｈｅｌｌｏ　Ｗｏｒｌｄ！１２３",
    "你好，世界！！！😀🚀",
    "Line1\nLine2\t\tTabbed",
    "\u{0}\u{1}control\u{7F}",
    "a\u{200E}\u{200E}\u{200E}",
    "Tom &amp; Jerry &lt;3",
    "&lt;b&gt;bold&lt;/b&gt;",
    "wow!!!!! really??? 。。。。",
    "user__name..test--x",
    "a very long line that keeps going and going and going well past fifty characters",
    "<─script>alert(1)<─/script>",
    "<─b>hi",
    "《script》x",
    "a<b",
];

fn guard() -> TextGuard {
    TextGuard::with_defaults().expect("default presets load")
}

#[test]
fn test_username_folds_fullwidth() {
    let guard = guard();
    assert_eq!(guard.filter("ＵｓｅｒＮａｍｅ１２３！！！", Some("username"), None).unwrap(), "UserName123!!!");
    assert_eq!(guard.filter("user__name..test", Some("username"), None).unwrap(), "user_name.test");
    assert_eq!(guard.filter("名字，测试", Some("username"), None).unwrap(), "名字,测试");
}

#[test]
fn test_username_truncates_to_fifty() {
    let guard = guard();
    let out = guard.filter(&"x".repeat(80), Some("username"), None).unwrap();
    assert_eq!(out.chars().count(), 50);
}

#[test]
fn test_rich_text_keeps_whitelisted_tags() {
    let guard = guard();
    let out = guard.filter("<script>alert(1)</script><p>ok</p>", Some("rich_text"), None).unwrap();
    assert!(out.contains("<p>ok</p>"));
    assert!(!out.contains("<script>"));
    assert_eq!(out, "alert(1)<p>ok</p>");

    let link = guard
        .filter(r#"<a href="https://example.com" onclick="x()">site</a>"#, Some("rich_text"), None)
        .unwrap();
    assert_eq!(link, r#"<a href="https://example.com">site</a>"#);
}

#[test]
fn test_strict_normalizes_and_whitelists() {
    let guard = guard();
    assert_eq!(guard.filter("Ｈｅｌｌｏ　Ｗｏｒｌｄ！１２３", Some("strict"), None).unwrap(), "Hello World!123");
    assert_eq!(guard.filter("你好世界😀！", Some("strict"), None).unwrap(), "你好世界!");
    // Entities are decoded first, so encoded tags are still removed.
    assert_eq!(guard.filter("&lt;b&gt;bold&lt;/b&gt;", Some("strict"), None).unwrap(), "bold");
    // Fullwidth brackets become tags after normalization.
    assert_eq!(guard.filter("＜b＞hi＜/b＞", Some("strict"), None).unwrap(), "hi");
}

#[test]
fn test_nickname_keeps_emoji() {
    let guard = guard();
    assert_eq!(guard.filter("  小明😀🚀  ", Some("nickname"), None).unwrap(), "小明😀🚀");
    assert_eq!(guard.filter("name─box", Some("nickname"), None).unwrap(), "namebox");
}

#[test]
fn test_safe_rejects_mostly_invisible_text() {
    let guard = guard();
    // Left-to-right marks are format characters that no step removes.
    assert_eq!(guard.filter("a\u{200E}\u{200E}\u{200E}", None, None).unwrap(), "");
    // Zero-width characters are removed before the guard looks.
    assert_eq!(guard.filter("a\u{200B}\u{200B}\u{200B}", None, None).unwrap(), "a");
}

#[test]
fn test_every_preset_is_idempotent() {
    let guard = guard();
    for preset in PRESETS {
        for input in CORPUS {
            let once = guard.filter(input, Some(preset), None).unwrap();
            let twice = guard.filter(&once, Some(preset), None).unwrap();
            assert_eq!(once, twice, "preset {} is not idempotent on {:?}", preset, input);
        }
    }
}

#[test]
fn test_plain_text_presets_never_emit_tags() {
    let guard = guard();
    let inputs = [
        "<─script>alert(1)<─/script>",
        "<\u{E000}script>x",
        "<─b>hi",
        "《script》x",
        "《b》bold《/b》",
        "＜script＞x",
        "&lt;─script&gt;x",
    ];
    for preset in ["strict", "nickname", "username"] {
        for input in inputs {
            let out = guard.filter(input, Some(preset), None).unwrap();
            assert!(!out.contains("<script"), "preset {} emitted a tag for {:?}: {:?}", preset, input, out);
            assert!(!out.contains("<b>"), "preset {} emitted a tag for {:?}: {:?}", preset, input, out);
        }
    }

    assert_eq!(guard.filter("《script》x", Some("username"), None).unwrap(), "x");
    assert_eq!(guard.filter("<─b>hi", Some("nickname"), None).unwrap(), "b>hi");
    assert_eq!(
        guard.filter("<─script>alert(1)<─/script>", Some("strict"), None).unwrap(),
        "script>alert(1)/script>"
    );
}

#[test]
fn test_every_preset_maps_empty_to_empty() {
    let guard = guard();
    for preset in PRESETS {
        assert_eq!(guard.filter("", Some(preset), None).unwrap(), "", "preset {}", preset);
    }
}

#[test]
fn test_preset_key_order_does_not_matter() {
    let mut guard = guard();
    for preset in PRESETS {
        let original = guard.preset_config(preset).unwrap().clone();
        let reversed: Map<String, Value> = original.into_iter().rev().collect();
        guard.add_preset(format!("{}_reversed", preset), reversed).unwrap();
    }

    for preset in PRESETS {
        let reversed = format!("{}_reversed", preset);
        let forward_steps = guard.pipeline_for(Some(preset), None).unwrap().step_names().join(",");
        let reversed_steps = guard.pipeline_for(Some(reversed.as_str()), None).unwrap().step_names().join(",");
        assert_eq!(forward_steps, reversed_steps);

        for input in CORPUS {
            assert_eq!(
                guard.filter(input, Some(preset), None).unwrap(),
                guard.filter(input, Some(reversed.as_str()), None).unwrap(),
                "preset {} depends on key order for {:?}",
                preset,
                input
            );
        }
    }
}

#[test]
fn test_validate_unknown_preset_performs_no_transform() {
    let guard = guard();
    let report = guard.validate("  <b>x</b>  ", Some("nope"), None).unwrap();
    assert!(!report.valid);
    assert_eq!(report.errors, vec!["Preset 'nope' not found".to_string()]);
}

#[test]
fn test_filter_unknown_preset() {
    let err = guard().filter("x", Some("nope"), None).unwrap_err();
    assert_eq!(err.to_string(), "Preset 'nope' not found");
    assert!(matches!(err, TextGuardError::UnknownPreset(_)));
}
