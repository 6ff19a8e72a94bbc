//! Integration tests for plain text → HTML rendering and HTML → plain text.

use mailquote::html::{html_to_plain_text, text_to_html, text_to_html_fragment};

const PRE: &str = "<pre dir=\"auto\" class=\"k9mail\">";

fn bq(color: &str) -> String {
    format!(
        "<blockquote class=\"gmail_quote\" style=\"margin: 0pt 0pt 1ex 0.8ex; border-left: 1px solid {color}; padding-left: 1ex;\">"
    )
}

fn crlf(text: &str) -> String {
    text.replace('\n', "\r\n")
}

fn pre(body: &str) -> String {
    format!("{PRE}{body}</pre>")
}

// ─── Test 1: Quoted text becomes nested blockquotes ─────────────────

#[test]
fn test_quoted_text_uses_blockquotes() {
    let message = crlf(
        "Panama!\n\
         \n\
         Bob Barker <bob@aol.com> wrote:\n\
         > a canal\n\
         >\n\
         > Dorothy Jo Gideon <dorothy@aol.com> espoused:\n\
         > >A man, a plan...\n\
         > Too easy!\n\
         \n\
         Nice job :)\n\
         >> Guess!",
    );

    let expected = pre(&format!(
        "Panama!<br><br>Bob Barker &lt;bob@aol.com&gt; wrote:<br>\
         {} a canal<br><br> Dorothy Jo Gideon &lt;dorothy@aol.com&gt; espoused:<br>\
         {}\
         A man, a plan...<br></blockquote>\
         Too easy!<br></blockquote>\
         <br>Nice job :)<br>\
         {}{}\
         Guess!</blockquote></blockquote>",
        bq("#729fcf"),
        bq("#ad7fa8"),
        bq("#729fcf"),
        bq("#ad7fa8"),
    ));
    assert_eq!(text_to_html(&message), expected);
}

// ─── Test 2: Indentation inside quoted text is kept ─────────────────

#[test]
fn test_quoted_indentation_retained() {
    let message = crlf(
        "*facepalm*\n\
         \n\
         Bob Barker <bob@aol.com> wrote:\n\
         > A wise man once said...\n\
         >\n\
         >     LOL F1RST!!!!!\n\
         >\n\
         > :)",
    );

    let expected = pre(&format!(
        "*facepalm*<br><br>Bob Barker &lt;bob@aol.com&gt; wrote:<br>\
         {} A wise man once said...<br><br>     LOL F1RST!!!!!<br><br> :)</blockquote>",
        bq("#729fcf"),
    ));
    assert_eq!(text_to_html(&message), expected);
}

// ─── Test 3: Quote colors follow depth ──────────────────────────────

#[test]
fn test_quote_depth_colors() {
    let message = crlf("zero\n> one\n>> two\n>>> three\n>>>> four\n>>>>> five\n>>>>>> six");

    let expected = pre(&format!(
        "zero<br>{}one<br>{}two<br>{}three<br>{}four<br>{}five<br>{}six{}",
        bq("#729fcf"),
        bq("#ad7fa8"),
        bq("#8ae234"),
        bq("#fcaf3e"),
        bq("#e9b96e"),
        bq("#ccc"),
        "</blockquote>".repeat(6),
    ));
    assert_eq!(text_to_html(&message), expected);
}

#[test]
fn test_quote_colors_cycle_after_six() {
    let html = text_to_html(">>>>>>> seven");
    assert_eq!(html.matches(&bq("#729fcf")).count(), 2);
    assert_eq!(html.matches(&bq("#ccc")).count(), 1);
}

// ─── Test 4: Leading spaces survive ─────────────────────────────────

#[test]
fn test_leading_spaces_preserved() {
    let message = crlf("foo\n bar\n  baz\n");
    assert_eq!(text_to_html(&message), pre("foo<br> bar<br>  baz<br>"));
}

#[test]
fn test_leading_spaces_before_special_characters() {
    let message = crlf(" \n  &\n    \n   <\n  > \n");

    let expected = pre(&format!(
        " <br>  &amp;<br>    <br>   &lt;<br>{}<br></blockquote>",
        bq("#729fcf")
    ));
    assert_eq!(text_to_html(&message), expected);
}

// ─── Test 5: Divider patterns become <hr> ───────────────────────────

#[test]
fn test_common_dividers() {
    let text = "text\n\
                ---------------------------\n\
                some other text\n\
                ===========================\n\
                more text\n\
                -=-=-=-=-=-=-=-=-=-=-=-=-=-\n\
                scissors below\n\
                -- >8 --\n\
                other direction\n\
                -- 8< --\n\
                end";

    assert_eq!(
        text_to_html(text),
        pre("text<hr>some other text<hr>more text<hr>scissors below<hr>other direction<hr>end")
    );
}

#[test]
fn test_dashes_mixed_with_spaces_are_text() {
    let text = "hello\n--- --- --- --- ---\nfoo bar";
    assert_eq!(
        text_to_html(text),
        pre("hello<br>--- --- --- --- ---<br>foo bar")
    );
}

#[test]
fn test_consecutive_dividers_merge() {
    let text = "hello\n------------\n---------------\nfoo bar";
    assert_eq!(text_to_html(text), pre("hello<hr>foo bar"));
}

#[test]
fn test_divider_prefixed_with_text_is_text() {
    assert_eq!(text_to_html("hello----\n\n"), pre("hello----<br><br>"));
}

#[test]
fn test_two_character_runs_are_text() {
    assert_eq!(text_to_html("--\n"), pre("--<br>"));
    assert_eq!(text_to_html("==\n"), pre("==<br>"));
    assert_eq!(text_to_html("__\n"), pre("__<br>"));
}

#[test]
fn test_three_character_combinations() {
    assert_eq!(text_to_html("--=\n-=-\n===\n___\n"), pre("<hr>"));
}

#[test]
fn test_divider_at_start_and_end() {
    assert_eq!(
        text_to_html("---------------------------\nfoo bar"),
        pre("<hr>foo bar")
    );
    assert_eq!(
        text_to_html("hello\n__________________________________"),
        pre("hello<hr>")
    );
}

#[test]
fn test_scissors_divider() {
    let text = "hello\n-- %< -------------- >8 --\nworld";
    assert_eq!(text_to_html(text), pre("hello<hr>world"));
}

#[test]
fn test_separated_dividers_stay_separate() {
    let text = "a\n---\nb\n===\nc";
    assert_eq!(text_to_html(text).matches("<hr>").count(), 2);
}

// ─── Test 6: Signature wrapping ─────────────────────────────────────

#[test]
fn test_signature_wrapped_in_div() {
    let text = "text\n-- \nsignature with url: https://domain.example/";

    assert_eq!(
        text_to_html(text),
        pre("text<br><div class='k9mail-signature'>-- <br>signature with url: \
             <a href=\"https://domain.example/\">https://domain.example/</a></div>")
    );
}

#[test]
fn test_signature_with_crlf() {
    let html = text_to_html("text\r\n-- \r\nme\r\n");
    assert_eq!(
        html,
        pre("text<br><div class='k9mail-signature'>-- <br>me<br></div>")
    );
}

// ─── Test 7: Links ──────────────────────────────────────────────────

#[test]
fn test_links_are_escaped_in_attributes() {
    let html = text_to_html("see http://example.org/?a=1&b=2 now");
    assert_eq!(
        html,
        pre("see <a href=\"http://example.org/?a=1&amp;b=2\">http://example.org/?a=1&amp;b=2</a> now")
    );
}

#[test]
fn test_link_inside_quote() {
    let html = text_to_html("> mailto:alice@example.com");
    assert_eq!(
        html,
        pre(&format!(
            "{}<a href=\"mailto:alice@example.com\">mailto:alice@example.com</a></blockquote>",
            bq("#729fcf")
        ))
    );
}

// ─── Test 8: Fragment whitespace ────────────────────────────────────

#[test]
fn test_fragment_spaces() {
    assert_eq!(text_to_html_fragment(" foo"), "\u{00A0}foo");
    assert_eq!(text_to_html_fragment("  foo"), "\u{00A0} foo");
    assert_eq!(
        text_to_html_fragment("    some words here"),
        "\u{00A0}\u{00A0}\u{00A0} some words here"
    );
    assert_eq!(text_to_html_fragment("foo  bar"), "foo\u{00A0} bar");
    assert_eq!(text_to_html_fragment("foo \n"), "foo <br>");
    assert_eq!(
        text_to_html_fragment("some words here   \n"),
        "some words here\u{00A0}\u{00A0} <br>"
    );
}

#[test]
fn test_fragment_nbsp_rule_on_every_run() {
    let text = "a b  c   d    e";
    let fragment = text_to_html_fragment(text);
    assert_eq!(
        fragment,
        "a b\u{00A0} c\u{00A0}\u{00A0} d\u{00A0}\u{00A0}\u{00A0} e"
    );
    // Never two literal spaces in a row.
    assert!(!fragment.contains("  "));
}

// ─── Test 9: Structural properties ──────────────────────────────────

#[test]
fn test_blockquotes_balanced() {
    let inputs = [
        "",
        "> a",
        ">>> deep\nshallow\n>> mid\n> one",
        "> -- \n> sig\n>> deeper\nout",
        "-- \n> quoted sig\n>>> more",
        ">\n>>\n>>>\n",
    ];
    for input in inputs {
        let html = text_to_html(input);
        let mut depth: i64 = 0;
        let mut rest = html.as_str();
        while let Some(i) = rest.find('<') {
            rest = &rest[i..];
            if rest.starts_with("<blockquote") {
                depth += 1;
            } else if rest.starts_with("</blockquote>") {
                depth -= 1;
                assert!(depth >= 0, "negative depth for {input:?}");
            }
            rest = &rest[1..];
        }
        assert_eq!(depth, 0, "unbalanced for {input:?}");
        assert_eq!(html.matches("<div").count(), html.matches("</div>").count());
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let text = "Hi\n> quoted http://example.org\n>> deeper\n---\n-- \nsig";
    assert_eq!(text_to_html(text), text_to_html(text));
    assert_eq!(text_to_html_fragment(text), text_to_html_fragment(text));
}

#[test]
fn test_minimal_dividers() {
    for line in ["---", "===", "___", "-=_"] {
        assert_eq!(text_to_html(line), pre("<hr>"), "{line}");
    }
    assert_eq!(text_to_html("---\n===\n___\n-=_"), pre("<hr>"));
    assert_eq!(text_to_html("-="), pre("-="));
}

// ─── Test 10: HTML → plain text ─────────────────────────────────────

#[test]
fn test_html_br_to_line_breaks() {
    assert_eq!(
        html_to_plain_text("One<br>Two<br><br>Three"),
        "One\nTwo\n\nThree"
    );
}

#[test]
fn test_html_block_elements() {
    assert_eq!(
        html_to_plain_text("<p>One</p><p>Two<br>Three</p><div>Four</div>"),
        "One\n\nTwo\nThree\n\nFour"
    );
}

#[test]
fn test_html_link_uris() {
    assert_eq!(
        html_to_plain_text("<a href='https://domain.example/'>Link text</a>"),
        "Link text <https://domain.example/>"
    );
    assert_eq!(
        html_to_plain_text(
            "Text <a href='https://domain.example/path/'>https://domain.example/path/</a> more text"
        ),
        "Text https://domain.example/path/ more text"
    );
    assert_eq!(
        html_to_plain_text(
            "<a href='https://domain.example/path/'>https://<b>domain.example</b>/path/</a>"
        ),
        "https://domain.example/path/"
    );
    assert_eq!(
        html_to_plain_text("<a href='https://x/'>https://x/</a>"),
        "https://x/"
    );
}

#[test]
fn test_html_source_line_breaks_collapse() {
    assert_eq!(html_to_plain_text("One\nTwo\nThree"), "One Two Three");
}

#[test]
fn test_html_long_line_not_wrapped() {
    let input = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nullam sit amet finibus felis, \
                 viverra ullamcorper justo. Suspendisse potenti. Etiam erat sem, interdum a condimentum quis, \
                 fringilla quis orci.";
    assert_eq!(html_to_plain_text(input), input);
}
