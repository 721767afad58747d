//! End-to-end conversion of AIML documents into RiveScript text.

use aiml2rs::rivescript::render;
use aiml2rs::{convert, Options, Warning};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Convert a document and render it, returning the RiveScript body without
/// the file header, plus every warning.
fn to_rivescript(aiml: &str, options: Options) -> (String, Vec<Warning>) {
    let conversion = convert(aiml, options).unwrap();
    let (text, render_warnings) = render(&conversion.parsed);
    let body = text
        .strip_prefix("// Converted using aiml2rs\n! version = 2.0\n\n")
        .unwrap()
        .to_string();
    let mut warnings = conversion.warnings;
    warnings.extend(render_warnings);
    (body, warnings)
}

fn template(body: &str) -> String {
    format!(
        "<aiml version=\"1.0\"><category><pattern>TEST</pattern><template>{}</template></category></aiml>",
        body
    )
}

#[test]
fn alice_style_file() {
    let aiml = r#"<?xml version="1.0" encoding="UTF-8"?>
<aiml version="1.0">
  <category>
    <pattern>MY NAME IS _</pattern>
    <template>
      <think><set name="name"><star/></set></think>
      Nice to meet you, <get name="name"/>.
    </template>
  </category>
  <category>
    <pattern>HELLO</pattern>
    <template>
      <random>
        <li>Hi there!</li>
        <li>Hello!</li>
      </random>
    </template>
  </category>
  <category>
    <pattern>YES</pattern>
    <that>DO YOU LIKE CATS</that>
    <template><srai>I LIKE CATS</srai></template>
  </category>
</aiml>
"#;
    let (text, warnings) = to_rivescript(aiml, Options::default());
    assert_eq!(
        text,
        "+ my name is *\n\
         - <set name={formal}<star>{/formal}>Nice to meet you,<get name>.\n\n\
         + hello\n\
         - {random}Hi there!|Hello!{/random}\n\n\
         + yes\n\
         % do you like cats\n\
         - {@I LIKE CATS}\n\n"
    );
    assert!(warnings.is_empty());
}

#[test]
fn conditions_render_as_star_lines() {
    let aiml = template(
        r#"<condition name="mood">
             <li value="happy">Glad to hear it.</li>
             <li value="*">I see.</li>
             <li>How do you feel?</li>
           </condition>"#,
    );
    let (text, _) = to_rivescript(&aiml, Options::default());
    assert_eq!(
        text,
        "+ test\n\
         * <get mood> == happy => Glad to hear it.\n\
         * <get mood> != undefined => I see.\n\
         - How do you feel?\n\n"
    );
}

#[rstest]
#[case("happy", "<get mood> == happy =>")]
#[case("*", "<get mood> != undefined =>")]
#[case("unknown", "<get mood> == undefined =>")]
#[case("UNKNOWN", "<get mood> == undefined =>")]
#[case("OM", "<get mood> == undefined =>")]
fn condition_values(#[case] value: &str, #[case] expected: &str) {
    let aiml = template(&format!(
        r#"<condition name="mood"><li value="{}"></li></condition>"#,
        value
    ));
    let conversion = convert(&aiml, Options::default()).unwrap();
    let categories = conversion.parsed.topic("random").unwrap();
    assert_eq!(categories[0].conditions, vec![format!("{} ", expected)]);
}

#[test]
fn nested_random_drops_only_that_category() {
    let aiml = r#"<aiml>
      <category><pattern>A</pattern><template>
        <random><li><random><li>x</li><li>y</li></random></li><li>z</li></random>
      </template></category>
      <category><pattern>B</pattern><template>b</template></category>
    </aiml>"#;
    let (text, warnings) = to_rivescript(aiml, Options::default());
    assert_eq!(text, "+ b\n- b\n\n");
    assert_eq!(warnings, vec![Warning::NestedRandom { pattern: "A".into() }]);
}

#[test]
fn invalid_pattern_dropped_but_that_stripped() {
    let aiml = r#"<aiml>
      <category><pattern>HI, THERE</pattern><template>x</template></category>
      <category><pattern>OK</pattern><that>WELL, FINE</that><template>y</template></category>
    </aiml>"#;
    let (text, warnings) = to_rivescript(aiml, Options::default());
    assert_eq!(text, "+ ok\n% well fine\n- y\n\n");
    assert_eq!(
        warnings,
        vec![Warning::InvalidTrigger { trigger: "hi, there".into() }]
    );
}

#[test]
fn real_topics() {
    let aiml = r#"<aiml>
      <topic name="cats">
        <category><pattern>MEOW</pattern><template>Purr.</template></category>
      </topic>
      <category><pattern>HI</pattern><template><set name="topic">cats</set></template></category>
    </aiml>"#;

    let (flat, _) = to_rivescript(aiml, Options::default());
    assert_eq!(
        flat,
        "+ meow\n- Purr.\n\n\
         + hi\n- <set alicetopic=cats><get alicetopic>\n\n"
    );

    let (topics, _) = to_rivescript(aiml, Options { real_topics: true });
    assert_eq!(
        topics,
        "> topic cats\n\n\
         + meow\n- Purr.\n\n\
         < topic\n\n\
         + hi\n- <set topic=cats><get topic>\n\n"
    );
}

#[test]
fn html_survives_and_breaks_become_newlines() {
    let aiml = template(r#"Line one<br/>Visit <a href="http://example.com">here</a>"#);
    let (text, warnings) = to_rivescript(&aiml, Options::default());
    assert_eq!(
        text,
        "+ test\n- Line one\nVisit<a href=\"http://example.com\">here</a>\n\n"
    );
    assert!(warnings.is_empty());
}

#[test]
fn unhandled_tags_warn() {
    let aiml = template("<gender><star/></gender>");
    let (text, warnings) = to_rivescript(&aiml, Options::default());
    assert_eq!(text, "+ test\n- <gender><star></gender>\n\n");
    assert_eq!(
        warnings,
        vec![Warning::UnhandledTag { markup: "<gender>".into() }]
    );
}

#[test]
fn malformed_document_fails() {
    assert!(convert("<aiml><category></aiml>", Options::default()).is_err());
}
