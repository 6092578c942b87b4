use std::collections::{HashMap, HashSet};

use plotmark::dsl::fingerprint::fingerprint;
use plotmark::dsl::{Color, NamedColor, ParseError, Spec, Style, parse};

const GRAPH: &str = "\
width=800; height=300
left=-5; right=5
---
y=x^2|dashed|red
y=\\sin(x)|#00aa88|x>0|x<6
(1,2)|cross
";

#[test]
fn test_full_graph_block() {
    let spec = parse(GRAPH).unwrap();

    assert_eq!(spec.fields().width(), 800);
    assert_eq!(spec.fields().height(), 300);
    assert_eq!(spec.fields().left(), -5);
    assert_eq!(spec.fields().right(), 5);
    assert_eq!(spec.fields().bottom(), -7);
    assert_eq!(spec.fields().top(), 7);

    let equations = spec.equations();
    assert_eq!(equations.len(), 3);
    assert_eq!(equations[0].style(), Some(Style::Dashed));
    assert_eq!(equations[0].color(), Some(&Color::Named(NamedColor::Red)));
    assert_eq!(equations[1].expression(), "y=\\sin(x)");
    assert_eq!(equations[1].restriction().as_deref(), Some("{x>0}{x<6}"));
    assert_eq!(equations[2].style(), Some(Style::Cross));
    assert_eq!(equations[2].color(), None);
}

#[test]
fn test_fingerprint_ignores_layout_and_case() {
    let compact = parse("width=800;height=300;left=-5;right=5---y=x^2|DASHED|Red").unwrap();
    let spaced = parse("  width = 800 \n height=300\n\nleft=-5;right=5\n---\n\n  y=x^2 | dashed | red  \n\n")
        .unwrap();
    assert_eq!(compact.fingerprint(), spaced.fingerprint());
}

#[test]
fn test_fingerprint_is_deterministic() {
    let first = parse(GRAPH).unwrap();
    let second = parse(GRAPH).unwrap();
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(fingerprint(&first), first.fingerprint());
    assert_eq!(first.fingerprint().len(), 64);
    assert!(first.fingerprint().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_explicit_defaults_match_omitted_settings() {
    let implicit = parse("y=x").unwrap();
    let explicit =
        parse("width=600;height=400;left=-10;right=10;bottom=-7;top=7---y=x").unwrap();
    assert_eq!(implicit, explicit);
    assert_eq!(implicit.fingerprint(), explicit.fingerprint());
}

#[test]
fn test_semantic_changes_change_fingerprint() {
    let base = parse("y=x|red").unwrap();
    let variants = [
        "y=x|blue",
        "y=x|red|solid",
        "y=x|red|x>0",
        "y=2x|red",
        "width=601---y=x|red",
        "y=x|red\ny=x|red",
    ];
    for variant in variants {
        let other = parse(variant).unwrap();
        assert_ne!(base.fingerprint(), other.fingerprint(), "{variant}");
    }
}

#[test]
fn test_equation_order_matters() {
    let forward = parse("y=x\ny=2x").unwrap();
    let reversed = parse("y=2x\ny=x").unwrap();
    assert_ne!(forward.fingerprint(), reversed.fingerprint());
}

#[test]
fn test_restriction_order_matters() {
    let forward = parse("y=x|x>0|x<1").unwrap();
    let reversed = parse("y=x|x<1|x>0").unwrap();
    assert_ne!(forward.fingerprint(), reversed.fingerprint());
}

#[test]
fn test_canonical_source_round_trip() {
    let spec = parse(GRAPH).unwrap();
    let source = spec.to_source();
    assert!(source.starts_with("width=800; height=300; left=-5; right=5; bottom=-7; top=7\n---\n"));

    let reparsed = parse(&source).unwrap();
    assert_eq!(reparsed, spec);
    assert_eq!(reparsed.fingerprint(), spec.fingerprint());
}

/// Deterministic 64-bit LCG so generated cases are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.below(100) < percent
    }

    fn range(&mut self, low: i64, high: i64) -> i64 {
        low + self.below((high - low + 1) as u64) as i64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    fn mixed_case(&mut self, token: &str) -> String {
        token
            .chars()
            .map(|c| if self.chance(50) { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
            .collect()
    }

    fn padding(&mut self) -> &'static str {
        ["", " ", "  "][self.below(3) as usize]
    }
}

const EXPRESSIONS: [&str; 8] =
    ["y=x", "y=x^2", "y=\\sin(x)", "x^2+y^2=4", "(1,2)", "r=\\theta", "y=-x", "y=\\sqrt{x}"];
const STYLES: [&str; 6] = ["solid", "dashed", "dotted", "point", "open", "cross"];
const COLORS: [&str; 6] = ["red", "blue", "green", "purple", "orange", "black"];
const HEX_DIGITS: &[u8] = b"0123456789abcdefABCDEF";
const RESTRICTIONS: [&str; 6] = ["x>0", "x<1", "y>-2", "y<3", "0<x<5", "x^2<4"];

fn random_expression(rng: &mut Lcg) -> String {
    if rng.chance(50) {
        rng.pick(&EXPRESSIONS).to_string()
    } else {
        format!("y={}x+{}", rng.range(1, 40), rng.range(0, 40))
    }
}

fn random_equation(rng: &mut Lcg) -> String {
    let mut modifiers = Vec::new();
    if rng.chance(50) {
        let style = rng.pick(&STYLES);
        modifiers.push(rng.mixed_case(style));
    }
    if rng.chance(40) {
        let color = rng.pick(&COLORS);
        modifiers.push(rng.mixed_case(color));
    } else if rng.chance(30) {
        let length = rng.range(3, 6);
        let digits: String = (0..length)
            .map(|_| HEX_DIGITS[rng.below(HEX_DIGITS.len() as u64) as usize] as char)
            .collect();
        modifiers.push(format!("#{digits}"));
    }
    for _ in 0..rng.below(3) {
        modifiers.push(rng.pick(&RESTRICTIONS).to_string());
    }
    // a style or color may sit anywhere among the restriction fragments
    if modifiers.len() > 1 && !RESTRICTIONS.contains(&modifiers[0].as_str()) && rng.chance(30) {
        let first = modifiers.remove(0);
        let position = rng.below(modifiers.len() as u64 + 1) as usize;
        modifiers.insert(position, first);
    }

    let mut line = random_expression(rng);
    for modifier in modifiers {
        let (before, after) = (rng.padding(), rng.padding());
        line.push_str(&format!("{before}|{after}{modifier}"));
    }
    line
}

fn random_settings(rng: &mut Lcg) -> Vec<String> {
    let mut entries = Vec::new();
    if rng.chance(60) {
        entries.push(format!("width={}", rng.range(1, 2000)));
    }
    if rng.chance(60) {
        entries.push(format!("height={}", rng.range(1, 2000)));
    }
    if rng.chance(60) {
        let left = rng.range(-50, 10);
        entries.push(format!("left={left}"));
        entries.push(format!("right={}", left + rng.range(1, 60)));
    }
    if rng.chance(60) {
        let bottom = rng.range(-50, 10);
        entries.push(format!("bottom={bottom}"));
        entries.push(format!("top={}", bottom + rng.range(1, 60)));
    }
    entries
}

/// Random graph sources, including each multi-equation body in reverse order.
fn generated_sources(seed: u64, count: usize) -> Vec<String> {
    let mut rng = Lcg(seed);
    let mut sources = Vec::with_capacity(count * 2);

    for _ in 0..count {
        let equation_count = rng.range(1, 3);
        let equations: Vec<String> =
            (0..equation_count).map(|_| random_equation(&mut rng)).collect();
        let settings = random_settings(&mut rng);
        let separator = if rng.chance(50) { "; " } else { "\n" };

        let header = if settings.is_empty() && rng.chance(50) {
            String::new()
        } else {
            format!("{}\n---\n", settings.join(separator))
        };
        sources.push(format!("{header}{}\n", equations.join("\n")));
        if equations.len() > 1 {
            let reversed: Vec<&str> = equations.iter().rev().map(String::as_str).collect();
            sources.push(format!("{header}{}\n", reversed.join("\n")));
        }
    }
    sources
}

#[test]
fn test_generated_specs_have_distinct_fingerprints() {
    let mut by_fingerprint: HashMap<String, Spec> = HashMap::new();
    let mut canonical = HashSet::new();

    for source in generated_sources(0x5EED_0001, 3000) {
        let spec = parse(&source).unwrap_or_else(|err| panic!("{source:?}: {err}"));
        canonical.insert(spec.to_source());

        match by_fingerprint.get(spec.fingerprint()) {
            Some(existing) => assert_eq!(existing, &spec, "fingerprint collision for {source:?}"),
            None => {
                by_fingerprint.insert(spec.fingerprint().to_string(), spec);
            }
        }
    }

    // one fingerprint per distinct spec, and the generator produced real variety
    assert_eq!(by_fingerprint.len(), canonical.len());
    assert!(by_fingerprint.len() > 2500, "only {} distinct specs", by_fingerprint.len());
}

#[test]
fn test_generated_specs_survive_canonical_round_trip() {
    for source in generated_sources(0x5EED_0002, 3000) {
        let spec = parse(&source).unwrap_or_else(|err| panic!("{source:?}: {err}"));
        let reparsed = parse(&spec.to_source()).unwrap_or_else(|err| panic!("{source:?}: {err}"));

        assert_eq!(reparsed.fingerprint(), spec.fingerprint(), "{source:?}");
        assert_eq!(reparsed, spec, "{source:?}");
    }
}

#[test]
fn test_errors_carry_offending_input() {
    let cases: [(&str, ParseError); 6] = [
        (
            "a---b---c",
            ParseError::TooManySegments {
                found: 3,
            },
        ),
        (
            "depth=3---y=x",
            ParseError::UnrecognizedField {
                key: "depth".to_string(),
            },
        ),
        (
            "width=wide---y=x",
            ParseError::InvalidFieldType {
                key: "width".to_string(),
                value: "wide".to_string(),
            },
        ),
        (
            "left=5;right=5---y=x",
            ParseError::InvalidBoundary {
                lower_name: "left",
                lower: 5,
                upper_name: "right",
                upper: 5,
            },
        ),
        (
            "y=x|solid|dotted",
            ParseError::DuplicateStyle {
                expression: "y=x".to_string(),
                first: "SOLID".to_string(),
                second: "dotted".to_string(),
            },
        ),
        (
            "y=`x`",
            ParseError::BannedCharacter {
                character: '`',
                value: "y=`x`".to_string(),
            },
        ),
    ];

    for (source, expected) in cases {
        assert_eq!(parse(source).unwrap_err(), expected, "{source}");
    }
}
