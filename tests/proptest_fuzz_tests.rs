//! Property-based fuzzing tests for the Lettera scanner, parser, IR generator and sealer
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. The scanner and parser never panic on arbitrary input
//! 2. Well-formed letters compile deterministically
//! 3. Seals verify their own inputs and reject any single flipped byte

use lettera::compiler::ir::{base12_value, is_base12};
use lettera::lexer::tokenize;
use lettera::parser::{LetterParser, ParserConfig};
use lettera::{seal, verify, Compiler, Seal};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Generate random strings that might break the scanner
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,500}").unwrap()
}

/// Generate token soup built from the letter vocabulary
fn letter_like_string() -> impl Strategy<Value = String> {
    prop::collection::vec(letter_token(), 0..60).prop_map(|tokens| tokens.join(" "))
}

fn letter_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Module:".to_string()),
        Just("Entry:".to_string()),
        Just("Block:".to_string()),
        Just("End:".to_string()),
        Just("Func".to_string()),
        Just("Equation:".to_string()),
        Just("Above:".to_string()),
        Just("Below:".to_string()),
        Just("Return".to_string()),
        Just("Target:".to_string()),
        Just("print".to_string()),
        Just("BPM".to_string()),
        Just("Crossfade".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just(":".to_string()),
        Just(";".to_string()),
        Just("=".to_string()),
        Just("\n".to_string()),
        "[0-9ab]{1,4}".prop_map(|s| s),
        r#""[a-zA-Z0-9 %]{0,12}""#.prop_map(|s| s),
        "[a-z][a-z0-9_]{0,8}".prop_map(|s| s),
    ]
}

/// A base-12 numeral small enough to fit in i32
fn small_numeral() -> impl Strategy<Value = String> {
    "[0-9ab]{1,6}".prop_map(|s| s)
}

/// A printable message without quotes or newlines
fn message() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 %!.,]{0,24}".prop_map(|s| s)
}

/// Generate well-formed letters from a small template space
fn valid_letter() -> impl Strategy<Value = String> {
    (
        prop::collection::vec((0usize..3, small_numeral(), message()), 1..5),
        0i32..256,
    )
        .prop_map(|(blocks, code)| {
            let mut source = String::from("Module:\nEntry: Func main():;\n");
            for (i, (shape, numeral, msg)) in blocks.iter().enumerate() {
                let name = format!("v_{}", i);
                let block = match shape {
                    0 => format!(
                        "Block:\n Equation: {n} = {num}\n Above: print \"{n}\"\n Below: print \"{n}\"\n",
                        n = name,
                        num = numeral
                    ),
                    1 => format!(
                        "Block:\n Equation: {n} = \"{m}\"\n Above: print \"{m}\"\n Below: print \"{n}\"\n",
                        n = name,
                        m = msg
                    ),
                    _ => format!(
                        "Block:\n Equation: {n} = Loop({num} 4)\n Above: Log(\"{m}\")\n Below: Log(\"{m}\")\n",
                        n = name,
                        num = numeral,
                        m = msg
                    ),
                };
                source.push_str(&block);
            }
            source.push_str(&format!("End: Return {};\n", code));
            source
        })
}

// =============================================================================
// SCANNER / PARSER FUZZ TESTS
// =============================================================================

proptest! {
    /// The scanner should never panic on arbitrary input
    #[test]
    fn lexer_never_panics(source in arbitrary_source_string()) {
        let _ = tokenize(&source);
    }

    /// The parser should never panic on whatever the scanner accepts
    #[test]
    fn parser_never_panics(source in letter_like_string()) {
        if let Ok(tokens) = tokenize(&source) {
            let _ = LetterParser::new(tokens.clone()).parse();
            let _ = LetterParser::with_config(tokens, ParserConfig::lenient()).parse();
        }
    }

    /// The full pipeline reports errors instead of panicking
    #[test]
    fn compiler_never_panics(source in letter_like_string()) {
        let _ = Compiler::default().compile(&source);
    }

    /// Every token's position points back at its own lexeme
    #[test]
    fn token_offsets_match_source(source in letter_like_string()) {
        if let Ok(tokens) = tokenize(&source) {
            for token in tokens.iter().filter(|t| !t.lexeme.is_empty()) {
                prop_assert_eq!(&source[token.offset..token.end()], token.lexeme.as_str());
            }
        }
    }
}

// =============================================================================
// PIPELINE PROPERTY TESTS
// =============================================================================

proptest! {
    /// Well-formed letters compile, and compile the same way twice
    #[test]
    fn pipeline_is_deterministic(source in valid_letter()) {
        let first = Compiler::default().compile(&source);
        let second = Compiler::default().compile(&source);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(&a.ir, &b.ir);
                prop_assert_eq!(a.seal, b.seal);
                prop_assert!(a.verify());
            }
            (a, b) => prop_assert!(false, "well-formed letter failed: {:?} / {:?}", a.err(), b.err()),
        }
    }

    /// Above and Below always produce their own call sites
    #[test]
    fn two_call_sites_per_block(source in valid_letter()) {
        let result = Compiler::default().compile(&source).unwrap();
        let blocks = result.program.children_of(lettera::NodeKind::Block).count();
        let sites = result.module.call_count("printf") + result.module.call_count("dj_log");
        prop_assert_eq!(sites, 2 * blocks);
    }

    /// The return code survives into the IR
    #[test]
    fn return_code_is_emitted(code in 0i32..10_000) {
        let source = format!(
            "Module:\nEntry: Func main():;\nBlock:\n Equation: x = 1\n Above: print \"x\"\n Below: print \"x\"\nEnd: Return {};",
            code
        );
        let result = Compiler::default().compile(&source).unwrap();
        let expected = format!("ret i32 {}", code);
        prop_assert!(result.ir.contains(&expected));
    }
}

// =============================================================================
// BASE-12 PROPERTY TESTS
// =============================================================================

/// Render a non-negative value in base 12 with digits `0-9ab`
fn to_base12(mut value: i64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let digits = b"0123456789ab";
    let mut out = Vec::new();
    while value > 0 {
        out.push(digits[(value % 12) as usize]);
        value /= 12;
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

proptest! {
    #[test]
    fn base12_matches_reference(value in 0i64..i64::MAX / 12) {
        let text = to_base12(value);
        prop_assert!(is_base12(&text));
        prop_assert_eq!(base12_value(&text), Some(value));
    }

    #[test]
    fn base12_rejects_foreign_digits(text in "[0-9ab]{0,4}[c-z][0-9ab]{0,4}") {
        prop_assert!(!is_base12(&text));
        prop_assert_eq!(base12_value(&text), None);
    }

    /// Leading zeros do not change the value
    #[test]
    fn base12_leading_zeros(text in "[0-9ab]{1,8}", zeros in 0usize..5) {
        let padded = format!("{}{}", "0".repeat(zeros), text);
        prop_assert_eq!(base12_value(&padded), base12_value(&text));
    }
}

// =============================================================================
// SEAL PROPERTY TESTS
// =============================================================================

proptest! {
    #[test]
    fn seal_round_trip(
        ast in prop::collection::vec(any::<u8>(), 0..256),
        ir in prop::collection::vec(any::<u8>(), 0..256)
    ) {
        let s = seal(&ast, &ir);
        prop_assert!(verify(&s, &ast, &ir));
        prop_assert_eq!(s.to_hex().parse::<Seal>().unwrap(), s);
    }

    #[test]
    fn seal_detects_flipped_ast_byte(
        ast in prop::collection::vec(any::<u8>(), 1..256),
        ir in prop::collection::vec(any::<u8>(), 0..256),
        index in any::<prop::sample::Index>(),
        mask in 1u8..=255
    ) {
        let s = seal(&ast, &ir);
        let mut flipped = ast.clone();
        let i = index.index(flipped.len());
        flipped[i] ^= mask;
        prop_assert!(!verify(&s, &flipped, &ir));
    }

    #[test]
    fn seal_detects_flipped_ir_byte(
        ast in prop::collection::vec(any::<u8>(), 0..256),
        ir in prop::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        mask in 1u8..=255
    ) {
        let s = seal(&ast, &ir);
        let mut flipped = ir.clone();
        let i = index.index(flipped.len());
        flipped[i] ^= mask;
        prop_assert!(!verify(&s, &ast, &flipped));
    }
}
