/// End-to-end integration tests for the letter pipeline
/// Demonstrates: Scanner → Parser → Canonicalizer → IR → Seal working together
use lettera::compiler::ir::{GlobalInit, IrInstruction};
use lettera::{
    CodegenError, CompileOptions, Compiler, Error, NodeKind, Parser, ParserConfig, Scanner,
    Stage, UnknownCommandPolicy,
};

const GREETING: &str = r#"
Module:
Entry: Func main():;
Block:
  Equation: greeting = "hi"
  Above: print "greeting"
  Below: print "greeting"
End: Return 0;
"#;

fn compile(source: &str) -> lettera::Result<lettera::CompileResult> {
    Compiler::default().compile(source)
}

#[test]
fn test_e2e_greeting() {
    let result = compile(GREETING).unwrap();

    let hi: Vec<_> = result
        .module
        .globals
        .iter()
        .filter(|g| g.init == GlobalInit::Bytes(b"hi\0".to_vec()))
        .collect();
    assert_eq!(hi.len(), 1);
    assert!(result
        .ir
        .contains("@greeting = private unnamed_addr constant [3 x i8] c\"hi\\00\""));

    assert_eq!(result.module.call_count("printf"), 2);
    let greeting_loads = result
        .module
        .function
        .instructions
        .iter()
        .filter(|i| matches!(i, IrInstruction::AddressOf { global, .. } if global == "greeting"))
        .count();
    assert_eq!(greeting_loads, 2);

    assert!(result.ir.contains("declare i32 @printf(i8*, ...)"));
    assert!(result.ir.contains("  ret i32 0\n}"));
    assert!(result.verify());
}

#[test]
fn test_e2e_return_code_changes_seal() {
    let zero = compile(GREETING).unwrap();
    let one = compile(&GREETING.replace("Return 0", "Return 1")).unwrap();

    assert!(one.ir.contains("ret i32 1"));
    assert_ne!(zero.seal, one.seal);
    assert_ne!(zero.ast_bytes, one.ast_bytes);
}

#[test]
fn test_e2e_deterministic() {
    let first = compile(GREETING).unwrap();
    let second = compile(GREETING).unwrap();
    assert_eq!(first.ir, second.ir);
    assert_eq!(first.seal, second.seal);
}

#[test]
fn test_e2e_stage_by_stage() {
    let mut scanner = Scanner::new(GREETING);
    let tokens = scanner.scan_tokens().unwrap();
    let mut parser = Parser::new(tokens);
    let program = parser.parse().unwrap();

    let kinds: Vec<NodeKind> = program.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Module, NodeKind::Entry, NodeKind::Block, NodeKind::End]
    );

    let result = Compiler::default().compile_ast(program).unwrap();
    assert_eq!(result.ir, compile(GREETING).unwrap().ir);
}

#[test]
fn test_e2e_integer_constant() {
    let source = GREETING.replace("\"hi\"", "b0");
    let result = compile(&source).unwrap();

    assert_eq!(
        result.module.global("greeting").map(|g| g.init.clone()),
        Some(GlobalInit::Int(132))
    );
    assert!(result.ir.contains("load i32, i32* @greeting"));
    assert!(result.ir.contains("c\"%d\\0A\\00\""));
}

#[test]
fn test_e2e_correction_applies_to_every_block() {
    let source = r#"
Module:
Entry: Func main():;
Block:
  Equation: a = "one"
  Above: print "wrong"
  Below: print "a"
Block:
  Equation: n = 10
  Above: print "also wrong"
  Below: print "n"
End: Return 0;
"#;
    let result = compile(source).unwrap();
    assert_eq!(result.corrected_blocks, 2);
    assert_eq!(result.module.call_count("printf"), 4);
    assert!(!result.ir.contains("wrong"));
    assert_eq!(
        result.module.global("n").map(|g| g.init.clone()),
        Some(GlobalInit::Int(12))
    );
}

#[test]
fn test_e2e_literal_message() {
    let source = GREETING
        .replace("print \"greeting\"", "print \"Drop the beat\"")
        .replace("greeting = \"hi\"", "x = 1");
    let result = compile(&source).unwrap();
    assert!(result.ir.contains("c\"Drop the beat\\0A\\00\""));
    assert_eq!(result.module.call_count("printf"), 2);
}

#[test]
fn test_e2e_metadata_emits_nothing() {
    let source = GREETING.replace(
        "Module:\n",
        "Module:\nTarget: x86_64;\nVersion: 1;\nSubject: \"set\";\nAddress: club;\n",
    );
    let with_metadata = compile(&source).unwrap();
    let without = compile(GREETING).unwrap();

    assert_eq!(with_metadata.ir, without.ir);
    // metadata is part of the AST, so the seal still differs
    assert_ne!(with_metadata.seal, without.seal);
}

#[test]
fn test_e2e_domain_commands() {
    let source = r#"
Module:
Entry: Func main():;
Block:
  Equation: tempo = BPM(a0)
  Above: Crossfade(8s "linear")
  Below: Crossfade(8s "linear")
Block:
  Equation: bars = Loop(10 4)
  Above: Order("intro" "drop" "outro")
  Below: Order("intro" "drop" "outro")
End: Return 0;
"#;
    let result = compile(source).unwrap();

    assert!(result.ir.contains("call void @dj_bpm(i32 120)"), "{}", result.ir);
    assert!(result.ir.contains("call void @dj_loop(i32 12, i32 4)"));
    assert_eq!(result.module.call_count("dj_crossfade"), 2);
    assert_eq!(result.module.call_count("dj_order"), 2);
    assert_eq!(result.module.call_count("printf"), 0);

    assert_eq!(
        result.module.global("tempo").map(|g| g.init.clone()),
        Some(GlobalInit::Int(120))
    );
    assert_eq!(
        result.module.global("bars").map(|g| g.init.clone()),
        Some(GlobalInit::Int(12))
    );
    assert!(result.ir.contains("declare void @dj_crossfade(i32, i8*)"));
}

#[test]
fn test_e2e_command_with_bound_symbol() {
    let source = r#"
Module:
Entry: Func main():;
Block:
  Equation: track = "intro.wav"
  Above: Play(track)
  Below: Play(track)
End: Return 0;
"#;
    let result = compile(source).unwrap();
    assert_eq!(result.module.call_count("dj_play"), 2);
    let track_refs = result
        .module
        .function
        .instructions
        .iter()
        .filter(|i| matches!(i, IrInstruction::AddressOf { global, .. } if global == "track"))
        .count();
    assert_eq!(track_refs, 2);
}

#[test]
fn test_e2e_unknown_command() {
    let source = r#"
Module:
Entry: Func main():;
Block:
  Equation: x = 1
  Above: Scratch("vinyl")
  Below: Scratch("vinyl")
End: Return 0;
"#;
    let err = compile(source).unwrap_err();
    assert_eq!(
        err,
        Error::Codegen(CodegenError::UnknownCommand {
            name: "Scratch".into()
        })
    );
    assert_eq!(err.stage(), Stage::Codegen);

    let lenient = Compiler::new(CompileOptions {
        unknown_commands: UnknownCommandPolicy::Ignore,
        ..Default::default()
    });
    let result = lenient.compile(source).unwrap();
    assert!(result.module.referenced_symbols().is_empty());
    assert!(!result.ir.contains("Scratch"));
}

#[test]
fn test_e2e_arity_mismatch() {
    let source = GREETING.replace("\"hi\"", "Loop(4)");
    let err = compile(&source).unwrap_err();
    assert_eq!(
        err,
        Error::Codegen(CodegenError::ArityMismatch {
            command: "Loop".into(),
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn test_e2e_unclassifiable_constant() {
    let source = GREETING.replace("\"hi\"", "hello");
    assert!(matches!(
        compile(&source),
        Err(Error::Codegen(CodegenError::UnclassifiableConstant { .. }))
    ));
}

#[test]
fn test_e2e_lenient_terminators() {
    let source = r#"
Module:
Target: x86_64
Entry: Func main():
Block:
  Equation: greeting = "hi"
  Above: print "greeting"
  Below: print "greeting"
End: Return 0
"#;
    let err = compile(source).unwrap_err();
    assert!(matches!(err, Error::MissingTerminator { .. }));
    assert_eq!(err.stage(), Stage::Parse);

    let lenient = Compiler::new(CompileOptions {
        parser: ParserConfig::lenient(),
        ..Default::default()
    });
    let result = lenient.compile(source).unwrap();
    assert_eq!(result.module.call_count("printf"), 2);
}

#[test]
fn test_e2e_lex_error() {
    let err = compile("Module: @").unwrap_err();
    assert_eq!(
        err,
        Error::LexError {
            offset: 8,
            line: 1,
            column: 9,
            ch: '@'
        }
    );
    assert!(err.is_core());
}

#[test]
fn test_e2e_emit_ast_round_trips() {
    let json = Compiler::default().emit_ast(GREETING).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let root: lettera::Node = serde_json::from_value(value["root"].clone()).unwrap();
    assert_eq!(root, compile(GREETING).unwrap().program);
}

#[test]
fn test_e2e_entry_named_after_runtime_symbol() {
    for name in ["printf", "dj_log"] {
        let source = GREETING.replace("Func main()", &format!("Func {}()", name));
        let err = compile(&source).unwrap_err();
        assert_eq!(
            err,
            Error::Codegen(CodegenError::ReservedEntryName { name: name.into() })
        );
        assert_eq!(err.stage(), Stage::Codegen);
    }
}
