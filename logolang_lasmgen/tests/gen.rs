use logolang_check::check;
use logolang_lasmgen::generate;
use logolang_syntax::{parse, Source};
use std::path::PathBuf;
use test_log::test;

fn compile(text: &str) -> String {
    let source = Source::new(PathBuf::from("testcase.logo"), text.to_string());
    let program = parse(&source).expect("testcase source must parse");
    let analysis = check(&source, &program).expect("testcase source must check");
    generate(&program, &analysis)
}

#[test]
fn test_square_program() {
    let output = compile(
        "\
TO SQUARE
  REPEAT 4 [ FORWARD 10 RIGHT 90 ]
END
SQUARE
",
    );

    let expected = "\
.START __main__

.INIT 200 200 400 400

.CODE

SQUARE:
  PUSH 4
_L0:
  DUP
  JZ _L1
  PUSH 10
  FWD
  PUSH 90
  ROTR
  DEC
  JMP _L0
_L1:
  POP
  RET

__main__:
  CALL SQUARE 0
  HALT
";
    assert_eq!(expected, output);
}

#[test]
fn test_globals_and_data_section() {
    let output = compile(
        "\
MAKE \"X 3
PRINT :X + 1
",
    );

    // PRINT is not a drawing command, so no .INIT header appears.
    let expected = "\
.START __main__

.DATA
  X 0

.CODE

__main__:
  PUSH 3
  STOR X
  LOAD X
  PUSH 1
  ADD
  WRITE
  HALT
";
    assert_eq!(expected, output);
}

#[test]
fn test_output_is_deterministic() {
    const SOURCE: &str = "\
TO SPIRAL :STEPS :LEN
  REPEAT :STEPS [ FORWARD :LEN RIGHT 92 ]
END
MAKE \"SIZE 120
IFELSE :SIZE > 100 [ SPIRAL 50 :SIZE ] [ SPIRAL 10 :SIZE ]
";
    assert_eq!(compile(SOURCE), compile(SOURCE));
}

#[test]
fn test_every_jump_target_is_defined_exactly_once() {
    let output =
        compile("REPEAT 2 [ IF 1 < 2 [ PENUP ] IFELSE 1 = 1 [ PENDOWN ] [ WIPECLEAN ] ]");

    let definitions: Vec<&str> = output
        .lines()
        .filter_map(|line| line.strip_suffix(':'))
        .filter(|name| name.starts_with("_L"))
        .collect();
    // repeat introduces 2 branch points, if 1, ifelse 2
    assert_eq!(definitions.len(), 5);

    let targets: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("JZ ").or_else(|| line.strip_prefix("JMP ")))
        .collect();
    assert!(!targets.is_empty());
    for target in targets {
        let count = definitions.iter().copied().filter(|def| *def == target).count();
        assert_eq!(count, 1, "jump target {target} must be defined exactly once");
    }
}

#[test]
fn test_parameter_binding_order() {
    let output = compile(
        "\
TO P :A :B
  SETXY :A :B
END
P 1 2
",
    );

    // Caller pushes left to right, callee stores the top of stack into the
    // last parameter first.
    assert!(output.contains(
        "\
P:
  STOR P.B
  STOR P.A
  LOAD P.A
  LOAD P.B
  MVTO
  RET
"
    ));
    assert!(output.contains(
        "\
__main__:
  PUSH 1
  PUSH 2
  CALL P 2
  HALT
"
    ));
}

#[test]
fn test_postfix_operand_order() {
    let output = compile("MAKE \"X 1 + 2 * 3\n");
    assert!(output.contains(
        "\
  PUSH 1
  PUSH 2
  PUSH 3
  MUL
  ADD
  STOR X
"
    ));
}

#[test]
fn test_unary_minus() {
    let output = compile("MAKE \"X -5\n");
    assert!(output.contains(
        "\
  PUSH -1
  PUSH 5
  MUL
  STOR X
"
    ));
}

#[test]
fn test_word_literal() {
    let output = compile("PRINT \"hello\n");
    assert!(output.contains(
        "\
  PUSH \"hello
  WRITE
"
    ));
}

#[test]
fn test_comparison_compiles_to_value_and_branch() {
    let output = compile("IF 1 < 2 [ PENUP ]\n");
    assert!(output.contains(
        "\
  PUSH 1
  PUSH 2
  LT
  JZ _L0
  PENUP
_L0:
"
    ));
}
